//! Shared enums and the attribute codec (`spec.md` §4.1/§4.3).
//!
//! Every `FromStr`-style conversion here is deliberately *not* `std::str::
//! FromStr` — `ParseAttrError` needs the owning element/attribute name for a
//! useful message, so parsing goes through `attr::parse_enum`, which takes
//! that context explicitly instead of defaulting silently the way the
//! teacher's ad-hoc `.and_then(|s| T::from_str(s).ok()).unwrap_or(default)`
//! call sites do.

use crate::error::ParseAttrError;

pub mod attr {
    use super::ParseAttrError;

    pub fn parse_i32(element: &str, attr: &str, raw: &str) -> Result<i32, ParseAttrError> {
        raw.parse::<i32>()
            .map_err(|e| ParseAttrError::new(element, attr, raw, e))
    }

    pub fn parse_usize(element: &str, attr: &str, raw: &str) -> Result<usize, ParseAttrError> {
        raw.parse::<usize>()
            .map_err(|e| ParseAttrError::new(element, attr, raw, e))
    }

    /// ST_OnOff: `"true"`/`"1"`/`"on"` -> true, `"false"`/`"0"`/`"off"` -> false.
    pub fn parse_on_off(element: &str, attr: &str, raw: &str) -> Result<bool, ParseAttrError> {
        match raw {
            "true" | "1" | "on" => Ok(true),
            "false" | "0" | "off" => Ok(false),
            _ => Err(ParseAttrError::new(
                element,
                attr,
                raw,
                "expected an ST_OnOff value",
            )),
        }
    }

    pub fn parse_enum<T>(
        element: &str,
        attr: &str,
        raw: &str,
        from_str: impl Fn(&str) -> Option<T>,
    ) -> Result<T, ParseAttrError> {
        from_str(raw).ok_or_else(|| {
            ParseAttrError::new(element, attr, raw, "unrecognized enumeration value")
        })
    }
}

/// True tri-state boolean (`spec.md` §3 invariant 3/4, §4.0): absent from the
/// wire entirely (`Inherit`), explicit `<w:b/>` (`On`), or explicit
/// `<w:b w:val="false"/>` (`Off`). Replaces the teacher's
/// `Option<RunProperty::bold>` + `disable_bold()` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnOff {
    #[default]
    Inherit,
    On,
    Off,
}

impl OnOff {
    pub fn is_on(self) -> bool {
        matches!(self, OnOff::On)
    }

    pub fn is_set(self) -> bool {
        !matches!(self, OnOff::Inherit)
    }

    pub fn from_wire(val: Option<bool>) -> Self {
        match val {
            None => OnOff::On, // bare <w:b/>, ST_OnOff defaults to true
            Some(true) => OnOff::On,
            Some(false) => OnOff::Off,
        }
    }

    /// `None` means "omit the element entirely".
    pub fn to_wire(self) -> Option<bool> {
        match self {
            OnOff::Inherit => None,
            OnOff::On => Some(true),
            OnOff::Off => Some(false),
        }
    }
}

/// `spec.md` §4.3's line-spacing sum type, losslessly convertible to/from the
/// teacher's raw `(line: i32, line_rule: String)` wire pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSpacing {
    Auto { lines_x240: i32 },
    AtLeast { dxa: i32 },
    Exact { dxa: i32 },
}

impl LineSpacing {
    pub fn from_wire(line: i32, rule: &str) -> Self {
        match rule {
            "atLeast" => LineSpacing::AtLeast { dxa: line },
            "exact" => LineSpacing::Exact { dxa: line },
            _ => LineSpacing::Auto { lines_x240: line },
        }
    }

    pub fn to_wire(self) -> (i32, &'static str) {
        match self {
            LineSpacing::Auto { lines_x240 } => (lines_x240, "auto"),
            LineSpacing::AtLeast { dxa } => (dxa, "atLeast"),
            LineSpacing::Exact { dxa } => (dxa, "exact"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthType {
    #[default]
    Auto,
    Dxa,
    Pct,
    Nil,
}

impl WidthType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(WidthType::Auto),
            "dxa" => Some(WidthType::Dxa),
            "pct" => Some(WidthType::Pct),
            "nil" => Some(WidthType::Nil),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            WidthType::Auto => "auto",
            WidthType::Dxa => "dxa",
            WidthType::Pct => "pct",
            WidthType::Nil => "nil",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VMergeType {
    Restart,
    #[default]
    Continue,
}

impl VMergeType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "restart" => Some(VMergeType::Restart),
            "continue" => Some(VMergeType::Continue),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            VMergeType::Restart => "restart",
            VMergeType::Continue => "continue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightRule {
    #[default]
    Auto,
    AtLeast,
    Exact,
}

impl HeightRule {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(HeightRule::Auto),
            "atLeast" => Some(HeightRule::AtLeast),
            "exact" => Some(HeightRule::Exact),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            HeightRule::Auto => "auto",
            HeightRule::AtLeast => "atLeast",
            HeightRule::Exact => "exact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOrientationType {
    #[default]
    Portrait,
    Landscape,
}

impl PageOrientationType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "portrait" => Some(PageOrientationType::Portrait),
            "landscape" => Some(PageOrientationType::Landscape),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            PageOrientationType::Portrait => "portrait",
            PageOrientationType::Landscape => "landscape",
        }
    }
}

/// `w:sectPr/@w:type`, `spec.md` §4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionType {
    Continuous,
    #[default]
    NextPage,
    NextColumn,
    EvenPage,
    OddPage,
}

impl SectionType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "continuous" => Some(SectionType::Continuous),
            "nextPage" => Some(SectionType::NextPage),
            "nextColumn" => Some(SectionType::NextColumn),
            "evenPage" => Some(SectionType::EvenPage),
            "oddPage" => Some(SectionType::OddPage),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            SectionType::Continuous => "continuous",
            SectionType::NextPage => "nextPage",
            SectionType::NextColumn => "nextColumn",
            SectionType::EvenPage => "evenPage",
            SectionType::OddPage => "oddPage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentType {
    #[default]
    Left,
    Right,
    Center,
    Both,
    Distribute,
}

impl AlignmentType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "left" | "start" => Some(AlignmentType::Left),
            "right" | "end" => Some(AlignmentType::Right),
            "center" => Some(AlignmentType::Center),
            "both" | "justify" => Some(AlignmentType::Both),
            "distribute" => Some(AlignmentType::Distribute),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            AlignmentType::Left => "left",
            AlignmentType::Right => "right",
            AlignmentType::Center => "center",
            AlignmentType::Both => "both",
            AlignmentType::Distribute => "distribute",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlignType {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VAlignType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "top" => Some(VAlignType::Top),
            "center" => Some(VAlignType::Center),
            "bottom" => Some(VAlignType::Bottom),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            VAlignType::Top => "top",
            VAlignType::Center => "center",
            VAlignType::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakType {
    Page,
    Column,
    TextWrapping,
}

impl BreakType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "page" => Some(BreakType::Page),
            "column" => Some(BreakType::Column),
            "textWrapping" => Some(BreakType::TextWrapping),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            BreakType::Page => "page",
            BreakType::Column => "column",
            BreakType::TextWrapping => "textWrapping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyperlinkType {
    External,
    Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCharType {
    Begin,
    Separate,
    End,
}

impl FieldCharType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "begin" => Some(FieldCharType::Begin),
            "separate" => Some(FieldCharType::Separate),
            "end" => Some(FieldCharType::End),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            FieldCharType::Begin => "begin",
            FieldCharType::Separate => "separate",
            FieldCharType::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirectionType {
    #[default]
    Lrtb,
    TbRl,
    BtLr,
}

impl TextDirectionType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "lrTb" => Some(TextDirectionType::Lrtb),
            "tbRl" => Some(TextDirectionType::TbRl),
            "btLr" => Some(TextDirectionType::BtLr),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            TextDirectionType::Lrtb => "lrTb",
            TextDirectionType::TbRl => "tbRl",
            TextDirectionType::BtLr => "btLr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLayoutType {
    #[default]
    Autofit,
    Fixed,
}

impl TableLayoutType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "autofit" => Some(TableLayoutType::Autofit),
            "fixed" => Some(TableLayoutType::Fixed),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            TableLayoutType::Autofit => "autofit",
            TableLayoutType::Fixed => "fixed",
        }
    }
}

/// `w:style/@w:type`, `spec.md` §4.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleType {
    #[default]
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "paragraph" => Some(StyleType::Paragraph),
            "character" => Some(StyleType::Character),
            "table" => Some(StyleType::Table),
            "numbering" => Some(StyleType::Numbering),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            StyleType::Paragraph => "paragraph",
            StyleType::Character => "character",
            StyleType::Table => "table",
            StyleType::Numbering => "numbering",
        }
    }
}

/// `ST_Border`, trimmed to the subset the teacher and this crate emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderType {
    #[default]
    Single,
    Double,
    Dashed,
    Dotted,
    Thick,
    Nil,
    None,
}

impl BorderType {
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s {
            "single" => Some(BorderType::Single),
            "double" => Some(BorderType::Double),
            "dashed" => Some(BorderType::Dashed),
            "dotted" => Some(BorderType::Dotted),
            "thick" => Some(BorderType::Thick),
            "nil" => Some(BorderType::Nil),
            "none" => Some(BorderType::None),
            _ => None,
        }
    }

    pub fn to_xml_str(self) -> &'static str {
        match self {
            BorderType::Single => "single",
            BorderType::Double => "double",
            BorderType::Dashed => "dashed",
            BorderType::Dotted => "dotted",
            BorderType::Thick => "thick",
            BorderType::Nil => "nil",
            BorderType::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_on_off_roundtrip() {
        assert_eq!(OnOff::from_wire(None), OnOff::On);
        assert_eq!(OnOff::from_wire(Some(false)), OnOff::Off);
        assert_eq!(OnOff::Off.to_wire(), Some(false));
        assert_eq!(OnOff::Inherit.to_wire(), None);
    }

    #[test]
    fn test_line_spacing_roundtrip() {
        let ls = LineSpacing::from_wire(480, "exact");
        assert_eq!(ls, LineSpacing::Exact { dxa: 480 });
        assert_eq!(ls.to_wire(), (480, "exact"));
    }

    #[test]
    fn test_parse_attr_error_propagates() {
        let err = attr::parse_i32("w:ind", "w:left", "abc").unwrap_err();
        assert_eq!(err.element, "w:ind");
        assert_eq!(err.attr, "w:left");
    }

    #[test]
    fn test_parse_enum_unrecognized() {
        let err =
            attr::parse_enum("w:jc", "w:val", "bogus", AlignmentType::from_xml_str).unwrap_err();
        assert_eq!(err.raw, "bogus");
    }
}
