//! Fluent wrapper over `xml::writer::EventWriter`.
//!
//! Every element type in `documents` implements `BuildXML` by chaining calls
//! on an `XMLBuilder`, rather than touching `xml::writer::XmlEvent` directly.
//! This keeps every file's `build_to` reading like a flat outline of the
//! element it emits.

use std::io::Write;

pub use xml::writer::{EmitterConfig, EventWriter, Result, XmlEvent};

pub struct XMLBuilder<W: Write>(EventWriter<W>);

macro_rules! open_el {
    ($name:ident, $tag:expr) => {
        pub fn $name(self) -> Result<Self> {
            self.open($tag)
        }
    };
}

impl<W: Write> XMLBuilder<W> {
    pub fn from(stream: EventWriter<W>) -> Self {
        Self(stream)
    }

    pub fn new(inner: W) -> Self {
        Self(EventWriter::new(inner))
    }

    pub fn into_inner(self) -> Result<EventWriter<W>> {
        Ok(self.0)
    }

    /// Writes the `<?xml version="1.0" ...?>` declaration. `standalone`
    /// mirrors the teacher's call site `declaration(Some(true))`.
    pub fn declaration(mut self, standalone: Option<bool>) -> Result<Self> {
        self.0.write(XmlEvent::StartDocument {
            version: xml::common::XmlVersion::Version10,
            encoding: Some("UTF-8"),
            standalone,
        })?;
        Ok(self)
    }

    pub fn open(mut self, tag: &str) -> Result<Self> {
        self.0.write(XmlEvent::start_element(tag))?;
        Ok(self)
    }

    pub fn open_with_attrs(mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<Self> {
        let mut el = XmlEvent::start_element(tag);
        for (k, v) in attrs {
            el = el.attr(*k, v);
        }
        self.0.write(el)?;
        Ok(self)
    }

    pub fn close(mut self) -> Result<Self> {
        self.0.write(XmlEvent::end_element())?;
        Ok(self)
    }

    /// A leaf element with attributes and no children, e.g. `<w:b w:val="false" />`.
    pub fn closed_with_attrs(self, tag: &str, attrs: &[(&str, &str)]) -> Result<Self> {
        self.open_with_attrs(tag, attrs)?.close()
    }

    /// A leaf element with no attributes and no children, e.g. `<w:b />`.
    pub fn closed(self, tag: &str) -> Result<Self> {
        self.open(tag)?.close()
    }

    pub fn text(mut self, content: &str) -> Result<Self> {
        self.0.write(XmlEvent::characters(content))?;
        Ok(self)
    }

    pub fn add_child<T: BuildXML>(self, child: &T) -> Result<Self> {
        let stream = child.build_to(self.0)?;
        Ok(Self(stream))
    }

    pub fn add_optional_child<T: BuildXML>(self, child: &Option<T>) -> Result<Self> {
        match child {
            Some(c) => self.add_child(c),
            None => Ok(self),
        }
    }

    pub fn add_children<T: BuildXML>(mut self, children: &[T]) -> Result<Self> {
        for c in children {
            self = self.add_child(c)?;
        }
        Ok(self)
    }

    pub fn apply_if(self, cond: bool, f: impl FnOnce(Self) -> Result<Self>) -> Result<Self> {
        if cond {
            f(self)
        } else {
            Ok(self)
        }
    }

    pub fn apply_opt<T>(
        self,
        opt: Option<T>,
        f: impl FnOnce(T, Self) -> Result<Self>,
    ) -> Result<Self> {
        match opt {
            Some(v) => f(v, self),
            None => Ok(self),
        }
    }

    pub fn apply_each<T>(
        mut self,
        items: &[T],
        mut f: impl FnMut(&T, Self) -> Result<Self>,
    ) -> Result<Self> {
        for item in items {
            self = f(item, self)?;
        }
        Ok(self)
    }

    open_el!(open_document, "w:document");
    open_el!(open_body, "w:body");
    open_el!(open_run, "w:r");
    open_el!(open_paragraph, "w:p");
    open_el!(open_paragraph_property, "w:pPr");
    open_el!(open_run_property, "w:rPr");
    open_el!(open_table, "w:tbl");
    open_el!(open_table_row, "w:tr");
    open_el!(open_table_cell, "w:tc");
    open_el!(open_table_cell_property, "w:tcPr");
    open_el!(open_table_row_property, "w:trPr");
    open_el!(open_table_property, "w:tblPr");
    open_el!(open_hyperlink, "w:hyperlink");
    open_el!(open_section_property, "w:sectPr");
    open_el!(open_header, "w:hdr");
    open_el!(open_footer, "w:ftr");
    open_el!(open_style, "w:style");
    open_el!(open_styles, "w:styles");
    open_el!(open_doc_defaults, "w:docDefaults");
    open_el!(open_numbering, "w:numbering");
    open_el!(open_num, "w:num");
    open_el!(open_abstract_num, "w:abstractNum");
    open_el!(open_level, "w:lvl");
    open_el!(open_drawing, "w:drawing");
    open_el!(open_insert, "w:ins");
    open_el!(open_delete, "w:del");
    open_el!(open_structured_tag, "w:sdt");
    open_el!(open_structured_tag_property, "w:sdtPr");
    open_el!(open_structured_tag_content, "w:sdtContent");
    open_el!(open_text_box_content, "w:txbxContent");
    open_el!(open_comments, "w:comments");
    open_el!(open_comment, "w:comment");
    open_el!(open_comments_extended, "w15:commentsEx");
    open_el!(open_comment_extended, "w15:commentEx");
    open_el!(open_core_properties, "cp:coreProperties");
    open_el!(open_settings, "w:settings");
    open_el!(open_compat, "w:compat");
    open_el!(open_doc_vars, "w:docVars");
}

/// Every emittable element implements `BuildXML`; `build` is the one
/// allocation point, `build_to` the streaming entry point used internally
/// so children are written without an intermediate buffer per node.
pub trait BuildXML {
    fn build_to<W: Write>(&self, stream: EventWriter<W>) -> Result<EventWriter<W>>;

    fn build(&self) -> Vec<u8> {
        let stream = EventWriter::new_with_config(
            Vec::new(),
            EmitterConfig::new()
                .write_document_declaration(false)
                .perform_indent(false)
                .autopad_comments(false),
        );
        let stream = self.build_to(stream).expect("build_to is infallible over Vec<u8>");
        stream.into_inner()
    }
}
