//! Last-rendered-page-break fragmentation, per `spec.md` §4.2.
//!
//! New code, grounded on the same spec prose `atoms.rs` is: given a
//! `w:lastRenderedPageBreak` inside some run of a paragraph, split that
//! paragraph into a `preceding`/`following` pair of whole paragraphs, each
//! keeping `w:pPr`, with atoms before the break in one and atoms after it
//! in the other.

use crate::documents::paragraph::{Paragraph, ParagraphChild};
use crate::documents::run::{Run, RunChild};

/// The two paragraph-shaped fragments produced by splitting on a rendered
/// page break. Neither is the original paragraph: both are fresh copies
/// sharing its `w:pPr`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBreakSplit {
    pub preceding: Paragraph,
    pub following: Paragraph,
}

fn split_run(run: &Run) -> Option<(Run, Run)> {
    let break_index = run
        .children
        .iter()
        .position(|c| matches!(c, RunChild::LastRenderedPageBreak(_)))?;

    // The break marker itself belongs to neither fragment; it is consumed
    // by the split rather than carried forward.
    let before = Run {
        run_property: run.run_property.clone(),
        children: run.children[..break_index].to_vec(),
    };
    let after = Run {
        run_property: run.run_property.clone(),
        children: run.children[break_index + 1..].to_vec(),
    };
    Some((before, after))
}

/// Finds the first `w:lastRenderedPageBreak` in `paragraph` (direct-child
/// run, or nested inside a hyperlink) and splits around it. Returns `None`
/// if the paragraph has no such marker.
pub fn split_at_last_rendered_page_break(paragraph: &Paragraph) -> Option<PageBreakSplit> {
    let split_index = paragraph.children.iter().position(|child| match child {
        ParagraphChild::Run(r) => r.children.iter().any(|c| matches!(c, RunChild::LastRenderedPageBreak(_))),
        ParagraphChild::Hyperlink(h) => h.children.iter().any(|hc| match hc {
            ParagraphChild::Run(r) => r.children.iter().any(|c| matches!(c, RunChild::LastRenderedPageBreak(_))),
            _ => false,
        }),
        _ => false,
    })?;

    let mut preceding = Paragraph {
        property: paragraph.property.clone(),
        children: paragraph.children[..split_index].to_vec(),
        id: None,
    };
    let mut following = Paragraph {
        property: paragraph.property.clone(),
        children: Vec::new(),
        id: None,
    };

    match &paragraph.children[split_index] {
        ParagraphChild::Run(r) => {
            let (before, after) = split_run(r).expect("split_index run carries the break marker");
            if !before.children.is_empty() {
                preceding.children.push(ParagraphChild::Run(Box::new(before)));
            }
            following.children.push(ParagraphChild::Run(Box::new(after)));
        }
        ParagraphChild::Hyperlink(h) => {
            // The hyperlink wrapper (and its r:id) appears in both
            // fragments; only the run carrying the break is split.
            let run_split_index = h
                .children
                .iter()
                .position(|hc| match hc {
                    ParagraphChild::Run(r) => r.children.iter().any(|c| matches!(c, RunChild::LastRenderedPageBreak(_))),
                    _ => false,
                })
                .expect("hyperlink at split_index carries the break marker");

            let mut before_hyperlink = (**h).clone();
            let mut after_hyperlink = (**h).clone();
            before_hyperlink.children = h.children[..run_split_index].to_vec();
            after_hyperlink.children = Vec::new();

            if let ParagraphChild::Run(r) = &h.children[run_split_index] {
                let (before, after) = split_run(r).expect("run_split_index run carries the break marker");
                if !before.children.is_empty() {
                    before_hyperlink.children.push(ParagraphChild::Run(Box::new(before)));
                }
                after_hyperlink.children.push(ParagraphChild::Run(Box::new(after)));
            }
            after_hyperlink
                .children
                .extend(h.children[run_split_index + 1..].iter().cloned());

            if !before_hyperlink.children.is_empty() {
                preceding.children.push(ParagraphChild::Hyperlink(Box::new(before_hyperlink)));
            }
            following.children.push(ParagraphChild::Hyperlink(Box::new(after_hyperlink)));
        }
        _ => unreachable!("split_index only ever points at a Run or Hyperlink"),
    }

    following.children.extend(paragraph.children[split_index + 1..].iter().cloned());

    Some(PageBreakSplit { preceding, following })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::hyperlink::Hyperlink;
    use crate::documents::run::Run;
    use crate::text::atoms::paragraph_text;
    use crate::types::HyperlinkType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_break_returns_none() {
        let p = Paragraph::new().add_run(Run::new().add_text("no break here"));
        assert!(split_at_last_rendered_page_break(&p).is_none());
    }

    #[test]
    fn test_split_within_single_run() {
        let p = Paragraph::new().add_run(Run::new().add_text("before").add_last_rendered_page_break().add_text("after"));
        let split = split_at_last_rendered_page_break(&p).unwrap();
        assert_eq!(paragraph_text(&split.preceding), "before");
        assert_eq!(paragraph_text(&split.following), "after");
    }

    #[test]
    fn test_split_across_run_boundary_preserves_other_runs() {
        let p = Paragraph::new()
            .add_run(Run::new().add_text("first run"))
            .add_run(Run::new().add_text("before").add_last_rendered_page_break().add_text("after"))
            .add_run(Run::new().add_text("last run"));
        let split = split_at_last_rendered_page_break(&p).unwrap();
        assert_eq!(paragraph_text(&split.preceding), "first runbefore");
        assert_eq!(paragraph_text(&split.following), "afterlast run");
    }

    #[test]
    fn test_split_inside_hyperlink_keeps_wrapper_in_both_fragments() {
        let p = Paragraph::new().add_hyperlink(
            Hyperlink::new("rId1", HyperlinkType::External)
                .add_run(Run::new().add_text("before").add_last_rendered_page_break().add_text("after")),
        );
        let split = split_at_last_rendered_page_break(&p).unwrap();
        assert_eq!(paragraph_text(&split.preceding), "before");
        assert_eq!(paragraph_text(&split.following), "after");

        assert!(matches!(split.preceding.children[0], ParagraphChild::Hyperlink(_)));
        assert!(matches!(split.following.children[0], ParagraphChild::Hyperlink(_)));
    }
}
