//! Atom collection and `ReplaceText(old, new)`, per `spec.md` §4.2.
//!
//! New code: the teacher has nothing resembling byte-addressable
//! cross-run atoms, so this is grounded directly on the spec's atom table
//! and contract prose rather than on a teacher file, the way
//! `documents::table_geometry` and `documents::sections` were.

use crate::documents::paragraph::{Paragraph, ParagraphChild};
use crate::documents::run::{Run, RunChild, Text};
use crate::types::BreakType;

/// Where one atom's owning run lives inside a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AtomOwner {
    /// Index into `Paragraph::children`, pointing at a `ParagraphChild::Run`.
    Run(usize),
    /// Index into `Paragraph::children` (a `ParagraphChild::Hyperlink`), then
    /// index into that hyperlink's own `children` (a `ParagraphChild::Run`).
    HyperlinkRun(usize, usize),
}

#[derive(Debug, Clone)]
struct Atom {
    owner: AtomOwner,
    run_child_index: usize,
    start: usize,
    end: usize,
    text: String,
    editable: bool,
}

/// The table in `spec.md` §4.2: which `RunChild` variants contribute an
/// atom, what text they substitute, and whether that text is editable.
/// `None` means the child is skipped without contributing an atom or
/// perturbing byte positions (`w:rPr`, `w:drawing`,
/// `w:lastRenderedPageBreak`, `w:commentReference`, footnote refs, ...).
fn substitution_for(child: &RunChild) -> Option<(String, bool)> {
    match child {
        RunChild::Text(t) => Some((t.text.clone(), true)),
        RunChild::Tab(_) | RunChild::PTab(_) => Some(("\t".to_string(), false)),
        RunChild::Cr(_) => Some(("\n".to_string(), false)),
        RunChild::NoBreakHyphen(_) => Some(("-".to_string(), false)),
        RunChild::Break(b) if b.break_type == BreakType::TextWrapping => Some(("\n".to_string(), false)),
        _ => None,
    }
}

fn collect_run_atoms(owner: AtomOwner, run: &Run, pos: &mut usize, atoms: &mut Vec<Atom>) {
    for (i, child) in run.children.iter().enumerate() {
        if let Some((text, editable)) = substitution_for(child) {
            let len = text.len();
            atoms.push(Atom {
                owner,
                run_child_index: i,
                start: *pos,
                end: *pos + len,
                text,
                editable,
            });
            *pos += len;
        }
    }
}

/// Traversal order: direct-child `w:r`/`w:hyperlink` in document order;
/// inside a hyperlink, direct-child `w:r` in document order. Everything
/// else at paragraph level is skipped.
fn collect_atoms(paragraph: &Paragraph) -> Vec<Atom> {
    let mut atoms = Vec::new();
    let mut pos = 0usize;
    for (i, child) in paragraph.children.iter().enumerate() {
        match child {
            ParagraphChild::Run(r) => collect_run_atoms(AtomOwner::Run(i), r, &mut pos, &mut atoms),
            ParagraphChild::Hyperlink(h) => {
                for (j, hc) in h.children.iter().enumerate() {
                    if let ParagraphChild::Run(r) = hc {
                        collect_run_atoms(AtomOwner::HyperlinkRun(i, j), r, &mut pos, &mut atoms);
                    }
                }
            }
            _ => {}
        }
    }
    atoms
}

/// `spec.md` §4.2's "Paragraph text": the concatenated atom string, with no
/// replacements applied.
pub fn paragraph_text(paragraph: &Paragraph) -> String {
    collect_atoms(paragraph).iter().map(|a| a.text.as_str()).collect()
}

fn run_mut(paragraph: &mut Paragraph, owner: AtomOwner) -> &mut Run {
    match owner {
        AtomOwner::Run(i) => match &mut paragraph.children[i] {
            ParagraphChild::Run(r) => r.as_mut(),
            _ => unreachable!("atom owner did not point at a run"),
        },
        AtomOwner::HyperlinkRun(i, j) => match &mut paragraph.children[i] {
            ParagraphChild::Hyperlink(h) => match &mut h.children[j] {
                ParagraphChild::Run(r) => r.as_mut(),
                _ => unreachable!("hyperlink atom owner did not point at a run"),
            },
            _ => unreachable!("atom owner did not point at a hyperlink"),
        },
    }
}

/// `spec.md` §4.2's `ReplaceText(old, new)`. Returns the number of
/// replacements performed.
///
/// Matches are found left-to-right over the concatenated atom text and
/// applied right-to-left so earlier byte offsets stay valid while later
/// ones are mutated.
pub fn replace_text(paragraph: &mut Paragraph, old: &str, new: &str) -> usize {
    if old.is_empty() || old == new {
        return 0;
    }

    let atoms = collect_atoms(paragraph);
    let full: String = atoms.iter().map(|a| a.text.as_str()).collect();

    let mut matches = Vec::new();
    let mut search_from = 0usize;
    while let Some(rel) = full[search_from..].find(old) {
        let start = search_from + rel;
        let end = start + old.len();
        matches.push((start, end));
        search_from = end;
    }
    if matches.is_empty() {
        return 0;
    }

    for &(match_start, match_end) in matches.iter().rev() {
        let mut intersecting: Vec<usize> = (0..atoms.len())
            .filter(|&idx| atoms[idx].start < match_end && atoms[idx].end > match_start)
            .collect();
        intersecting.sort_by_key(|&idx| atoms[idx].start);

        let first_editable = intersecting.iter().copied().find(|&idx| atoms[idx].editable);
        let insertion_point = intersecting.first().map(|&idx| (atoms[idx].owner, atoms[idx].run_child_index));

        for &idx in intersecting.iter().rev() {
            let atom = &atoms[idx];
            let local_start = match_start.max(atom.start) - atom.start;
            let local_end = match_end.min(atom.end) - atom.start;
            let run = run_mut(paragraph, atom.owner);

            if Some(idx) == first_editable {
                if let RunChild::Text(t) = &mut run.children[atom.run_child_index] {
                    t.text.replace_range(local_start..local_end, new);
                }
            } else if atom.editable {
                if let RunChild::Text(t) = &mut run.children[atom.run_child_index] {
                    t.text.replace_range(local_start..local_end, "");
                }
            } else {
                run.children.remove(atom.run_child_index);
            }
        }

        if first_editable.is_none() && !new.is_empty() {
            if let Some((owner, run_child_index)) = insertion_point {
                let run = run_mut(paragraph, owner);
                run.children.insert(run_child_index, RunChild::Text(Text::new(new)));
            }
        }
    }

    matches.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::hyperlink::Hyperlink;
    use crate::documents::run::Run;
    use crate::types::HyperlinkType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paragraph_text_concatenates_run_and_tab_atoms() {
        let p = Paragraph::new()
            .add_run(Run::new().add_text("Hello"))
            .add_run(Run::new().add_tab().add_text("World"));
        assert_eq!(paragraph_text(&p), "Hello\tWorld");
    }

    #[test]
    fn test_replace_text_no_op_on_empty_old_or_equal() {
        let mut p = Paragraph::new().add_run(Run::new().add_text("Hello"));
        assert_eq!(replace_text(&mut p, "", "x"), 0);
        assert_eq!(replace_text(&mut p, "Hello", "Hello"), 0);
        assert_eq!(paragraph_text(&p), "Hello");
    }

    #[test]
    fn test_replace_text_within_single_run() {
        let mut p = Paragraph::new().add_run(Run::new().add_text("Hello, world"));
        let n = replace_text(&mut p, "world", "Rust");
        assert_eq!(n, 1);
        assert_eq!(paragraph_text(&p), "Hello, Rust");
    }

    #[test]
    fn test_replace_text_across_run_boundary() {
        let mut p = Paragraph::new()
            .add_run(Run::new().add_text("Hel"))
            .add_run(Run::new().add_text("lo, world"));
        let n = replace_text(&mut p, "llo", "y");
        assert_eq!(n, 1);
        assert_eq!(paragraph_text(&p), "Hey, world");

        let ParagraphChild::Run(first) = &p.children[0] else {
            panic!("expected run");
        };
        assert_eq!(first.plain_text(), "He");
        let ParagraphChild::Run(second) = &p.children[1] else {
            panic!("expected run");
        };
        assert_eq!(second.plain_text(), "y, world");
    }

    #[test]
    fn test_replace_text_multiple_matches_applied_right_to_left() {
        let mut p = Paragraph::new().add_run(Run::new().add_text("a-b-a"));
        let n = replace_text(&mut p, "a", "xx");
        assert_eq!(n, 2);
        assert_eq!(paragraph_text(&p), "xx-b-xx");
    }

    #[test]
    fn test_replace_text_covering_only_non_editable_atom_inserts_fresh_text() {
        let mut p = Paragraph::new().add_run(Run::new().add_text("a").add_tab().add_text("b"));
        let n = replace_text(&mut p, "\t", "X");
        assert_eq!(n, 1);
        assert_eq!(paragraph_text(&p), "aXb");

        let ParagraphChild::Run(run) = &p.children[0] else {
            panic!("expected run");
        };
        assert_eq!(
            run.children,
            vec![
                RunChild::Text(Text::new("a")),
                RunChild::Text(Text::new("X")),
                RunChild::Text(Text::new("b")),
            ]
        );
    }

    #[test]
    fn test_replace_text_inside_hyperlink_run() {
        let mut p = Paragraph::new()
            .add_hyperlink(Hyperlink::new("rId1", HyperlinkType::External).add_run(Run::new().add_text("click here")));
        let n = replace_text(&mut p, "here", "there");
        assert_eq!(n, 1);
        assert_eq!(paragraph_text(&p), "click there");
    }
}
