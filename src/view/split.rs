use super::{number_width, Cell, ClickSide, LineNumberClick};
use crate::align::{DecoratedLine, LineKey, LineKind};

/// A side-by-side row: old file on the left, new file on the right
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRow {
    pub left: Cell,
    pub right: Cell,
    /// Key of the line that opened the row
    pub key: LineKey,
}

impl SplitRow {
    pub fn click(&self, side: ClickSide) -> Option<LineNumberClick> {
        match side {
            ClickSide::Left => self.left.click(side),
            ClickSide::Right => self.right.click(side),
            ClickSide::Unified => None,
        }
    }
}

/// Arrange decorated lines into left/right rows.
///
/// A removed line shares its row with the added line it is paired with;
/// unpaired lines get an empty cell opposite. Number columns are padded to
/// the widest old / new number across all of `lines`.
pub fn split_rows(lines: &[DecoratedLine]) -> Vec<SplitRow> {
    let old_width = number_width(lines, |l| l.old_line_number);
    let new_width = number_width(lines, |l| l.new_line_number);
    let partner = |line: &DecoratedLine, kind: LineKind| {
        line.paired_with
            .and_then(|idx| lines.get(idx))
            .filter(|other| other.kind == kind)
    };

    let mut rows = Vec::with_capacity(lines.len());
    for line in lines {
        match line.kind {
            LineKind::Remove => {
                let right = match partner(line, LineKind::Add) {
                    Some(add) => Cell::new(add, add.new_line_number, new_width),
                    None => Cell::empty(new_width),
                };
                rows.push(SplitRow {
                    left: Cell::new(line, line.old_line_number, old_width),
                    right,
                    key: line.key,
                });
            }
            LineKind::Add => {
                // Already placed next to its removed line
                if partner(line, LineKind::Remove).is_some() {
                    continue;
                }
                rows.push(SplitRow {
                    left: Cell::empty(old_width),
                    right: Cell::new(line, line.new_line_number, new_width),
                    key: line.key,
                });
            }
            LineKind::NoChange => rows.push(SplitRow {
                left: Cell::new(line, line.old_line_number, old_width),
                right: Cell::new(line, line.new_line_number, new_width),
                key: line.key,
            }),
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{format_hunk_plain, format_hunks, Hunk};
    use crate::syntax::PlainTokenizer;
    use crate::view::RowType;

    fn hunk(old_start: usize, new_start: usize, lines: &[&str]) -> Hunk {
        Hunk::new(Some(old_start), Some(new_start), lines.iter().map(|s| s.to_string()).collect())
    }

    fn types(rows: &[SplitRow]) -> Vec<(RowType, RowType)> {
        rows.iter().map(|r| (r.left.row_type, r.right.row_type)).collect()
    }

    #[test]
    fn unpaired_remove_gets_empty_right() {
        let rows = split_rows(&format_hunk_plain(&hunk(3, 3, &["-gone"])));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].left.row_type, RowType::Remove);
        assert_eq!(rows[0].left.content.text(), "gone");
        assert_eq!(rows[0].left.line_number, Some(3));
        assert_eq!(rows[0].right.row_type, RowType::Empty);
        assert_eq!(rows[0].right.line_number, None);
        assert!(rows[0].right.line_number_text.trim().is_empty());
    }

    #[test]
    fn unpaired_add_gets_empty_left() {
        let rows = split_rows(&format_hunk_plain(&hunk(1, 1, &[" ctx", "+new"])));
        assert_eq!(types(&rows), vec![(RowType::NoChange, RowType::NoChange), (RowType::Empty, RowType::Add)]);
        assert_eq!(rows[1].right.line_number, Some(2));
    }

    #[test]
    fn pairs_share_a_row() {
        let rows = split_rows(&format_hunk_plain(&hunk(1, 1, &["-a", "-b", "+c", "+d", "+e"])));
        assert_eq!(
            types(&rows),
            vec![
                (RowType::Remove, RowType::Add),
                (RowType::Remove, RowType::Add),
                (RowType::Empty, RowType::Add),
            ]
        );
        assert_eq!(rows[0].left.content.text(), "a");
        assert_eq!(rows[0].right.content.text(), "c");
        assert_eq!(rows[2].right.content.text(), "e");
    }

    #[test]
    fn extra_removes_follow_pairs() {
        let rows = split_rows(&format_hunk_plain(&hunk(1, 1, &["-a", "-b", "+c", " d"])));
        assert_eq!(
            types(&rows),
            vec![
                (RowType::Remove, RowType::Add),
                (RowType::Remove, RowType::Empty),
                (RowType::NoChange, RowType::NoChange),
            ]
        );
    }

    #[test]
    fn context_shows_both_numbers() {
        let rows = split_rows(&format_hunk_plain(&hunk(4, 7, &[" same"])));
        assert_eq!(rows[0].left.line_number, Some(4));
        assert_eq!(rows[0].right.line_number, Some(7));
        assert_eq!(rows[0].left.content, rows[0].right.content);
    }

    #[test]
    fn widths_span_all_hunks() {
        let hunks = vec![hunk(9, 9, &[" a"]), hunk(120, 1005, &[" b"])];
        let rows = split_rows(&format_hunks::<PlainTokenizer>(&hunks, None));
        assert_eq!(rows[0].left.line_number_text, "009");
        assert_eq!(rows[0].right.line_number_text, "0009");
        assert_eq!(rows[1].left.line_number_text, "120");
        assert_eq!(rows[1].right.line_number_text, "1005");
        assert_eq!(rows[1].key.hunk, 1);
    }

    #[test]
    fn click_reports_side_and_number() {
        let rows = split_rows(&format_hunk_plain(&hunk(2, 5, &["-a", "+b"])));
        assert_eq!(rows[0].click(ClickSide::Left), Some(LineNumberClick { side: ClickSide::Left, line_number: 2 }));
        assert_eq!(rows[0].click(ClickSide::Right), Some(LineNumberClick { side: ClickSide::Right, line_number: 5 }));
        assert_eq!(rows[0].click(ClickSide::Unified), None);
    }
}
