use super::{number_width, Cell, ClickSide, LineNumberClick, RowType};
use crate::align::{DecoratedLine, LineContent, LineKey};

/// A single-column row: the new line number (when there is one) and content.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow {
    pub cell: Cell,
    pub key: LineKey,
}

impl UnifiedRow {
    pub fn line_number_text(&self) -> &str {
        &self.cell.line_number_text
    }

    pub fn content(&self) -> &LineContent {
        &self.cell.content
    }

    pub fn row_type(&self) -> RowType {
        self.cell.row_type
    }

    pub fn click(&self) -> Option<LineNumberClick> {
        self.cell.click(ClickSide::Unified)
    }
}

/// One row per decorated line, in order.
pub fn unified_rows(lines: &[DecoratedLine]) -> Vec<UnifiedRow> {
    let width = number_width(lines, |l| l.new_line_number);
    lines
        .iter()
        .map(|line| UnifiedRow {
            cell: Cell::new(line, line.new_line_number, width),
            key: line.key,
        })
        .collect()
}
