//! Row models for the two display modes. These only arrange decorated lines;
//! painting them is left to `ui`.

mod split;
mod unified;

pub use split::{split_rows, SplitRow};
pub use unified::{unified_rows, UnifiedRow};

use crate::align::{DecoratedLine, LineContent, LineKind};

/// What a cell shows: a diff line kind, or a placeholder in split view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowType {
    Add,
    Remove,
    NoChange,
    Empty,
}

impl From<LineKind> for RowType {
    fn from(kind: LineKind) -> Self {
        match kind {
            LineKind::Add => RowType::Add,
            LineKind::Remove => RowType::Remove,
            LineKind::NoChange => RowType::NoChange,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickSide {
    Left,
    Right,
    Unified,
}

/// Raised by the presentation layer when a line number is clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberClick {
    pub side: ClickSide,
    pub line_number: usize,
}

/// One column of a rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Right-aligned to the column width; blank when there is no number
    pub line_number_text: String,
    pub line_number: Option<usize>,
    pub content: LineContent,
    pub row_type: RowType,
}

impl Cell {
    fn new(line: &DecoratedLine, number: Option<usize>, width: usize) -> Self {
        Cell {
            line_number_text: pad_number(number, width),
            line_number: number,
            content: line.content.clone(),
            row_type: line.kind.into(),
        }
    }

    fn empty(width: usize) -> Self {
        Cell {
            line_number_text: " ".repeat(width),
            line_number: None,
            content: LineContent::Plain(String::new()),
            row_type: RowType::Empty,
        }
    }

    pub fn click(&self, side: ClickSide) -> Option<LineNumberClick> {
        self.line_number.map(|line_number| LineNumberClick { side, line_number })
    }
}

/// Digits needed for the widest number picked from `lines`
pub(crate) fn number_width(lines: &[DecoratedLine], pick: impl Fn(&DecoratedLine) -> Option<usize>) -> usize {
    lines
        .iter()
        .filter_map(pick)
        .max()
        .map_or(1, |n| n.to_string().len())
}

fn pad_number(number: Option<usize>, width: usize) -> String {
    match number {
        Some(n) => format!("{:0>width$}", n, width = width),
        None => " ".repeat(width),
    }
}
