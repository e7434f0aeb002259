mod diff_view;
mod file_tree;
pub mod print;
mod status_bar;
mod styles;
mod utils;

pub use diff_view::click_at;

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

/// Width of the file list column
const FILE_TREE_WIDTH: u16 = 32;

/// Screen regions of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub file_tree: Rect,
    pub diff: Rect,
    pub status: Rect,
}

/// Split the terminal into file list, diff pane and status bar.
/// Narrow terminals drop the file list.
pub fn layout(area: Rect) -> Areas {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(area);

    let tree_width = if outer[0].width < 80 { 0 } else { FILE_TREE_WIDTH };
    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(tree_width),
            Constraint::Min(1),
        ])
        .split(outer[0]);

    Areas {
        file_tree: main_area[0],
        diff: main_area[1],
        status: outer[1],
    }
}

/// Render the entire UI
pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout(f.area());
    if areas.file_tree.width > 0 {
        file_tree::render(f, areas.file_tree, app);
    }
    diff_view::render(f, areas.diff, app);
    status_bar::render(f, areas.status, app);
}
