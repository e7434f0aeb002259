use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding},
    Frame,
};

use super::styles;
use crate::app::App;
use crate::git::FileStatus;

/// Render the file list panel (left side)
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let visible = app.visible_files();
    let total = app.files.len();

    let title = if app.filter.is_empty() {
        format!(" FILES ({}) ", total)
    } else {
        format!(" FILES ({}/{}) ", visible.len(), total)
    };

    // Only build items inside the viewport, keeping the selection in view
    let viewport_height = area.height.saturating_sub(1) as usize;
    let selected_pos = visible
        .iter()
        .position(|(i, _)| *i == app.selected_file)
        .unwrap_or(0);
    let start = viewport_start(selected_pos, visible.len(), viewport_height);
    let end = (start + viewport_height).min(visible.len());

    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .map(|(idx, file)| {
            let is_selected = *idx == app.selected_file;

            let symbol_style = match &file.status {
                FileStatus::Added => styles::status_added(),
                FileStatus::Deleted => styles::status_deleted(),
                FileStatus::Modified | FileStatus::Renamed(_) => styles::status_modified(),
            };

            let path_width = (area.width as usize).saturating_sub(14).max(1);
            let path = shorten_path(&file.path, path_width);

            let mut spans = vec![
                Span::styled(format!(" {} ", file.status.symbol()), symbol_style),
                Span::styled(
                    format!("{:<width$}", path, width = path_width),
                    if is_selected {
                        styles::selected_style()
                    } else {
                        Style::default().fg(styles::TEXT)
                    },
                ),
            ];
            if area.width > 24 {
                spans.push(Span::styled(
                    format!("{:>8} ", format!("+{} -{}", file.adds, file.dels)),
                    Style::default().fg(styles::DIM),
                ));
            }

            let line_style = if is_selected {
                styles::selected_style()
            } else {
                Style::default().bg(styles::PANEL)
            };
            ListItem::new(Line::from(spans)).style(line_style)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(styles::MUTED)))
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(styles::BORDER))
        .style(Style::default().bg(styles::PANEL))
        .padding(Padding::new(0, 0, 0, 0));

    f.render_widget(List::new(items).block(block), area);
}

/// First list position to draw so that `selected` stays roughly centered
fn viewport_start(selected: usize, len: usize, height: usize) -> usize {
    if len <= height || selected < height / 2 {
        0
    } else if selected > len.saturating_sub(height / 2) {
        len.saturating_sub(height)
    } else {
        selected.saturating_sub(height / 2)
    }
}

/// Shorten a file path to fit within max_width
fn shorten_path(path: &str, max_width: usize) -> String {
    if path.chars().count() <= max_width {
        return path.to_string();
    }

    // Try to show just the filename
    if let Some((dir, name)) = path.rsplit_once('/') {
        let name_len = name.chars().count();
        if name_len <= max_width {
            let remaining = max_width.saturating_sub(name_len + 4);
            if remaining > 0 {
                let dir_part: String = dir.chars().take(remaining).collect();
                return format!("{}…/{}", dir_part, name);
            }
            return name.to_string();
        }
        let truncated: String = name.chars().take(max_width.saturating_sub(1)).collect();
        return format!("{}…", truncated);
    }

    let truncated: String = path.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
}
