use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::styles;
use super::utils::{expand_tabs, fit_spans};
use crate::align::LineContent;
use crate::app::{App, PaneLine};
use crate::config::DisplayConfig;
use crate::git::FileStatus;
use crate::view::{Cell, ClickSide, LineNumberClick, RowType};

/// Render the diff pane (right side)
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let file = match app.selected_diff_file() {
        Some(file) => file,
        None => {
            render_empty(f, area, app);
            return;
        }
    };

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);

    // File header
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {} ", file.status.symbol()),
            match &file.status {
                FileStatus::Added => styles::status_added(),
                FileStatus::Deleted => styles::status_deleted(),
                _ => styles::status_modified(),
            },
        ),
        Span::styled(file.path.clone(), Style::default().fg(styles::BRIGHT)),
        Span::styled(
            match &file.status {
                FileStatus::Renamed(from) => format!("  (from {})", from),
                _ => String::new(),
            },
            Style::default().fg(styles::MUTED),
        ),
        Span::styled(
            format!("  +{} -{}", file.adds, file.dels),
            Style::default().fg(styles::DIM),
        ),
    ]));

    let body = body_area(area);
    let width = body.width as usize;
    lines.extend(
        app.pane_lines()
            .iter()
            .skip(app.scroll)
            .take(body.height as usize)
            .map(|line| pane_line(line, width, &app.config.display)),
    );

    let block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(styles::BG));
    f.render_widget(Paragraph::new(lines).block(block), area);

    // Position indicator in the top-right corner
    let total = app.pane_len();
    if total > 0 {
        let indicator_text = format!("{}/{} ", (app.scroll + 1).min(total), total);
        let indicator_width = indicator_text.chars().count() as u16;
        let indicator_area = Rect {
            x: area.x + area.width.saturating_sub(indicator_width),
            y: area.y,
            width: indicator_width.min(area.width),
            height: 1,
        };
        let indicator = Paragraph::new(Line::from(Span::styled(
            indicator_text,
            Style::default().fg(styles::MUTED),
        )));
        f.render_widget(indicator, indicator_area);
    }
}

/// Area holding pane lines: everything below the file header
fn body_area(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y.saturating_add(1),
        width: area.width,
        height: area.height.saturating_sub(1),
    }
}

/// Build one terminal line, exactly `width` columns wide
pub(crate) fn pane_line(line: &PaneLine, width: usize, display: &DisplayConfig) -> Line<'static> {
    match line {
        PaneLine::HunkHeader(header) => {
            let style = styles::hunk_header_style();
            Line::from(fit_spans(vec![Span::styled(format!(" {}", header), style)], width, style))
        }
        PaneLine::Unified(row) => {
            let fill = styles::row_style(row.row_type());
            Line::from(fit_spans(cell_spans(&row.cell, display), width, fill))
        }
        PaneLine::Split(row) => {
            let half = width / 2;
            let mut spans = fit_spans(
                cell_spans(&row.left, display),
                half,
                styles::row_style(row.left.row_type),
            );
            spans.extend(fit_spans(
                cell_spans(&row.right, display),
                width - half,
                styles::row_style(row.right.row_type),
            ));
            Line::from(spans)
        }
    }
}

/// Gutter, prefix and content of one cell
fn cell_spans(cell: &Cell, display: &DisplayConfig) -> Vec<Span<'static>> {
    let base = styles::row_style(cell.row_type);
    let mut spans = Vec::new();
    if display.line_numbers {
        spans.push(Span::styled(
            format!("{} │", cell.line_number_text),
            styles::gutter_style(cell.row_type),
        ));
    }
    let prefix = match cell.row_type {
        RowType::Add => "+",
        RowType::Remove => "-",
        RowType::NoChange | RowType::Empty => " ",
    };
    spans.push(Span::styled(prefix, base));
    spans.extend(content_spans(&cell.content, base, display.tab_width));
    spans
}

/// Syntax colors go in the foreground, word-diff emphasis in the background
fn content_spans(content: &LineContent, base: Style, tab_width: u8) -> Vec<Span<'static>> {
    match content {
        LineContent::Plain(text) => vec![Span::styled(expand_tabs(text, tab_width), base)],
        LineContent::Segments(segments) => segments
            .iter()
            .map(|segment| {
                let style = match segment.color {
                    Some(color) => base.fg(color),
                    None => base,
                };
                Span::styled(
                    expand_tabs(&segment.text, tab_width),
                    styles::emphasis_style(style, segment.emphasis),
                )
            })
            .collect(),
    }
}

/// Columns taken by a cell's line-number gutter (digits, space, bar)
fn gutter_width(cell: &Cell) -> usize {
    cell.line_number_text.chars().count() + 2
}

/// Map a mouse position inside the diff pane `area` to the line number
/// under it, if the position is on a gutter showing a number.
pub fn click_at(app: &App, area: Rect, column: u16, row: u16) -> Option<LineNumberClick> {
    if !app.config.display.line_numbers {
        return None;
    }
    let body = body_area(area);
    if column < body.x || column >= body.x + body.width || row < body.y || row >= body.y + body.height {
        return None;
    }

    let x = (column - body.x) as usize;
    let index = app.scroll + (row - body.y) as usize;
    match app.pane_lines().get(index)? {
        PaneLine::HunkHeader(_) => None,
        PaneLine::Unified(line) => {
            if x < gutter_width(&line.cell) {
                line.click()
            } else {
                None
            }
        }
        PaneLine::Split(line) => {
            let half = body.width as usize / 2;
            if x < gutter_width(&line.left).min(half) {
                line.click(ClickSide::Left)
            } else if x >= half && x - half < gutter_width(&line.right) {
                line.click(ClickSide::Right)
            } else {
                None
            }
        }
    }
}

/// Render an empty state when no file is selected
fn render_empty(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(styles::BG));

    let hint = if app.files.is_empty() {
        "  No changes"
    } else {
        "  No files match the filter"
    };
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(styles::MUTED))),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.source.label()),
            Style::default().fg(styles::DIM),
        )),
    ])
    .block(block);

    f.render_widget(text, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DiffSource;
    use crate::config::HlConfig;
    use crate::syntax::PlainTokenizer;

    const PATCH: &str = "diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -8,3 +8,3 @@
 keep
-let x = 1;
+let x = 2;
 end
";

    fn app(split: bool) -> App {
        let mut config = HlConfig::default();
        config.display.split_view = split;
        let mut app = App::new(DiffSource::Stdin(PATCH.to_string()), config).expect("app");
        app.ensure_rendered(&PlainTokenizer);
        app
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    const AREA: Rect = Rect { x: 30, y: 2, width: 60, height: 20 };

    #[test]
    fn unified_line_fills_width() {
        let app = app(false);
        let line = pane_line(&app.pane_lines()[2], 40, &app.config.display);
        let rendered = text(&line);
        assert_eq!(rendered.chars().count(), 40);
        // removed lines have no new-side number
        assert!(rendered.starts_with("   │-let x = 1;"));
    }

    #[test]
    fn emphasis_gets_stronger_background() {
        let app = app(false);
        let line = pane_line(&app.pane_lines()[3], 40, &app.config.display);
        let emphasized: Vec<&Span> = line
            .spans
            .iter()
            .filter(|s| s.style.bg == Some(styles::ADD_EMPH_BG))
            .collect();
        assert_eq!(emphasized.len(), 1);
        assert_eq!(emphasized[0].content, "2;");
    }

    #[test]
    fn split_line_has_two_halves() {
        let app = app(true);
        let line = pane_line(&app.pane_lines()[2], 40, &app.config.display);
        let rendered = text(&line);
        assert_eq!(rendered.chars().count(), 40);
        assert!(rendered.starts_with("09 │-let x = 1;"));
        assert_eq!(&rendered.chars().skip(20).take(6).collect::<String>(), "09 │+l");
    }

    #[test]
    fn hidden_numbers_drop_the_gutter() {
        let mut app = app(false);
        app.config.display.line_numbers = false;
        let line = pane_line(&app.pane_lines()[1], 20, &app.config.display);
        assert!(text(&line).starts_with(" keep"));
        assert_eq!(click_at(&app, AREA, AREA.x, AREA.y + 2), None);
    }

    #[test]
    fn unified_gutter_click() {
        let app = app(false);
        // header row, then hunk header, then " keep"
        assert_eq!(click_at(&app, AREA, AREA.x, AREA.y + 1), None);
        assert_eq!(
            click_at(&app, AREA, AREA.x + 1, AREA.y + 2),
            Some(LineNumberClick { side: ClickSide::Unified, line_number: 8 })
        );
        assert_eq!(click_at(&app, AREA, AREA.x + 6, AREA.y + 2), None);
        // removed line has no new number
        assert_eq!(click_at(&app, AREA, AREA.x, AREA.y + 3), None);
    }

    #[test]
    fn split_gutter_click_reports_side() {
        let app = app(true);
        let row = AREA.y + 3;
        assert_eq!(
            click_at(&app, AREA, AREA.x, row),
            Some(LineNumberClick { side: ClickSide::Left, line_number: 9 })
        );
        assert_eq!(
            click_at(&app, AREA, AREA.x + 30, row),
            Some(LineNumberClick { side: ClickSide::Right, line_number: 9 })
        );
        assert_eq!(click_at(&app, AREA, AREA.x + 29, row), None);
    }

    #[test]
    fn click_outside_pane_is_ignored() {
        let app = app(false);
        assert_eq!(click_at(&app, AREA, AREA.x - 1, AREA.y + 2), None);
        assert_eq!(click_at(&app, AREA, AREA.x, AREA.y + 19 + 1), None);
        assert_eq!(click_at(&app, AREA, AREA.x, AREA.y + 15), None);
    }

    #[test]
    fn scroll_shifts_clicked_row() {
        let mut app = app(false);
        app.scroll_by(1);
        assert_eq!(
            click_at(&app, AREA, AREA.x, AREA.y + 1),
            Some(LineNumberClick { side: ClickSide::Unified, line_number: 8 })
        );
    }
}
