use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::styles;
use crate::app::{App, InputMode};
use crate::view::ClickSide;

/// Compute the display width of a list of spans
fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.content.chars().count()).sum()
}

struct Hint {
    key: &'static str,
    label: &'static str,
}

impl Hint {
    const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }

    fn width(&self) -> usize {
        self.key.chars().count() + self.label.chars().count()
    }
}

const HINTS: &[Hint] = &[
    Hint::new("j/k", " scroll "),
    Hint::new("n/p", " file "),
    Hint::new("]/[", " hunk "),
    Hint::new("s", " split "),
    Hint::new("y", " syntax "),
    Hint::new("f", " filter "),
    Hint::new("r", " reload "),
    Hint::new("w", " watch "),
    Hint::new("S", " save "),
    Hint::new("q", " quit "),
];

/// Left part of the bar: mode, source, filter, watch state, last click
fn status_spans(app: &App) -> Vec<Span<'static>> {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.view_mode.label()),
            Style::default()
                .fg(styles::BG)
                .bg(styles::BLUE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", app.source.label()),
            Style::default().fg(styles::CYAN),
        ),
        Span::styled(
            format!(" · {}", app.language()),
            Style::default().fg(styles::DIM),
        ),
    ];
    if !app.filter.is_empty() {
        spans.push(Span::styled(
            format!(" F:{}", app.filter.expr()),
            Style::default().fg(styles::YELLOW),
        ));
    }
    if app.watching {
        spans.push(Span::styled(" ●", Style::default().fg(styles::GREEN)));
    }
    if let Some(click) = app.last_click {
        let side = match click.side {
            ClickSide::Left => "old",
            ClickSide::Right | ClickSide::Unified => "new",
        };
        spans.push(Span::styled(
            format!(" L{} ({})", click.line_number, side),
            Style::default().fg(styles::PURPLE),
        ));
    }
    spans.push(Span::raw(" "));
    spans
}

/// Right part: the transient message, or as many key hints as fit
fn trailing_spans(app: &App, room: usize) -> Vec<Span<'static>> {
    if let Some(msg) = &app.message {
        return vec![
            Span::styled("● ", Style::default().fg(styles::GREEN)),
            Span::styled(format!("{} ", msg), Style::default().fg(styles::BRIGHT)),
        ];
    }

    let mut spans = Vec::new();
    let mut used = 0;
    for hint in HINTS {
        if used + hint.width() > room {
            break;
        }
        spans.push(Span::styled(hint.key, styles::key_hint_style()));
        spans.push(Span::styled(hint.label, Style::default().fg(styles::DIM)));
        used += hint.width();
    }
    spans
}

/// Filter prompt shown while typing an expression
fn filter_prompt_spans(app: &App) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            " filter ",
            Style::default()
                .fg(styles::BG)
                .bg(styles::YELLOW)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", app.filter_input), Style::default().fg(styles::TEXT)),
        Span::styled("█", Style::default().fg(styles::YELLOW)),
        Span::styled("  Enter", styles::key_hint_style()),
        Span::styled(" apply ", Style::default().fg(styles::DIM)),
        Span::styled("Esc", styles::key_hint_style()),
        Span::styled(" cancel", Style::default().fg(styles::DIM)),
    ]
}

/// Render the one-line status bar
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let panel_bg = Style::default().bg(styles::PANEL).fg(styles::TEXT);
    if app.input_mode == InputMode::Filter {
        f.render_widget(Paragraph::new(Line::from(filter_prompt_spans(app))).style(panel_bg), area);
        return;
    }

    let width = area.width as usize;
    let mut spans = status_spans(app);
    let left = spans_width(&spans);
    let trailing = trailing_spans(app, width.saturating_sub(left));
    let gap = width.saturating_sub(left + spans_width(&trailing));
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(trailing);

    f.render_widget(Paragraph::new(Line::from(spans)).style(panel_bg), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DiffSource;
    use crate::config::HlConfig;
    use crate::view::LineNumberClick;

    fn app() -> App {
        App::new(DiffSource::Stdin(String::new()), HlConfig::default()).expect("app")
    }

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn status_shows_mode_and_click() {
        let mut app = app();
        app.record_click(LineNumberClick { side: ClickSide::Left, line_number: 42 });
        let status = text(&status_spans(&app));
        assert!(status.starts_with(" UNIFIED  <stdin>"));
        assert!(status.contains("L42 (old)"));
    }

    #[test]
    fn hints_stop_when_out_of_room() {
        let app = app();
        let all = text(&trailing_spans(&app, 500));
        assert!(all.contains("q quit"));
        let few = text(&trailing_spans(&app, 20));
        assert!(few.contains("j/k scroll"));
        assert!(!few.contains("quit"));
    }

    #[test]
    fn filter_prompt_echoes_input() {
        let mut app = app();
        app.start_filter();
        app.filter_input.push_str("-*.lock");
        assert!(text(&filter_prompt_spans(&app)).starts_with(" filter  -*.lock█"));
    }

    #[test]
    fn message_replaces_hints() {
        let mut app = app();
        app.notify("Reloaded");
        assert_eq!(text(&trailing_spans(&app, 500)), "● Reloaded ");
    }
}
