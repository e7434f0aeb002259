use anyhow::Result;
use crossterm::{
    queue,
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use ratatui::style::{Color, Modifier};
use ratatui::text::{Line, Span};
use std::io::Write;

use super::diff_view::pane_line;
use super::styles;
use crate::app::{render_highlighted, App};
use crate::syntax::{language_for_path, Tokenizer};

/// Write every visible file of `app` to `out` the way the diff pane shows it,
/// `width` columns wide. With `color` off the output is plain text.
pub fn print_app<W: Write, T: Tokenizer>(
    out: &mut W,
    app: &App,
    tokenizer: &T,
    width: usize,
    color: bool,
) -> Result<()> {
    for (_, file) in app.visible_files() {
        let lang = app
            .lang_override
            .as_deref()
            .unwrap_or_else(|| language_for_path(&file.path));

        let header = Line::from(vec![
            Span::styled(format!("{} ", file.status.symbol()), styles::status_modified()),
            Span::styled(file.path.clone(), ratatui::style::Style::default().fg(styles::BRIGHT)),
            Span::styled(
                format!("  +{} -{}", file.adds, file.dels),
                ratatui::style::Style::default().fg(styles::DIM),
            ),
        ]);
        write_line(out, &header, color)?;

        for line in render_highlighted(file, app.view_mode, tokenizer, lang, app.syntax) {
            write_line(out, &pane_line(&line, width, &app.config.display), color)?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn write_line<W: Write>(out: &mut W, line: &Line, color: bool) -> Result<()> {
    if !color {
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        writeln!(out, "{}", text.trim_end())?;
        return Ok(());
    }

    for span in &line.spans {
        if let Some(fg) = span.style.fg {
            queue!(out, SetForegroundColor(term_color(fg)))?;
        }
        if let Some(bg) = span.style.bg {
            queue!(out, SetBackgroundColor(term_color(bg)))?;
        }
        if span.style.add_modifier.contains(Modifier::BOLD) {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        queue!(out, Print(&span.content), SetAttribute(Attribute::Reset), ResetColor)?;
    }
    writeln!(out)?;
    Ok(())
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DiffSource, ViewMode};
    use crate::config::HlConfig;
    use crate::syntax::PlainTokenizer;

    const PATCH: &str = "diff --git a/notes.txt b/notes.txt
--- a/notes.txt
+++ b/notes.txt
@@ -1,2 +1,2 @@
 title
-old words here
+new words here
diff --git a/skip.lock b/skip.lock
--- a/skip.lock
+++ b/skip.lock
@@ -1 +1 @@
-a
+b
";

    fn printed(app: &App, color: bool) -> String {
        let mut out = Vec::new();
        print_app(&mut out, app, &PlainTokenizer, 40, color).expect("print");
        String::from_utf8(out).expect("utf8")
    }

    fn app() -> App {
        App::new(DiffSource::Stdin(PATCH.to_string()), HlConfig::default()).expect("app")
    }

    #[test]
    fn plain_unified_output() {
        let mut app = app();
        app.apply_filter_expr("-*.lock");
        let text = printed(&app, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "~ notes.txt  +1 -1",
                " @@ -1,2 +1,2 @@",
                "1 │ title",
                "  │-old words here",
                "2 │+new words here",
                "",
            ]
        );
    }

    #[test]
    fn split_output_puts_pair_on_one_row() {
        let mut app = app();
        app.view_mode = ViewMode::Split;
        let text = printed(&app, false);
        assert!(text.contains("2 │-old words here  2 │+new words here"));
        assert!(text.contains("skip.lock"));
    }

    /// Drop CSI sequences (`ESC [ ... final byte`)
    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn color_output_uses_escape_codes() {
        let mut app = app();
        app.apply_filter_expr("-*.lock");
        let text = printed(&app, true);
        assert!(text.contains("\u{1b}["));
        let stripped = strip_ansi(&text);
        assert!(stripped.contains("│-old words here"));
        assert!(stripped.contains("│+new words here"));
    }

    #[test]
    fn named_colors_map_to_terminal_palette() {
        assert_eq!(term_color(Color::Rgb(1, 2, 3)), TermColor::Rgb { r: 1, g: 2, b: 3 });
        assert_eq!(term_color(Color::LightRed), TermColor::Red);
        assert_eq!(term_color(Color::Indexed(7)), TermColor::AnsiValue(7));
    }
}
