use ratatui::style::Style;
use ratatui::text::Span;

/// Replace tab characters with `tab_width` spaces
pub(crate) fn expand_tabs(text: &str, tab_width: u8) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    text.replace('\t', &" ".repeat(tab_width as usize))
}

/// Cut `spans` to exactly `width` characters, padding with `fill` when short.
/// Widths are measured in chars, not bytes.
pub(crate) fn fit_spans(spans: Vec<Span<'static>>, width: usize, fill: Style) -> Vec<Span<'static>> {
    let mut out = Vec::with_capacity(spans.len() + 1);
    let mut used = 0;
    for span in spans {
        if used >= width {
            break;
        }
        let len = span.content.chars().count();
        if used + len <= width {
            used += len;
            out.push(span);
        } else {
            let cut: String = span.content.chars().take(width - used).collect();
            used = width;
            out.push(Span::styled(cut, span.style));
        }
    }
    if used < width {
        out.push(Span::styled(" ".repeat(width - used), fill));
    }
    out
}
