use anyhow::{Context, Result};
use ratatui::style::Color;
use syntect::highlighting::{
    HighlightIterator, HighlightState, Highlighter, Theme, ThemeSet,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

use super::{ColoredToken, Tokenized, Tokenizer};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax highlighting backed by syntect. Syntaxes and theme are loaded
/// once and reused for every line.
pub struct SyntectTokenizer {
    syntax_set: SyntaxSet,
    theme: Theme,
}

/// Parser and highlighter state carried from one line to the next
#[derive(Debug, Clone)]
pub struct SyntectState {
    parse: ParseState,
    highlight: HighlightState,
}

impl SyntectTokenizer {
    /// Load syntaxes (syntect defaults plus the two-face extras) and the
    /// named theme. Unknown theme names fall back to the dark default.
    pub fn new(theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                log::warn!("Unknown theme '{}', using {}", theme_name, DEFAULT_THEME);
                themes.remove(DEFAULT_THEME).unwrap_or_default()
            }
        };

        SyntectTokenizer {
            syntax_set: two_face::syntax::extra_newlines(),
            theme,
        }
    }

    /// Names of the built-in themes
    pub fn theme_names() -> Vec<String> {
        let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
        names.sort();
        names
    }

    fn syntax_for(&self, lang: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

impl Default for SyntectTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl Tokenizer for SyntectTokenizer {
    type State = SyntectState;

    fn initial_state(&self, lang: &str) -> Option<SyntectState> {
        let highlighter = Highlighter::new(&self.theme);
        Some(SyntectState {
            parse: ParseState::new(self.syntax_for(lang)),
            highlight: HighlightState::new(&highlighter, ScopeStack::new()),
        })
    }

    fn tokenize(&self, text: &str, _lang: &str, state: &SyntectState) -> Result<Tokenized<SyntectState>> {
        let mut next = state.clone();

        // syntect needs a trailing newline
        let input = format!("{}\n", text);
        let ops = next
            .parse
            .parse_line(&input, &self.syntax_set)
            .context("syntect failed to parse line")?;

        let highlighter = Highlighter::new(&self.theme);
        let tokens = HighlightIterator::new(&mut next.highlight, &ops, &input, &highlighter)
            .filter_map(|(style, piece)| {
                // Strip trailing newline we added
                let piece = piece.trim_end_matches('\n');
                if piece.is_empty() {
                    return None;
                }
                let fg = style.foreground;
                Some(ColoredToken {
                    text: piece.to_string(),
                    color: Some(Color::Rgb(fg.r, fg.g, fg.b)),
                })
            })
            .collect();

        Ok(Tokenized { tokens, next_state: next })
    }
}
