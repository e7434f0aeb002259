pub mod highlight;
pub mod lang;

use anyhow::Result;
use ratatui::style::Color;

pub use highlight::SyntectTokenizer;
pub use lang::language_for_path;

/// A run of text with an optional foreground color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoredToken {
    pub text: String,
    pub color: Option<Color>,
}

impl ColoredToken {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), color: None }
    }
}

/// Tokens for one line plus the state to feed into the next line
#[derive(Debug, Clone)]
pub struct Tokenized<S> {
    pub tokens: Vec<ColoredToken>,
    pub next_state: S,
}

/// Line-at-a-time syntax tokenizer.
///
/// The continuation state is an explicit value so that callers can keep
/// several independent streams over the same text (e.g. the old and new side
/// of a hunk) without sharing a mutable highlighter.
pub trait Tokenizer {
    type State: Clone;

    /// Starting state for `lang`, or `None` when the language is unknown.
    fn initial_state(&self, lang: &str) -> Option<Self::State>;

    fn tokenize(&self, text: &str, lang: &str, state: &Self::State) -> Result<Tokenized<Self::State>>;
}

/// Tokenizer that emits each line as a single uncolored token.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    type State = ();

    fn initial_state(&self, _lang: &str) -> Option<()> {
        Some(())
    }

    fn tokenize(&self, text: &str, _lang: &str, _state: &()) -> Result<Tokenized<()>> {
        let tokens = if text.is_empty() {
            Vec::new()
        } else {
            vec![ColoredToken::plain(text)]
        };
        Ok(Tokenized { tokens, next_state: () })
    }
}
