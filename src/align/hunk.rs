use std::fmt;

use ratatui::style::Color;

use super::pairing::{find_line_pairs, LinePair};
use super::similarity::similarity;
use super::word_diff::{diff_words, WordDiffPart};
use crate::syntax::{ColoredToken, PlainTokenizer, Tokenizer};

/// Pairs scoring below this are shown as a plain replacement
pub const WORD_DIFF_THRESHOLD: f64 = 0.5;

/// A contiguous change region of a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct Hunk {
    /// The `@@ -a,b +c,d @@ ...` line, empty when unknown
    pub header: String,
    pub old_start: usize,
    pub new_start: usize,
    /// Raw lines, each still carrying its `+`, `-` or ` ` prefix
    pub lines: Vec<String>,
}

impl Hunk {
    /// Build a hunk; missing start counters default to 1.
    pub fn new(old_start: Option<usize>, new_start: Option<usize>, lines: Vec<String>) -> Self {
        Self {
            header: String::new(),
            old_start: old_start.unwrap_or(1),
            new_start: new_start.unwrap_or(1),
            lines,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Add,
    Remove,
    NoChange,
}

impl LineKind {
    /// Shown on the old side of the diff
    pub fn in_before(self) -> bool {
        matches!(self, LineKind::Remove | LineKind::NoChange)
    }

    /// Shown on the new side of the diff
    pub fn in_after(self) -> bool {
        matches!(self, LineKind::Add | LineKind::NoChange)
    }
}

/// A hunk line with its prefix stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedLine {
    pub code: String,
    pub kind: LineKind,
}

impl ProcessedLine {
    /// Anything not starting with `+` or `-` counts as unchanged; only a
    /// leading space is stripped from those.
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix('+') {
            Self { code: rest.to_string(), kind: LineKind::Add }
        } else if let Some(rest) = raw.strip_prefix('-') {
            Self { code: rest.to_string(), kind: LineKind::Remove }
        } else {
            let code = raw.strip_prefix(' ').unwrap_or(raw);
            Self { code: code.to_string(), kind: LineKind::NoChange }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    None,
    Added,
    Removed,
}

/// A styled piece of a rendered line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub color: Option<Color>,
    pub emphasis: Emphasis,
}

impl From<ColoredToken> for Segment {
    fn from(token: ColoredToken) -> Self {
        Segment { text: token.text, color: token.color, emphasis: Emphasis::None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    Plain(String),
    Segments(Vec<Segment>),
}

impl LineContent {
    /// The unstyled text of the line
    pub fn text(&self) -> String {
        match self {
            LineContent::Plain(s) => s.clone(),
            LineContent::Segments(segs) => segs.iter().map(|s| s.text.as_str()).collect(),
        }
    }

    /// True when any part carries word-level highlighting
    pub fn has_emphasis(&self) -> bool {
        match self {
            LineContent::Plain(_) => false,
            LineContent::Segments(segs) => segs.iter().any(|s| s.emphasis != Emphasis::None),
        }
    }
}

/// Stable identity of a decorated line: hunk index and line index within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub hunk: usize,
    pub line: usize,
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.hunk, self.line)
    }
}

/// A render-ready hunk line.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratedLine {
    pub old_line_number: Option<usize>,
    pub new_line_number: Option<usize>,
    pub content: LineContent,
    pub kind: LineKind,
    /// Index of the opposite half of a line pair in the same list
    pub paired_with: Option<usize>,
    pub key: LineKey,
}

impl DecoratedLine {
    pub fn old_label(&self) -> String {
        self.old_line_number.map(|n| n.to_string()).unwrap_or_default()
    }

    pub fn new_label(&self) -> String {
        self.new_line_number.map(|n| n.to_string()).unwrap_or_default()
    }
}

/// Tokenizer plus the language to tokenize as
pub struct Highlight<'a, T: Tokenizer> {
    pub tokenizer: &'a T,
    pub lang: &'a str,
}

impl<'a, T: Tokenizer> Highlight<'a, T> {
    pub fn new(tokenizer: &'a T, lang: &'a str) -> Self {
        Self { tokenizer, lang }
    }
}

impl<T: Tokenizer> Clone for Highlight<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Tokenizer> Copy for Highlight<'_, T> {}

/// Format one hunk into decorated lines.
pub fn format_hunk<T: Tokenizer>(hunk: &Hunk, highlight: Option<Highlight<'_, T>>) -> Vec<DecoratedLine> {
    format_hunk_at(hunk, 0, highlight)
}

/// Format one hunk without syntax coloring or word diffs.
pub fn format_hunk_plain(hunk: &Hunk) -> Vec<DecoratedLine> {
    format_hunk::<PlainTokenizer>(hunk, None)
}

/// Format every hunk of a file into one list. Keys carry the hunk index and
/// `paired_with` indexes into the combined list.
pub fn format_hunks<T: Tokenizer>(hunks: &[Hunk], highlight: Option<Highlight<'_, T>>) -> Vec<DecoratedLine> {
    let mut out = Vec::with_capacity(hunks.iter().map(|h| h.lines.len()).sum());
    for (hunk_index, hunk) in hunks.iter().enumerate() {
        let offset = out.len();
        out.extend(format_hunk_at(hunk, hunk_index, highlight).into_iter().map(|mut line| {
            line.paired_with = line.paired_with.map(|idx| idx + offset);
            line
        }));
    }
    out
}

struct PairInfo {
    pair: LinePair,
    /// Present only when the pair is close enough for a word diff
    parts: Option<Vec<WordDiffPart>>,
}

fn format_hunk_at<T: Tokenizer>(
    hunk: &Hunk,
    hunk_index: usize,
    highlight: Option<Highlight<'_, T>>,
) -> Vec<DecoratedLine> {
    let lines: Vec<ProcessedLine> = hunk.lines.iter().map(|l| ProcessedLine::parse(l)).collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let (before, after) = match highlight {
        Some(hl) => (
            tokenize_view(&lines, hl, LineKind::in_before),
            tokenize_view(&lines, hl, LineKind::in_after),
        ),
        None => (vec![None; lines.len()], vec![None; lines.len()]),
    };

    let pairs: Vec<PairInfo> = find_line_pairs(&lines)
        .into_iter()
        .map(|pair| {
            let old = &lines[pair.remove_index].code;
            let new = &lines[pair.add_index].code;
            let parts = (highlight.is_some() && similarity(old, new) >= WORD_DIFF_THRESHOLD)
                .then(|| diff_words(old, new));
            PairInfo { pair, parts }
        })
        .collect();

    let mut pair_of: Vec<Option<&PairInfo>> = vec![None; lines.len()];
    for info in &pairs {
        pair_of[info.pair.remove_index] = Some(info);
        pair_of[info.pair.add_index] = Some(info);
    }

    let mut old_no = hunk.old_start;
    let mut new_no = hunk.new_start;
    let mut out = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let paired = pair_of[idx];
        let paired_with = paired.map(|info| match line.kind {
            LineKind::Remove => info.pair.add_index,
            _ => info.pair.remove_index,
        });

        let word_diff = paired.and_then(|info| info.parts.as_deref());
        let content = match word_diff {
            Some(parts) => word_diff_content(parts, line.kind),
            None => {
                let tokens = match line.kind {
                    LineKind::Remove => before[idx].as_ref(),
                    LineKind::Add => after[idx].as_ref(),
                    LineKind::NoChange => before[idx].as_ref().or(after[idx].as_ref()),
                };
                token_content(&line.code, tokens)
            }
        };

        let (old_line_number, new_line_number) = match line.kind {
            LineKind::Remove => {
                old_no += 1;
                (Some(old_no - 1), None)
            }
            LineKind::Add => {
                new_no += 1;
                (None, Some(new_no - 1))
            }
            LineKind::NoChange => {
                old_no += 1;
                new_no += 1;
                (Some(old_no - 1), Some(new_no - 1))
            }
        };

        out.push(DecoratedLine {
            old_line_number,
            new_line_number,
            content,
            kind: line.kind,
            paired_with,
            key: LineKey { hunk: hunk_index, line: idx },
        });
    }

    out
}

/// Tokenize the lines belonging to one side of the hunk, threading the
/// continuation state only through those lines. A failed line gets no
/// tokens and leaves the state untouched.
fn tokenize_view<T: Tokenizer>(
    lines: &[ProcessedLine],
    hl: Highlight<'_, T>,
    include: fn(LineKind) -> bool,
) -> Vec<Option<Vec<ColoredToken>>> {
    let mut out = vec![None; lines.len()];
    let Some(mut state) = hl.tokenizer.initial_state(hl.lang) else {
        log::debug!("no tokenizer state for language {:?}", hl.lang);
        return out;
    };

    for (idx, line) in lines.iter().enumerate() {
        if !include(line.kind) {
            continue;
        }
        match hl.tokenizer.tokenize(&line.code, hl.lang, &state) {
            Ok(tokenized) => {
                out[idx] = Some(tokenized.tokens);
                state = tokenized.next_state;
            }
            Err(e) => {
                log::debug!("tokenize failed on line {}: {:#}", idx, e);
            }
        }
    }
    out
}

fn word_diff_content(parts: &[WordDiffPart], kind: LineKind) -> LineContent {
    let segments = parts
        .iter()
        .filter(|p| match kind {
            LineKind::Remove => p.old_side(),
            _ => p.new_side(),
        })
        .map(|p| Segment {
            text: p.value.clone(),
            color: None,
            emphasis: if p.removed {
                Emphasis::Removed
            } else if p.added {
                Emphasis::Added
            } else {
                Emphasis::None
            },
        })
        .collect();
    LineContent::Segments(segments)
}

fn token_content(code: &str, tokens: Option<&Vec<ColoredToken>>) -> LineContent {
    match tokens {
        Some(tokens) if !tokens.is_empty() => {
            LineContent::Segments(tokens.iter().cloned().map(Segment::from).collect())
        }
        _ => LineContent::Plain(code.to_string()),
    }
}
