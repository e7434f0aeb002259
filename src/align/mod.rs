//! Line alignment for patch hunks: numbering, remove/add pairing, and
//! word-level highlighting of lines that look like edits.

mod hunk;
mod pairing;
mod similarity;
mod word_diff;

pub use hunk::{
    format_hunk, format_hunk_plain, format_hunks, DecoratedLine, Emphasis, Highlight, Hunk,
    LineContent, LineKey, LineKind, ProcessedLine, Segment, WORD_DIFF_THRESHOLD,
};
pub use pairing::{find_line_pairs, LinePair};
pub use similarity::{levenshtein, similarity};
pub use word_diff::{diff_words, reconstruct_new, reconstruct_old, tokenize_words, WordDiffPart};
