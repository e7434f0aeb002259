/// How far past a cursor to search for the other side's current token.
const LOOKAHEAD: usize = 4;

/// One token-level span of a word diff. Neither flag set means unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDiffPart {
    pub value: String,
    pub added: bool,
    pub removed: bool,
}

impl WordDiffPart {
    fn unchanged(value: &str) -> Self {
        Self { value: value.to_string(), added: false, removed: false }
    }

    fn added(value: String) -> Self {
        Self { value, added: true, removed: false }
    }

    fn removed(value: String) -> Self {
        Self { value, added: false, removed: true }
    }

    /// Belongs to the old line (unchanged or removed)
    pub fn old_side(&self) -> bool {
        !self.added
    }

    /// Belongs to the new line (unchanged or added)
    pub fn new_side(&self) -> bool {
        !self.removed
    }

    pub fn is_unchanged(&self) -> bool {
        !self.added && !self.removed
    }
}

/// Split text into alternating word and whitespace-run tokens.
/// Concatenating the tokens gives back the input.
pub fn tokenize_words(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Heuristic word-level diff between two lines.
///
/// Walks both token streams with a bounded lookahead instead of computing an
/// LCS: a match ahead on the old side wins over one on the new side, and
/// when neither side finds one the current tokens are treated as a
/// replacement.
pub fn diff_words(old_text: &str, new_text: &str) -> Vec<WordDiffPart> {
    let old = tokenize_words(old_text);
    let new = tokenize_words(new_text);
    let mut parts = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            parts.push(WordDiffPart::unchanged(old[i]));
            i += 1;
            j += 1;
            continue;
        }

        let match_in_old = find_ahead(&old, i, new[j]);
        let match_in_new = find_ahead(&new, j, old[i]);

        if let Some(k) = match_in_old {
            parts.push(WordDiffPart::removed(old[i..k].concat()));
            i = k;
        } else if let Some(k) = match_in_new {
            parts.push(WordDiffPart::added(new[j..k].concat()));
            j = k;
        } else {
            parts.push(WordDiffPart::removed(old[i].to_string()));
            parts.push(WordDiffPart::added(new[j].to_string()));
            i += 1;
            j += 1;
        }
    }

    if i < old.len() {
        parts.push(WordDiffPart::removed(old[i..].concat()));
    }
    if j < new.len() {
        parts.push(WordDiffPart::added(new[j..].concat()));
    }

    parts
}

/// Index of `needle` within the `LOOKAHEAD` tokens after `cursor`.
fn find_ahead(tokens: &[&str], cursor: usize, needle: &str) -> Option<usize> {
    let end = (cursor + LOOKAHEAD).min(tokens.len().saturating_sub(1));
    (cursor + 1..=end).find(|&k| tokens[k] == needle)
}

/// Old line rebuilt from the unchanged and removed parts
pub fn reconstruct_old(parts: &[WordDiffPart]) -> String {
    parts.iter().filter(|p| p.old_side()).map(|p| p.value.as_str()).collect()
}

/// New line rebuilt from the unchanged and added parts
pub fn reconstruct_new(parts: &[WordDiffPart]) -> String {
    parts.iter().filter(|p| p.new_side()).map(|p| p.value.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flagged(parts: &[WordDiffPart]) -> (Vec<&str>, Vec<&str>) {
        let removed = parts.iter().filter(|p| p.removed).map(|p| p.value.as_str()).collect();
        let added = parts.iter().filter(|p| p.added).map(|p| p.value.as_str()).collect();
        (removed, added)
    }

    #[test]
    fn tokenize_keeps_whitespace_runs() {
        assert_eq!(tokenize_words("a  b\tc"), vec!["a", "  ", "b", "\t", "c"]);
        assert_eq!(tokenize_words("  lead"), vec!["  ", "lead"]);
        assert_eq!(tokenize_words("trail "), vec!["trail", " "]);
        assert!(tokenize_words("").is_empty());
    }

    #[test]
    fn single_token_change() {
        let parts = diff_words("const x = 1;", "const x = 2;");
        let (removed, added) = flagged(&parts);
        assert_eq!(removed, vec!["1;"]);
        assert_eq!(added, vec!["2;"]);
        let unchanged: String = parts.iter().filter(|p| p.is_unchanged()).map(|p| p.value.as_str()).collect();
        assert_eq!(unchanged, "const x = ");
    }

    #[test]
    fn inserted_word_found_by_lookahead() {
        // "mut" is new; old "x" is found two tokens ahead on the new side
        let parts = diff_words("let x = 1;", "let mut x = 1;");
        let (removed, added) = flagged(&parts);
        assert!(removed.is_empty());
        assert_eq!(added, vec!["mut "]);
    }

    #[test]
    fn deleted_word_found_by_lookahead() {
        let parts = diff_words("let mut x = 1;", "let x = 1;");
        let (removed, added) = flagged(&parts);
        assert_eq!(removed, vec!["mut "]);
        assert!(added.is_empty());
    }

    #[test]
    fn old_side_match_checked_first() {
        // Both lookaheads succeed: old has "b" ahead, new has "a" ahead.
        let parts = diff_words("a b", "b a");
        assert_eq!(parts[0], WordDiffPart::removed("a ".to_string()));
        assert_eq!(reconstruct_old(&parts), "a b");
        assert_eq!(reconstruct_new(&parts), "b a");
    }

    #[test]
    fn no_match_within_window_is_replacement() {
        let parts = diff_words("alpha", "omega");
        assert_eq!(
            parts,
            vec![
                WordDiffPart::removed("alpha".to_string()),
                WordDiffPart::added("omega".to_string()),
            ]
        );
    }

    #[test]
    fn match_beyond_window_is_ignored() {
        // "z" sits 6 tokens ahead on the old side, outside the window
        let parts = diff_words("a b c d z", "z");
        assert_eq!(parts[0], WordDiffPart::removed("a".to_string()));
        assert_eq!(parts[1], WordDiffPart::added("z".to_string()));
        assert_eq!(reconstruct_old(&parts), "a b c d z");
        assert_eq!(reconstruct_new(&parts), "z");
    }

    #[test]
    fn exhausted_side_flushes_remainder() {
        let parts = diff_words("same", "same plus more");
        assert_eq!(parts.last().map(|p| p.value.as_str()), Some(" plus more"));
        assert!(parts.last().is_some_and(|p| p.added));

        let parts = diff_words("", "new");
        assert_eq!(parts, vec![WordDiffPart::added("new".to_string())]);
    }

    #[test]
    fn reconstructs_both_sides() {
        let cases = [
            ("fn foo(a: u32) -> u32 {", "fn foo(a: u64, b: u64) -> u64 {"),
            ("    return x;", "    return   y ;"),
            ("", ""),
            ("only old", ""),
            ("\tindent  twice", "  indent\ttwice here"),
        ];
        for (old, new) in cases {
            let parts = diff_words(old, new);
            assert_eq!(reconstruct_old(&parts), old);
            assert_eq!(reconstruct_new(&parts), new);
        }
    }
}
