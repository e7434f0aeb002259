use crate::git::{DiffFile, FileStatus};
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone, PartialEq)]
enum Matcher {
    Glob(Pattern),
    Status(StatusKind),
    /// Total changed lines strictly above the threshold
    MoreThan(usize),
    /// Total changed lines strictly below the threshold
    FewerThan(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StatusKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    include: bool,
    matcher: Matcher,
}

/// File list filter built from an expression like `+*.rs,-*.lock,added,>20`.
///
/// Segments are comma separated; a `-` prefix excludes, `+` (or nothing)
/// includes. Include rules are OR-ed together, any matching exclude rule
/// hides the file. Segments that do not parse are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileFilter {
    expr: String,
    rules: Vec<Rule>,
}

impl FileFilter {
    pub fn parse(expr: &str) -> Self {
        let rules = expr
            .split(',')
            .filter_map(|segment| {
                let segment = segment.trim();
                let (include, body) = match segment.strip_prefix('-') {
                    Some(rest) => (false, rest.trim()),
                    None => (true, segment.strip_prefix('+').unwrap_or(segment).trim()),
                };
                parse_matcher(body).map(|matcher| Rule { include, matcher })
            })
            .collect();

        FileFilter { expr: expr.trim().to_string(), rules }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `file` stays visible under this filter
    pub fn matches(&self, file: &DiffFile) -> bool {
        let mut includes = self.rules.iter().filter(|r| r.include).peekable();
        let included = includes.peek().is_none() || includes.any(|r| r.matcher.matches(file));

        included
            && !self
                .rules
                .iter()
                .any(|r| !r.include && r.matcher.matches(file))
    }
}

fn parse_matcher(body: &str) -> Option<Matcher> {
    if body.is_empty() {
        return None;
    }
    if let Some(n) = body.strip_prefix('>') {
        return n.trim().parse().ok().map(Matcher::MoreThan);
    }
    if let Some(n) = body.strip_prefix('<') {
        return n.trim().parse().ok().map(Matcher::FewerThan);
    }

    let status = match body.to_ascii_lowercase().as_str() {
        "added" => Some(StatusKind::Added),
        "modified" => Some(StatusKind::Modified),
        "deleted" => Some(StatusKind::Deleted),
        "renamed" => Some(StatusKind::Renamed),
        _ => None,
    };
    if let Some(status) = status {
        return Some(Matcher::Status(status));
    }

    match Pattern::new(body) {
        Ok(pattern) => Some(Matcher::Glob(pattern)),
        Err(e) => {
            log::debug!("Skipping invalid glob '{}': {}", body, e);
            None
        }
    }
}

impl Matcher {
    fn matches(&self, file: &DiffFile) -> bool {
        let changed = file.adds + file.dels;
        match self {
            Matcher::Glob(pattern) => pattern.matches_with(&file.path, MATCH_OPTIONS),
            Matcher::Status(kind) => matches!(
                (kind, &file.status),
                (StatusKind::Added, FileStatus::Added)
                    | (StatusKind::Modified, FileStatus::Modified)
                    | (StatusKind::Deleted, FileStatus::Deleted)
                    | (StatusKind::Renamed, FileStatus::Renamed(_))
            ),
            Matcher::MoreThan(n) => changed > *n,
            Matcher::FewerThan(n) => changed < *n,
        }
    }
}
