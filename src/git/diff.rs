use super::status::FileStatus;
use crate::align::Hunk;

/// A file with its diff hunks and metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DiffFile {
    pub path: String,
    pub status: FileStatus,
    pub hunks: Vec<Hunk>,
    pub adds: usize,
    pub dels: usize,
}

impl DiffFile {
    fn new(path: String) -> Self {
        DiffFile {
            path,
            status: FileStatus::Modified, // refined by later header lines
            hunks: Vec::new(),
            adds: 0,
            dels: 0,
        }
    }
}

/// Parsed `@@ -a,b +c,d @@ context` line
#[derive(Debug, Clone, PartialEq)]
struct HunkHeader {
    text: String,
    old_start: Option<usize>,
    old_count: Option<usize>,
    new_start: Option<usize>,
    new_count: Option<usize>,
}

/// Lines still expected in the open hunk, when the header told us
#[derive(Debug, Clone, Copy)]
struct Remaining {
    old: usize,
    new: usize,
}

impl Remaining {
    fn done(&self) -> bool {
        self.old == 0 && self.new == 0
    }
}

/// Parse unified diff output (git or plain `---`/`+++` patches) into files
/// and hunks. Hunk lines keep their `+`/`-`/` ` prefix.
pub fn parse_diff(raw: &str) -> Vec<DiffFile> {
    let mut files: Vec<DiffFile> = Vec::new();
    let mut current_file: Option<DiffFile> = None;
    let mut current_hunk: Option<Hunk> = None;
    let mut remaining: Option<Remaining> = None;

    for line in raw.lines() {
        let in_hunk = current_hunk.is_some() && remaining.map_or(true, |r| !r.done());

        if in_hunk && is_hunk_content(line) && !starts_new_section(line, remaining) {
            if let (Some(hunk), Some(file)) = (current_hunk.as_mut(), current_file.as_mut()) {
                push_hunk_line(hunk, file, line, &mut remaining);
            }
            continue;
        }

        // Anything else closes the open hunk
        if let Some(hunk) = current_hunk.take() {
            if let Some(ref mut file) = current_file {
                file.hunks.push(hunk);
            }
        }
        remaining = None;

        // New file header: diff --git a/path b/path
        if line.starts_with("diff --git") {
            if let Some(file) = current_file.take() {
                files.push(file);
            }
            let path = line.split(" b/").last().unwrap_or("").to_string();
            current_file = Some(DiffFile::new(path));
            continue;
        }

        // Plain patches have no `diff --git` line; a `---` after hunks starts the next file
        if line.starts_with("--- ") {
            let start_new = current_file.as_ref().map_or(true, |f| !f.hunks.is_empty());
            if start_new {
                if let Some(file) = current_file.take() {
                    files.push(file);
                }
                current_file = Some(DiffFile::new(String::new()));
            }
            if line == "--- /dev/null" {
                if let Some(ref mut file) = current_file {
                    file.status = FileStatus::Added;
                }
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("+++ ") {
            if let Some(ref mut file) = current_file {
                if rest == "/dev/null" {
                    file.status = FileStatus::Deleted;
                } else if file.path.is_empty() {
                    file.path = strip_patch_path(rest);
                }
            }
            continue;
        }

        if let Some(ref mut file) = current_file {
            if line.starts_with("new file") {
                file.status = FileStatus::Added;
                continue;
            }
            if line.starts_with("deleted file") {
                file.status = FileStatus::Deleted;
                continue;
            }
            if let Some(old_path) = line.strip_prefix("rename from ") {
                file.status = FileStatus::Renamed(old_path.to_string());
                continue;
            }
        }

        if let Some(header) = parse_hunk_header(line) {
            if current_file.is_none() {
                // Bare hunks with no file header at all
                current_file = Some(DiffFile::new(String::new()));
            }
            remaining = match (header.old_count, header.new_count) {
                (Some(old), Some(new)) => Some(Remaining { old, new }),
                _ => None,
            };
            current_hunk = Some(
                Hunk::new(header.old_start, header.new_start, Vec::new()).with_header(header.text),
            );
        }
        // Other header lines (index, mode, similarity) are skipped
    }

    // Don't forget the last hunk/file
    if let Some(hunk) = current_hunk {
        if let Some(ref mut file) = current_file {
            file.hunks.push(hunk);
        }
    }
    if let Some(file) = current_file {
        files.push(file);
    }

    files
}

fn is_hunk_content(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('+')
        || line.starts_with('-')
        || line.starts_with(' ')
        || line.starts_with('\\')
}

/// Without counts from the header we cannot tell a removed `-- x` line from
/// a `--- a/file` header, so headers win.
fn starts_new_section(line: &str, remaining: Option<Remaining>) -> bool {
    remaining.is_none() && (line.starts_with("--- ") || line.starts_with("+++ "))
}

fn push_hunk_line(hunk: &mut Hunk, file: &mut DiffFile, line: &str, remaining: &mut Option<Remaining>) {
    // \ No newline at end of file
    if line.starts_with('\\') {
        return;
    }

    let raw = if line.is_empty() { " ".to_string() } else { line.to_string() };
    let (old_used, new_used) = match raw.as_bytes()[0] {
        b'+' => {
            file.adds += 1;
            (0, 1)
        }
        b'-' => {
            file.dels += 1;
            (1, 0)
        }
        _ => (1, 1),
    };
    if let Some(r) = remaining.as_mut() {
        r.old = r.old.saturating_sub(old_used);
        r.new = r.new.saturating_sub(new_used);
    }
    hunk.lines.push(raw);
}

/// `b/src/main.rs` → `src/main.rs`; trailing timestamps are dropped
fn strip_patch_path(rest: &str) -> String {
    let path = rest.split('\t').next().unwrap_or(rest).trim();
    path.strip_prefix("b/").unwrap_or(path).to_string()
}

/// Parse a hunk header like "@@ -10,4 +10,15 @@ fn foo()".
/// Unparseable numbers are left as `None` rather than rejecting the hunk.
fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let after_first = line.strip_prefix("@@")?;
    let range_str = match after_first.find("@@") {
        Some(end_idx) => &after_first[..end_idx],
        None => after_first,
    };

    let mut old = (None, None);
    let mut new = (None, None);
    for part in range_str.split_whitespace() {
        if let Some(r) = part.strip_prefix('-') {
            old = parse_range(r);
        } else if let Some(r) = part.strip_prefix('+') {
            new = parse_range(r);
        }
    }

    Some(HunkHeader {
        text: line.trim_end().to_string(),
        old_start: old.0,
        old_count: old.1,
        new_start: new.0,
        new_count: new.1,
    })
}

/// Parse "start,count" or just "start" (count defaults to 1)
fn parse_range(s: &str) -> (Option<usize>, Option<usize>) {
    match s.split_once(',') {
        Some((start, count)) => (start.parse().ok(), count.parse().ok()),
        None => match s.parse().ok() {
            Some(start) => (Some(start), Some(1)),
            None => (None, None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_diff() {
        let raw = r#"diff --git a/src/main.rs b/src/main.rs
index abc123..def456 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@ fn main()
 fn main() {
+    println!("hello");
     let x = 1;
 }
"#;
        let files = parse_diff(raw);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/main.rs");
        assert_eq!(files[0].adds, 1);
        assert_eq!(files[0].dels, 0);
        assert_eq!(files[0].hunks.len(), 1);
        let hunk = &files[0].hunks[0];
        assert_eq!(hunk.lines.len(), 4);
        assert_eq!(hunk.lines[1], "+    println!(\"hello\");");
        assert_eq!(hunk.header, "@@ -1,3 +1,4 @@ fn main()");
    }

    #[test]
    fn test_parse_new_file() {
        let raw = r#"diff --git a/new.rs b/new.rs
new file mode 100644
index 0000000..abc1234
--- /dev/null
+++ b/new.rs
@@ -0,0 +1,2 @@
+fn hello() {}
+fn world() {}
"#;
        let files = parse_diff(raw);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Added);
        assert_eq!(files[0].adds, 2);
        assert_eq!(files[0].hunks[0].old_start, 0);
        assert_eq!(files[0].hunks[0].new_start, 1);
    }

    #[test]
    fn test_parse_hunk_header() {
        let h = parse_hunk_header("@@ -10,4 +10,15 @@ impl Foo").expect("header");
        assert_eq!(h.old_start, Some(10));
        assert_eq!(h.old_count, Some(4));
        assert_eq!(h.new_start, Some(10));
        assert_eq!(h.new_count, Some(15));
    }

    #[test]
    fn hunk_header_without_counts() {
        let h = parse_hunk_header("@@ -3 +4 @@").expect("header");
        assert_eq!((h.old_start, h.old_count), (Some(3), Some(1)));
        assert_eq!((h.new_start, h.new_count), (Some(4), Some(1)));
    }

    #[test]
    fn garbled_header_defaults_to_line_one() {
        let files = parse_diff("@@ -x +y @@\n-a\n+b\n");
        assert_eq!(files.len(), 1);
        let hunk = &files[0].hunks[0];
        assert_eq!((hunk.old_start, hunk.new_start), (1, 1));
        assert_eq!(hunk.lines, vec!["-a", "+b"]);
    }

    #[test]
    fn removed_line_that_looks_like_header() {
        // "-- comment" removed from a SQL file shows up as "--- comment"
        let raw = "diff --git a/q.sql b/q.sql
--- a/q.sql
+++ b/q.sql
@@ -1,2 +1,1 @@
--- comment
 select 1;
";
        let files = parse_diff(raw);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hunks[0].lines, vec!["--- comment", " select 1;"]);
        assert_eq!(files[0].dels, 1);
    }

    #[test]
    fn multiple_files_and_hunks() {
        let raw = "diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -1,1 +1,1 @@
-old
+new
@@ -20,2 +20,1 @@
 keep
-drop
diff --git a/b.rs b/b.rs
deleted file mode 100644
--- a/b.rs
+++ /dev/null
@@ -1,1 +0,0 @@
-bye
";
        let files = parse_diff(raw);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].hunks.len(), 2);
        assert_eq!(files[0].hunks[1].old_start, 20);
        assert_eq!(files[1].path, "b.rs");
        assert_eq!(files[1].status, FileStatus::Deleted);
    }

    #[test]
    fn plain_patch_without_git_header() {
        let raw = "--- a/one.txt\t2024-01-01
+++ b/one.txt\t2024-01-02
@@ -1 +1 @@
-a
+b
--- a/two.txt
+++ b/two.txt
@@ -5,2 +5,2 @@
 x
-y
+z
";
        let files = parse_diff(raw);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "one.txt");
        assert_eq!(files[1].path, "two.txt");
        assert_eq!(files[1].hunks[0].lines, vec![" x", "-y", "+z"]);
    }

    #[test]
    fn no_newline_marker_and_blank_context() {
        let raw = "diff --git a/t b/t
--- a/t
+++ b/t
@@ -1,3 +1,3 @@
 a

-c
\\ No newline at end of file
+d
\\ No newline at end of file
";
        let files = parse_diff(raw);
        assert_eq!(files[0].hunks[0].lines, vec![" a", " ", "-c", "+d"]);
    }

    #[test]
    fn renamed_file() {
        let raw = "diff --git a/old.rs b/new.rs
similarity index 90%
rename from old.rs
rename to new.rs
";
        let files = parse_diff(raw);
        assert_eq!(files[0].path, "new.rs");
        assert_eq!(files[0].status, FileStatus::Renamed("old.rs".to_string()));
    }
}
