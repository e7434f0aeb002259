use super::hunk::{LineKind, ProcessedLine};

/// A removed line and the added line it sits opposite to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePair {
    pub remove_index: usize,
    pub add_index: usize,
}

/// Pair each run of removed lines with the run of added lines right after it,
/// position by position. The longer run's excess stays unpaired.
pub fn find_line_pairs(lines: &[ProcessedLine]) -> Vec<LinePair> {
    let has_remove = lines.iter().any(|l| l.kind == LineKind::Remove);
    let has_add = lines.iter().any(|l| l.kind == LineKind::Add);
    if !has_remove || !has_add {
        return Vec::new();
    }

    let mut pairs = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].kind != LineKind::Remove {
            i += 1;
            continue;
        }

        let remove_start = i;
        let remove_end = run_end(lines, remove_start, LineKind::Remove);
        let add_end = run_end(lines, remove_end, LineKind::Add);

        let paired = (remove_end - remove_start).min(add_end - remove_end);
        pairs.extend((0..paired).map(|k| LinePair {
            remove_index: remove_start + k,
            add_index: remove_end + k,
        }));

        i = add_end;
    }
    pairs
}

/// First index at or after `start` whose kind differs from `kind`
fn run_end(lines: &[ProcessedLine], start: usize, kind: LineKind) -> usize {
    lines[start..]
        .iter()
        .position(|l| l.kind != kind)
        .map_or(lines.len(), |offset| start + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<ProcessedLine> {
        raw.iter().map(|r| ProcessedLine::parse(r)).collect()
    }

    #[test]
    fn pure_addition_has_no_pairs() {
        assert!(find_line_pairs(&lines(&[" ctx", "+a", "+b"])).is_empty());
    }

    #[test]
    fn pure_removal_has_no_pairs() {
        assert!(find_line_pairs(&lines(&["-a", "-b", " ctx"])).is_empty());
    }

    #[test]
    fn equal_runs_pair_positionally() {
        let pairs = find_line_pairs(&lines(&["-a", "-b", "+c", "+d"]));
        assert_eq!(
            pairs,
            vec![
                LinePair { remove_index: 0, add_index: 2 },
                LinePair { remove_index: 1, add_index: 3 },
            ]
        );
    }

    #[test]
    fn longer_remove_run_is_truncated() {
        let pairs = find_line_pairs(&lines(&["-a", "-b", "-c", "+d"]));
        assert_eq!(pairs, vec![LinePair { remove_index: 0, add_index: 3 }]);
    }

    #[test]
    fn longer_add_run_is_truncated() {
        let pairs = find_line_pairs(&lines(&["-a", "+b", "+c", "+d"]));
        assert_eq!(pairs, vec![LinePair { remove_index: 0, add_index: 1 }]);
    }

    #[test]
    fn context_between_runs_breaks_adjacency() {
        // The add run is not directly after the remove run
        let pairs = find_line_pairs(&lines(&["-a", " ctx", "+b"]));
        assert!(pairs.is_empty());
    }

    #[test]
    fn add_before_remove_is_not_paired() {
        let pairs = find_line_pairs(&lines(&["+a", "-b"]));
        assert!(pairs.is_empty());
    }

    #[test]
    fn multiple_blocks_in_one_hunk() {
        let l = lines(&["-a", "+b", " ctx", "-c", "-d", "+e", "+f", "+g", " end"]);
        let pairs = find_line_pairs(&l);
        assert_eq!(
            pairs,
            vec![
                LinePair { remove_index: 0, add_index: 1 },
                LinePair { remove_index: 3, add_index: 5 },
                LinePair { remove_index: 4, add_index: 6 },
            ]
        );
        for p in &pairs {
            assert_eq!(l[p.remove_index].kind, LineKind::Remove);
            assert_eq!(l[p.add_index].kind, LineKind::Add);
        }
    }
}
