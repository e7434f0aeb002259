use anyhow::{Context, Result};
use std::process::Command;

/// File change status in a patch
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed(String), // old path
}

impl FileStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            FileStatus::Added => "+",
            FileStatus::Modified => "~",
            FileStatus::Deleted => "-",
            FileStatus::Renamed(_) => "R",
        }
    }
}

/// Get the repository root directory for a specific path
pub fn get_repo_root_in(dir: &str) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .context(format!("Failed to run git in '{}'", dir))?;

    if !output.status.success() {
        anyhow::bail!("Not a git repository: {}", dir);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get raw `git diff` output for the working tree (or the index when `staged`)
pub fn git_diff_raw(repo_root: &str, staged: bool) -> Result<String> {
    let mut args = vec!["diff"];
    if staged {
        args.push("--staged");
    }
    args.extend(["--unified=3", "--no-color", "--no-ext-diff"]);

    let output = Command::new("git")
        .args(&args)
        .current_dir(repo_root)
        .output()
        .context("Failed to run git diff")?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    log::debug!(
        "git {} in {}: exit {:?}, {} bytes",
        args.join(" "),
        repo_root,
        output.status.code(),
        stdout.len()
    );

    if !output.status.success() {
        anyhow::bail!("git diff failed: {}", stderr.trim());
    }

    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_symbols() {
        assert_eq!(FileStatus::Added.symbol(), "+");
        assert_eq!(FileStatus::Deleted.symbol(), "-");
        assert_eq!(FileStatus::Renamed("a".into()).symbol(), "R");
    }

    #[test]
    fn repo_root_fails_outside_git() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().to_string_lossy().to_string();
        // Either git is missing or the directory is not a repository
        assert!(get_repo_root_in(&path).is_err());
    }
}
