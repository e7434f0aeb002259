mod diff;
mod status;

pub use diff::{parse_diff, DiffFile};
pub use status::{get_repo_root_in, git_diff_raw, FileStatus};
