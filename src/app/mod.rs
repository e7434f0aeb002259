pub mod filter;
mod state;

pub use filter::FileFilter;
pub use state::{render_file, render_highlighted, App, DiffSource, InputMode, PaneLine, ViewMode};
