use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::filter::FileFilter;
use crate::align::{format_hunks, Highlight};
use crate::config::HlConfig;
use crate::git::{self, DiffFile};
use crate::syntax::{language_for_path, PlainTokenizer, Tokenizer};
use crate::view::{split_rows, unified_rows, LineNumberClick, SplitRow, UnifiedRow};

/// How the diff pane lays out lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Unified,
    Split,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Unified => ViewMode::Split,
            ViewMode::Split => ViewMode::Unified,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Unified => "UNIFIED",
            ViewMode::Split => "SPLIT",
        }
    }
}

/// What keyboard input is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a filter expression into the status bar
    Filter,
}

/// Where the patch text comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DiffSource {
    /// A patch file on disk
    Patch(PathBuf),
    /// Patch read once from stdin; cannot be reloaded
    Stdin(String),
    /// `git diff` in a repository
    Repo { root: String, staged: bool },
}

impl DiffSource {
    /// Resolve a CLI path argument: `-` is stdin, a directory is a repo,
    /// anything else a patch file.
    pub fn from_arg(arg: Option<&str>, staged: bool) -> Result<Self> {
        match arg {
            Some("-") => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read patch from stdin")?;
                Ok(DiffSource::Stdin(text))
            }
            Some(path) if !Path::new(path).is_dir() => Ok(DiffSource::Patch(PathBuf::from(path))),
            other => {
                let dir = other.unwrap_or(".");
                let root = git::get_repo_root_in(dir)?;
                Ok(DiffSource::Repo { root, staged })
            }
        }
    }

    pub fn load(&self) -> Result<String> {
        match self {
            DiffSource::Patch(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read patch {}", path.display())),
            DiffSource::Stdin(text) => Ok(text.clone()),
            DiffSource::Repo { root, staged } => git::git_diff_raw(root, *staged),
        }
    }

    /// Path to watch for live reload, if the source can change
    pub fn watch_path(&self) -> Option<PathBuf> {
        match self {
            DiffSource::Patch(path) => Some(path.clone()),
            DiffSource::Stdin(_) => None,
            DiffSource::Repo { root, .. } => Some(PathBuf::from(root)),
        }
    }

    /// Directory used for the per-directory config file
    pub fn config_dir(&self) -> PathBuf {
        match self {
            DiffSource::Patch(path) => path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            DiffSource::Stdin(_) => PathBuf::from("."),
            DiffSource::Repo { root, .. } => PathBuf::from(root),
        }
    }

    pub fn label(&self) -> String {
        match self {
            DiffSource::Patch(path) => path.display().to_string(),
            DiffSource::Stdin(_) => "<stdin>".to_string(),
            DiffSource::Repo { root, staged: true } => format!("{} (staged)", root),
            DiffSource::Repo { root, staged: false } => root.clone(),
        }
    }
}

/// One line of the diff pane
#[derive(Debug, Clone, PartialEq)]
pub enum PaneLine {
    HunkHeader(String),
    Unified(UnifiedRow),
    Split(SplitRow),
}

/// Rendered rows for one file in one mode
#[derive(Debug, Clone)]
pub struct RenderedFile {
    file_index: usize,
    mode: ViewMode,
    syntax: bool,
    pub lines: Vec<PaneLine>,
}

/// Format every hunk of `file` and arrange the result for `mode`, with a
/// header line in front of each hunk.
/// Render `file` with `tokenizer` colors, or with plain tokens when syntax
/// coloring is off. Similar line pairs get word-level highlighting either way.
pub fn render_highlighted<T: Tokenizer>(
    file: &DiffFile,
    mode: ViewMode,
    tokenizer: &T,
    lang: &str,
    syntax: bool,
) -> Vec<PaneLine> {
    if syntax {
        render_file(file, mode, Some(Highlight::new(tokenizer, lang)))
    } else {
        render_file(file, mode, Some(Highlight::new(&PlainTokenizer, lang)))
    }
}

pub fn render_file<T: Tokenizer>(
    file: &DiffFile,
    mode: ViewMode,
    highlight: Option<Highlight<'_, T>>,
) -> Vec<PaneLine> {
    let decorated = format_hunks(&file.hunks, highlight);
    let keyed: Vec<(usize, PaneLine)> = match mode {
        ViewMode::Unified => unified_rows(&decorated)
            .into_iter()
            .map(|row| (row.key.hunk, PaneLine::Unified(row)))
            .collect(),
        ViewMode::Split => split_rows(&decorated)
            .into_iter()
            .map(|row| (row.key.hunk, PaneLine::Split(row)))
            .collect(),
    };

    let mut lines = Vec::with_capacity(keyed.len() + file.hunks.len());
    let mut current_hunk = None;
    for (hunk, line) in keyed {
        if current_hunk != Some(hunk) {
            current_hunk = Some(hunk);
            let header = file.hunks.get(hunk).map(|h| h.header.clone()).unwrap_or_default();
            lines.push(PaneLine::HunkHeader(header));
        }
        lines.push(line);
    }
    lines
}

/// Top-level viewer state
pub struct App {
    pub source: DiffSource,

    /// All files in the patch, unfiltered
    pub files: Vec<DiffFile>,

    pub filter: FileFilter,

    pub input_mode: InputMode,

    /// Filter expression being typed
    pub filter_input: String,

    /// Index into `files` of the file shown in the diff pane
    pub selected_file: usize,

    /// First pane line shown in the diff pane
    pub scroll: usize,

    pub view_mode: ViewMode,

    /// Syntax coloring
    pub syntax: bool,

    /// Language id forced from the command line
    pub lang_override: Option<String>,

    /// Last line number clicked in the diff pane
    pub last_click: Option<LineNumberClick>,

    pub watching: bool,

    pub should_quit: bool,

    /// Transient status message
    pub message: Option<String>,

    /// Ticks since the message was set (for auto-clearing)
    pub message_ticks: u8,

    pub config: HlConfig,

    rendered: Option<RenderedFile>,
}

impl App {
    pub fn new(source: DiffSource, config: HlConfig) -> Result<Self> {
        let raw = source.load()?;
        let files = git::parse_diff(&raw);
        log::info!("Loaded {} file(s) from {}", files.len(), source.label());

        let view_mode = if config.display.split_view {
            ViewMode::Split
        } else {
            ViewMode::Unified
        };

        Ok(App {
            source,
            files,
            filter: FileFilter::default(),
            input_mode: InputMode::Normal,
            filter_input: String::new(),
            selected_file: 0,
            scroll: 0,
            view_mode,
            syntax: config.display.syntax,
            lang_override: None,
            last_click: None,
            watching: false,
            should_quit: false,
            message: None,
            message_ticks: 0,
            config,
            rendered: None,
        })
    }

    /// Files passing the filter, with their index into `files`
    pub fn visible_files(&self) -> Vec<(usize, &DiffFile)> {
        self.files
            .iter()
            .enumerate()
            .filter(|(_, f)| self.filter.matches(f))
            .collect()
    }

    pub fn selected_diff_file(&self) -> Option<&DiffFile> {
        if self.visible_files().iter().any(|(i, _)| *i == self.selected_file) {
            self.files.get(self.selected_file)
        } else {
            None
        }
    }

    /// Language for the selected file, honoring `--lang`
    pub fn language(&self) -> &str {
        match (&self.lang_override, self.selected_diff_file()) {
            (Some(lang), _) => lang.as_str(),
            (None, Some(file)) => language_for_path(&file.path),
            (None, None) => "text",
        }
    }

    pub fn next_file(&mut self) {
        self.step_file(1);
    }

    pub fn prev_file(&mut self) {
        self.step_file(-1);
    }

    fn step_file(&mut self, delta: isize) {
        let visible: Vec<usize> = self.visible_files().iter().map(|(i, _)| *i).collect();
        if visible.is_empty() {
            return;
        }
        let pos = visible.iter().position(|i| *i == self.selected_file);
        let next = match pos {
            Some(p) => (p as isize + delta).clamp(0, visible.len() as isize - 1) as usize,
            None => 0,
        };
        if visible[next] != self.selected_file {
            self.selected_file = visible[next];
            self.scroll = 0;
        }
    }

    /// Number of lines in the diff pane for the current render
    pub fn pane_len(&self) -> usize {
        self.rendered.as_ref().map_or(0, |r| r.lines.len())
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.pane_len().saturating_sub(1);
        self.scroll = (self.scroll as isize + delta).clamp(0, max as isize) as usize;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.pane_len().saturating_sub(1);
    }

    /// Jump to the next hunk header below the current scroll position
    pub fn next_hunk(&mut self) {
        if let Some(rendered) = &self.rendered {
            if let Some(offset) = rendered.lines[self.scroll.min(rendered.lines.len())..]
                .iter()
                .skip(1)
                .position(|l| matches!(l, PaneLine::HunkHeader(_)))
            {
                self.scroll += offset + 1;
            }
        }
    }

    pub fn prev_hunk(&mut self) {
        if let Some(rendered) = &self.rendered {
            let end = self.scroll.min(rendered.lines.len());
            if let Some(pos) = rendered.lines[..end]
                .iter()
                .rposition(|l| matches!(l, PaneLine::HunkHeader(_)))
            {
                self.scroll = pos;
            }
        }
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
        self.scroll = 0;
        self.notify(&format!("View: {}", self.view_mode.label().to_lowercase()));
    }

    pub fn toggle_syntax(&mut self) {
        self.syntax = !self.syntax;
        self.notify(if self.syntax { "Syntax on" } else { "Syntax off" });
    }

    /// Open the filter prompt, prefilled with the current expression
    pub fn start_filter(&mut self) {
        self.filter_input = self.filter.expr().to_string();
        self.input_mode = InputMode::Filter;
    }

    /// Apply the typed expression and leave the prompt
    pub fn submit_filter(&mut self) {
        let expr = std::mem::take(&mut self.filter_input);
        self.apply_filter_expr(&expr);
        self.input_mode = InputMode::Normal;
        if self.filter.is_empty() {
            self.notify("Filter cleared");
        } else {
            let visible = self.visible_files().len();
            let total = self.files.len();
            self.notify(&format!("Filter: {} ({}/{})", self.filter.expr(), visible, total));
        }
    }

    pub fn cancel_filter(&mut self) {
        self.filter_input.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn apply_filter_expr(&mut self, expr: &str) {
        self.filter = FileFilter::parse(expr);
        if self.selected_diff_file().is_none() {
            self.selected_file = self.visible_files().first().map_or(0, |(i, _)| *i);
            self.scroll = 0;
        }
    }

    /// Re-read the source, keeping the selected path when it still exists
    pub fn reload(&mut self) -> Result<()> {
        let selected_path = self.files.get(self.selected_file).map(|f| f.path.clone());
        let raw = self.source.load()?;
        self.files = git::parse_diff(&raw);
        self.rendered = None;

        match selected_path.and_then(|p| self.files.iter().position(|f| f.path == p)) {
            Some(idx) => self.selected_file = idx,
            None => {
                self.selected_file = self.visible_files().first().map_or(0, |(i, _)| *i);
                self.scroll = 0;
            }
        }
        log::info!("Reloaded {} file(s)", self.files.len());
        Ok(())
    }

    /// Make sure the pane lines for the selected file are current
    pub fn ensure_rendered<T: Tokenizer>(&mut self, tokenizer: &T) {
        let fresh = self.rendered.as_ref().is_some_and(|r| {
            r.file_index == self.selected_file && r.mode == self.view_mode && r.syntax == self.syntax
        });
        if fresh {
            return;
        }

        let lines = match self.selected_diff_file() {
            Some(file) => {
                let lang = self.language().to_string();
                render_highlighted(file, self.view_mode, tokenizer, &lang, self.syntax)
            }
            None => Vec::new(),
        };

        self.rendered = Some(RenderedFile {
            file_index: self.selected_file,
            mode: self.view_mode,
            syntax: self.syntax,
            lines,
        });
        self.scroll = self.scroll.min(self.pane_len().saturating_sub(1));
    }

    pub fn pane_lines(&self) -> &[PaneLine] {
        self.rendered.as_ref().map(|r| r.lines.as_slice()).unwrap_or(&[])
    }

    pub fn record_click(&mut self, click: LineNumberClick) {
        log::info!("Line number clicked: {:?} {}", click.side, click.line_number);
        self.last_click = Some(click);
    }

    pub fn notify(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_ticks = 0;
    }

    /// Tick called on every event loop iteration, used for notification auto-clear
    pub fn tick(&mut self) {
        if self.message.is_some() {
            self.message_ticks += 1;
            if self.message_ticks > 20 {
                self.message = None;
                self.message_ticks = 0;
            }
        }
    }
}
