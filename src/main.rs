use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hunkline::app::{App, DiffSource, InputMode, ViewMode};
use hunkline::config::{self, HlConfig};
use hunkline::syntax::SyntectTokenizer;
use hunkline::ui;
use hunkline::watch::{FileWatcher, WatchEvent};
use ratatui::prelude::*;
use std::io::{self, IsTerminal};
use std::sync::mpsc;
use std::time::{Duration, Instant};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Terminal viewer for patches with word-level change highlighting
#[derive(Parser)]
#[command(name = "hl", version, about)]
struct Cli {
    /// Patch file, `-` for stdin, or a directory inside a git repository
    /// (defaults to the current directory)
    path: Option<String>,

    /// Show staged changes instead of the working tree (repository mode)
    #[arg(long)]
    staged: bool,

    /// Start in side-by-side mode
    #[arg(long)]
    split: bool,

    /// Print the diff to stdout instead of opening the viewer
    #[arg(long)]
    print: bool,

    /// Force a language for syntax coloring (e.g. rust, python)
    #[arg(long, value_name = "ID")]
    lang: Option<String>,

    /// Syntax color theme
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Pre-apply a file filter expression (e.g. '+*.rs,-*.lock')
    #[arg(long, value_name = "EXPR")]
    filter: Option<String>,

    /// Disable syntax coloring (word-level highlighting stays on)
    #[arg(long)]
    no_syntax: bool,

    /// Do not reload on file changes
    #[arg(long)]
    no_watch: bool,

    /// List available themes and exit
    #[arg(long)]
    list_themes: bool,
}

impl Cli {
    /// Command-line flags win over config files
    fn apply_overrides(&self, config: &mut HlConfig) {
        if self.split {
            config.display.split_view = true;
        }
        if self.no_syntax {
            config.display.syntax = false;
        }
        if let Some(theme) = &self.theme {
            config.display.theme = theme.clone();
        }
        if self.no_watch {
            config.watch.enabled = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("HL_LOG", "warn")).init();

    if cli.list_themes {
        for name in SyntectTokenizer::theme_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let source = DiffSource::from_arg(cli.path.as_deref(), cli.staged)?;
    let mut config = config::load_config(&source.config_dir());
    cli.apply_overrides(&mut config);

    // Load syntax definitions once, reused for all files
    let tokenizer = SyntectTokenizer::new(&config.display.theme);

    let mut app = App::new(source, config)?;
    app.lang_override = cli.lang.clone();
    if let Some(ref filter_expr) = cli.filter {
        app.apply_filter_expr(filter_expr);
    }

    if cli.print {
        let stdout = io::stdout();
        let color = stdout.is_terminal();
        let width = crossterm::terminal::size().map_or(120, |(w, _)| w as usize);
        return ui::print::print_app(&mut stdout.lock(), &app, &tokenizer, width, color);
    }

    // Terminal setup
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &tokenizer);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Term, app: &mut App, tokenizer: &SyntectTokenizer) -> Result<()> {
    // Channel for file watch events
    let (watch_tx, watch_rx) = mpsc::channel::<WatchEvent>();

    // Debounce state for reloads
    let mut pending_reload = false;
    let mut reload_deadline = Instant::now();
    let mut pending_path_count = 0usize;

    let mut watcher = if app.config.watch.enabled {
        start_watcher(app, &watch_tx)
    } else {
        None
    };

    loop {
        app.ensure_rendered(tokenizer);

        let mut diff_area = Rect::default();
        terminal.draw(|f| {
            diff_area = ui::layout(f.area()).diff;
            ui::draw(f, app);
        })?;

        // Poll for events with a timeout (lets us process watch events too)
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => match app.input_mode {
                    InputMode::Filter => handle_filter_input(app, key),
                    InputMode::Normal => {
                        let page = diff_area.height.saturating_sub(2).max(1) as isize;
                        handle_normal_input(app, key, page, &watch_tx, &mut watcher);
                    }
                },
                Event::Mouse(mouse) => handle_mouse(app, mouse, diff_area),
                _ => {}
            }
        }

        // Drain watch events (non-blocking), then wait for things to settle
        while let Ok(WatchEvent::SourceChanged(paths)) = watch_rx.try_recv() {
            pending_path_count += paths.len();
            pending_reload = true;
            reload_deadline = Instant::now() + Duration::from_millis(200);
        }

        if pending_reload && Instant::now() >= reload_deadline {
            pending_reload = false;
            let count = std::mem::take(&mut pending_path_count);
            match app.reload() {
                Ok(()) => app.notify(&format!(
                    "{} path{} changed, reloaded",
                    count,
                    if count == 1 { "" } else { "s" }
                )),
                Err(e) => {
                    log::warn!("Reload failed: {:#}", e);
                    app.notify(&format!("Reload failed: {}", e));
                }
            }
        }

        // Tick, used for auto-clearing notifications
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn start_watcher(app: &mut App, tx: &mpsc::Sender<WatchEvent>) -> Option<FileWatcher> {
    let path = app.source.watch_path()?;
    match FileWatcher::new(&path, app.config.watch.debounce_ms, tx.clone()) {
        Ok(w) => {
            app.watching = true;
            Some(w)
        }
        Err(e) => {
            log::warn!("Watch disabled: {:#}", e);
            app.notify(&format!("Watch error: {}", e));
            None
        }
    }
}

fn handle_normal_input(
    app: &mut App,
    key: KeyEvent,
    page: isize,
    watch_tx: &mpsc::Sender<WatchEvent>,
    watcher: &mut Option<FileWatcher>,
) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Scroll
        KeyCode::Char('j') | KeyCode::Down => app.scroll_by(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_by(-1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_by(page / 2);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_by(-page / 2);
        }
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_by(page),
        KeyCode::PageUp => app.scroll_by(-page),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),

        // File and hunk navigation
        KeyCode::Char('n') | KeyCode::Tab => app.next_file(),
        KeyCode::Char('p') | KeyCode::BackTab => app.prev_file(),
        KeyCode::Char(']') => app.next_hunk(),
        KeyCode::Char('[') => app.prev_hunk(),

        // Display toggles
        KeyCode::Char('s') => app.toggle_view_mode(),
        KeyCode::Char('y') => app.toggle_syntax(),

        // Filter
        KeyCode::Char('f') => app.start_filter(),

        KeyCode::Char('r') => match app.reload() {
            Ok(()) => app.notify("Reloaded"),
            Err(e) => app.notify(&format!("Reload failed: {}", e)),
        },

        // Toggle watch mode
        KeyCode::Char('w') => {
            if app.watching {
                *watcher = None;
                app.watching = false;
                app.notify("Watch stopped");
            } else if app.source.watch_path().is_none() {
                app.notify("Nothing to watch for stdin");
            } else if let Some(w) = start_watcher(app, watch_tx) {
                *watcher = Some(w);
                app.notify("Watching for changes...");
            }
        }

        KeyCode::Char('S') => save_settings(app),

        _ => {}
    }
}

fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_filter(),
        KeyCode::Esc => app.cancel_filter(),
        KeyCode::Char(c) => app.filter_input.push(c),
        KeyCode::Backspace => {
            app.filter_input.pop();
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, diff_area: Rect) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(click) = ui::click_at(app, diff_area, mouse.column, mouse.row) {
                app.record_click(click);
                app.notify(&format!("Line {}", click.line_number));
            }
        }
        MouseEventKind::ScrollDown => app.scroll_by(3),
        MouseEventKind::ScrollUp => app.scroll_by(-3),
        _ => {}
    }
}

/// Persist the current display toggles to the global config
fn save_settings(app: &mut App) {
    app.config.display.split_view = app.view_mode == ViewMode::Split;
    app.config.display.syntax = app.syntax;
    app.config.watch.enabled = app.watching;
    match config::save_config(&app.config) {
        Ok(path) => app.notify(&format!("Saved {}", path.display())),
        Err(e) => {
            log::warn!("Failed to save config: {:#}", e);
            app.notify(&format!("Save failed: {}", e));
        }
    }
}
