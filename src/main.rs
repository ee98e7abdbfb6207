//! snipster - terminal snippet manager
//!
//! Snippets live as one JSON file each under a category directory tree. The
//! interactive browser shows that tree as folders, filters it with substring
//! or fuzzy matching, and hands create/update/delete work to background
//! threads so the interface never blocks on the disk.

use crate::app::App;
use crate::handlers::editor::{open_in_editor, resolve_editor};
use crate::handlers::tasks::{SystemClipboard, Task, TaskEvent, TaskRunner};
use crate::models::{FileStore, SnippetStore};
use crate::search::SearchMode;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    crossterm::{
        event::{self, Event},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use std::error::Error;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod cli;
mod config;
mod handlers;
mod highlight;
mod models;
mod search;
mod ui;

const LOG_ENV: &str = "SNIPSTER_LOG";
const TICK: Duration = Duration::from_millis(250);

/// Routes tracing output to `<dir>/snipster.log`. Failure leaves logging off.
fn init_logging(dir: &Path) -> Option<WorkerGuard> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("snipster.log")
        .build(dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .ok()?;

    Some(guard)
}

fn main() -> Result<(), Box<dyn Error>> {
    color_eyre::install()?;

    let cli = cli::Cli::parse_lenient();
    if cli.wants_version() {
        println!("{}", cli::version_string());
        return Ok(());
    }

    let config = config::Config::load()?;
    let root = config::ensure_data_dir(&config)?;
    let _log_guard = init_logging(&config::log_dir(&root));
    tracing::info!(root = %root.display(), version = env!("CARGO_PKG_VERSION"), "starting");

    if let Some(command) = &cli.command {
        cli::execute(command, &root)?;
        return Ok(());
    }

    let store: Arc<dyn SnippetStore> = Arc::new(FileStore::new(root));
    let runner = TaskRunner::new(store, Arc::new(Mutex::new(SystemClipboard::default())));

    let snippets = match runner.store().load_all() {
        Ok(snippets) => snippets,
        Err(e) => {
            tracing::warn!(error = %e, "initial load failed, starting empty");
            Vec::new()
        }
    };

    let mode = if config.fuzzy {
        SearchMode::Fuzzy
    } else {
        SearchMode::Substring
    };
    let mut app = App::new(snippets).with_preferences(mode, config.accent);
    let editor = resolve_editor(config.editor.as_deref());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app, &runner, &editor);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    tracing::info!("exiting");

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &TaskRunner,
    editor: &str,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) => {
                    if handlers::keys::handle_key_events(key, app) {
                        return Ok(());
                    }
                }
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        while let Some(event) = runner.try_recv() {
            app.handle_task_event(event);
        }

        for task in app.take_tasks() {
            match task {
                Task::Edit(path) => {
                    tracing::debug!(path = %path.display(), "opening external editor");
                    match open_in_editor(editor, &path) {
                        Ok(()) => runner.spawn(Task::Reload),
                        Err(e) => app.handle_task_event(TaskEvent::Failed(format!("error: {e}"))),
                    }
                    terminal.clear()?;
                }
                task => runner.spawn(task),
            }
        }
    }
}
