//! vgrid TUI - a vertical app grid in the terminal.
//!
//! Loads the app catalog, favorites and hidden-apps list from the config
//! directory, draws them as a sectioned grid and reloads whenever one of
//! those files changes on disk.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        EventStream,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vgrid_core::SectionKind;
use vgrid_core::config::Directories;
use vgrid_core::host::{AppDirectory, EntryDirectory, Favorites, FavoritesStore};

mod app;
mod cli;
mod colors;
mod render;
mod watcher;

use app::App;
use cli::{Cli, Commands};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("vgrid-tui-{timestamp}.log");
    let log_path = std::path::Path::new("/tmp").join(&log_filename);

    let symlink_path = std::path::Path::new("/tmp/vgrid-tui.log");
    let _ = std::fs::remove_file(symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, symlink_path);

    let file_appender = tracing_appender::rolling::never("/tmp", &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let dirs = cli
        .config_dir
        .clone()
        .map_or_else(Directories::new, Directories::with_base);

    match cli.command {
        Some(Commands::List) => list_sections(dirs)?,
        Some(Commands::Favorite { id }) => toggle_favorite(&dirs, &id)?,
        Some(Commands::Tui) | None => run_tui(dirs, cli.exec).await?,
    }

    Ok(())
}

fn list_sections(dirs: Directories) -> Result<()> {
    let app = App::new(dirs, false)?;
    let sections = app.display.sections();

    for kind in [SectionKind::Favorites, SectionKind::Main] {
        let entries = sections.entries(kind);
        if entries.is_empty() {
            continue;
        }
        let labelled = match kind {
            SectionKind::Favorites => sections.show_favorites(),
            SectionKind::Main => sections.show_main_label(),
        };
        if labelled {
            println!("{}:", kind.label());
        }
        for entry in entries {
            let marker = if entry.favorite { "*" } else { " " };
            println!("  {marker} {:<40} {}", entry.name(), entry.id());
        }
    }
    Ok(())
}

fn toggle_favorite(dirs: &Directories, id: &str) -> Result<()> {
    let directory = AppDirectory::new(AppDirectory::load_catalog(&dirs.catalog_file)?);
    let Some(info) = directory.lookup(id) else {
        anyhow::bail!("No app with id {id}");
    };

    let favorites = Favorites::new(Favorites::load(&dirs.favorites_file)?);
    let now_favorite = favorites.toggle(&info);
    favorites.save(&dirs.favorites_file)?;

    if now_favorite {
        println!("Added {} to favorites", info.name);
    } else {
        println!("Removed {} from favorites", info.name);
    }
    println!("{} favorites", favorites.ids().len());
    Ok(())
}

async fn run_tui(dirs: Directories, exec: bool) -> Result<()> {
    let mut app = App::new(dirs.clone(), exec)?;

    let (reload_tx, mut reload_rx) = mpsc::unbounded_channel();
    let _watcher = match watcher::spawn_config_watcher(dirs, reload_tx) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!("Hot-reload disabled: {e}");
            None
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut event_stream = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    let mut needs_render = true;

    let result: Result<()> = loop {
        if needs_render {
            if let Err(e) = terminal.draw(|f| render::render(f, &app)) {
                break Err(e.into());
            }
            needs_render = false;
        }

        tokio::select! {
            Some(event_result) = event_stream.next() => {
                match event_result {
                    Ok(event) => {
                        if !matches!(event, Event::FocusGained) {
                            needs_render = true;
                        }
                        app.handle_event(&event);
                    }
                    Err(e) => tracing::error!("Event stream error: {}", e),
                }
            }

            Some(target) = reload_rx.recv() => {
                app.reload(target);
                needs_render = true;
            }

            _ = frames.tick() => {
                // Animations step on the frame clock, idle work after
                if app.tick() {
                    needs_render = true;
                }
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}
