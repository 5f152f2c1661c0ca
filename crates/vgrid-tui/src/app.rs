//! Application state and event handling for the TUI.

use crate::watcher::ReloadTarget;
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::cell::RefCell;
use std::process::{Command, Stdio};
use std::rc::Rc;
use tracing::{debug, info, warn};
use vgrid_core::clock::SystemClock;
use vgrid_core::config::{Directories, Settings, SettingsStore};
use vgrid_core::host::{AppDirectory, EntryDirectory, Favorites, HiddenAppsPolicy};
use vgrid_core::laters::Laters;
use vgrid_core::overview::favorite_menu_label;
use vgrid_core::signal::{Signal, Subscription};
use vgrid_core::usage::UsageTracker;
use vgrid_core::{
    AppCollectionView, AppSorting, ChangeNotificationBridge, Key, ScrollDirection, ScrollEvent,
    Size, VerticalAppDisplay,
};

/// Pixels per terminal column and row.
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

const MIN_COLUMNS: u32 = 1;
const MAX_COLUMNS: u32 = 12;

/// Map a terminal key to a grid key. Vim motions double as arrows.
#[must_use]
pub fn map_key(key: &KeyEvent) -> Key {
    match key.code {
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Up | KeyCode::Char('k') => Key::Up,
        KeyCode::Down | KeyCode::Char('j') => Key::Down,
        KeyCode::Left | KeyCode::Char('h') => Key::Left,
        KeyCode::Right | KeyCode::Char('l') => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        _ => Key::Other,
    }
}

/// Split a desktop-entry style command line, dropping `%f`-style field codes.
#[must_use]
pub fn command_argv(exec: &str) -> Vec<String> {
    exec.split_whitespace()
        .filter(|arg| !(arg.len() == 2 && arg.starts_with('%') && *arg != "%%"))
        .map(|arg| arg.replace("%%", "%"))
        .collect()
}

/// Spawn a command with all I/O redirected to null (fire and forget)
fn spawn_silent(argv: &[String]) {
    let Some((program, args)) = argv.split_first() else {
        return;
    };
    if let Err(e) = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        warn!("Failed to launch {program}: {e}");
    }
}

/// Main application state
pub struct App {
    dirs: Directories,
    settings: SettingsStore,
    directory: Rc<AppDirectory>,
    favorites: Rc<Favorites>,
    policy: Rc<HiddenAppsPolicy>,
    usage: Rc<UsageTracker>,
    laters: Laters,
    pub display: VerticalAppDisplay,
    bridge: ChangeNotificationBridge,
    /// Emitted when the terminal loses focus, the analogue of the overview closing
    overview_hidden: Signal<()>,
    activated: Rc<RefCell<Vec<String>>>,
    _activated_sub: Subscription,
    pub status_message: Option<String>,
    pub search_active: bool,
    pub should_quit: bool,
    exec: bool,
}

impl App {
    /// Load every file under `dirs` and build the display.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created or a file
    /// is malformed.
    pub fn new(dirs: Directories, exec: bool) -> Result<Self> {
        dirs.ensure_exists()
            .with_context(|| format!("creating {}", dirs.config.display()))?;

        let settings = SettingsStore::new(
            Settings::load(&dirs.config_file)
                .with_context(|| format!("loading {}", dirs.config_file.display()))?,
        );
        let directory = Rc::new(AppDirectory::new(
            AppDirectory::load_catalog(&dirs.catalog_file)
                .with_context(|| format!("loading {}", dirs.catalog_file.display()))?,
        ));
        let favorites = Rc::new(Favorites::new(
            Favorites::load(&dirs.favorites_file)
                .with_context(|| format!("loading {}", dirs.favorites_file.display()))?,
        ));
        let policy = Rc::new(HiddenAppsPolicy::new(
            HiddenAppsPolicy::load(&dirs.hidden_file)
                .with_context(|| format!("loading {}", dirs.hidden_file.display()))?,
        ));
        let usage = Rc::new(match UsageTracker::load(&dirs.usage_file) {
            Ok(usage) => usage,
            Err(e) => {
                warn!("Ignoring unreadable usage file: {e}");
                UsageTracker::new()
            }
        });
        info!("Loaded {} apps", directory.len());

        let laters = Laters::new();
        let collection = AppCollectionView::new(
            directory.clone(),
            favorites.clone(),
            policy.clone(),
            usage.clone(),
        );
        let display = VerticalAppDisplay::new(
            settings.clone(),
            collection,
            laters.clone(),
            Rc::new(SystemClock::new()),
        );

        let overview_hidden = Signal::new();
        let bridge = ChangeNotificationBridge::connect(&display, Some(&overview_hidden));

        let activated = Rc::new(RefCell::new(Vec::new()));
        let queue = activated.clone();
        let activated_sub =
            display.connect_activated(move |id| queue.borrow_mut().push(id.clone()));

        Ok(Self {
            dirs,
            settings,
            directory,
            favorites,
            policy,
            usage,
            laters,
            display,
            bridge,
            overview_hidden,
            activated,
            _activated_sub: activated_sub,
            status_message: None,
            search_active: false,
            should_quit: false,
            exec,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Run due frame callbacks then idle work. Returns whether anything ran.
    pub fn tick(&mut self) -> bool {
        let ran = self.laters.run_frame() + self.laters.run_idle();
        self.drain_activations();
        ran > 0
    }

    /// Whether animations or deferred work are pending.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.laters.has_frame() || self.laters.has_idle()
    }

    /// Resize the display to a terminal area measured in cells.
    pub fn set_terminal_size(&self, columns: u16, rows: u16) {
        self.display.set_viewport(Size::new(
            f32::from(columns) * CELL_WIDTH_PX,
            f32::from(rows) * CELL_HEIGHT_PX,
        ));
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                let direction = match mouse.kind {
                    MouseEventKind::ScrollUp => ScrollDirection::Up,
                    MouseEventKind::ScrollDown => ScrollDirection::Down,
                    _ => return,
                };
                let _ = self
                    .display
                    .handle_scroll(&ScrollEvent::discrete(direction));
            }
            Event::FocusLost => {
                debug!("Terminal focus lost");
                self.overview_hidden.emit(&());
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('f') => self.toggle_focused_favorite(),
            KeyCode::Char('s') => self.update_settings(|s| {
                s.favorites_section = !s.favorites_section;
            }),
            KeyCode::Char('o') => self.update_settings(|s| {
                s.app_sorting = match s.app_sorting {
                    AppSorting::Alphabetical => AppSorting::Usage,
                    AppSorting::Usage => AppSorting::Alphabetical,
                };
            }),
            KeyCode::Char('a') => self.update_settings(|s| s.animate_scroll = !s.animate_scroll),
            KeyCode::Char('+' | '=') => self.update_settings(|s| {
                s.columns = (s.columns + 1).min(MAX_COLUMNS);
            }),
            KeyCode::Char('-') => self.update_settings(|s| {
                s.columns = s.columns.saturating_sub(1).max(MIN_COLUMNS);
            }),
            KeyCode::Char('/') => {
                self.search_active = !self.search_active;
                self.display.set_search_active(self.search_active);
            }
            _ => {
                let mapped = map_key(key);
                if !self.display.handle_key(mapped).is_stop() && mapped == Key::Escape {
                    self.should_quit = true;
                }
                self.drain_activations();
            }
        }
    }

    /// Apply a settings change and persist it.
    fn update_settings(&mut self, mutate: impl FnOnce(&mut Settings)) {
        let changed = self.settings.update(mutate);
        if changed.is_empty() {
            return;
        }
        debug!("Settings changed: {changed:?}");
        if let Err(e) = self.settings.get().save(&self.dirs.config_file) {
            warn!("Failed to save settings: {e}");
            self.status_message = Some(format!("Could not save settings: {e}"));
        }
    }

    fn toggle_focused_favorite(&mut self) {
        let Some(app) = self
            .display
            .focused_id()
            .and_then(|id| self.directory.lookup(&id))
        else {
            return;
        };

        let was_favorite = !self.favorites.toggle(&app);
        self.status_message = Some(format!(
            "{}: {}",
            favorite_menu_label(was_favorite),
            app.name
        ));
        if let Err(e) = self.favorites.save(&self.dirs.favorites_file) {
            warn!("Failed to save favorites: {e}");
            self.status_message = Some(format!("Could not save favorites: {e}"));
        }
    }

    fn drain_activations(&mut self) {
        let ids: Vec<String> = self.activated.borrow_mut().drain(..).collect();
        if ids.is_empty() {
            return;
        }

        if let Err(e) = self.usage.save(&self.dirs.usage_file) {
            warn!("Failed to save usage: {e}");
        }

        for id in ids {
            let Some(app) = self.directory.lookup(&id) else {
                continue;
            };
            info!("Activated {}", app.id);
            self.status_message = Some(format!("Launched {}", app.name));

            if self.exec {
                match app.exec.as_deref() {
                    Some(exec) => spawn_silent(&command_argv(exec)),
                    None => warn!("{} has no command line", app.id),
                }
            }
        }
    }

    /// Re-read one file after it changed on disk.
    pub fn reload(&mut self, target: ReloadTarget) {
        debug!("Reloading {target:?}");
        let result = match target {
            ReloadTarget::Settings => Settings::load(&self.dirs.config_file).map(|settings| {
                let changed = self.settings.replace(settings);
                debug!("Reloaded settings, changed: {changed:?}");
            }),
            ReloadTarget::Catalog => AppDirectory::load_catalog(&self.dirs.catalog_file)
                .map(|apps| self.directory.set_apps(apps)),
            ReloadTarget::Favorites => {
                Favorites::load(&self.dirs.favorites_file).map(|ids| self.favorites.set_ids(ids))
            }
            ReloadTarget::Hidden => {
                HiddenAppsPolicy::load(&self.dirs.hidden_file).map(|ids| self.policy.set_hidden(ids))
            }
        };

        if let Err(e) = result {
            warn!("Reload of {target:?} failed: {e}");
            self.status_message = Some(format!("Reload failed: {e}"));
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.bridge.teardown();
        self.display.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn app_in(dir: &TempDir) -> App {
        write(
            dir.path(),
            "apps.json",
            r#"[
                {"id": "files.desktop", "name": "Files", "exec": "nautilus %U"},
                {"id": "term.desktop", "name": "Terminal"},
                {"id": "calc.desktop", "name": "Calculator"}
            ]"#,
        );
        App::new(Directories::with_base(dir.path().to_path_buf()), false).unwrap()
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(&key(KeyCode::Char('j'))), Key::Down);
        assert_eq!(map_key(&key(KeyCode::Left)), Key::Left);
        assert_eq!(map_key(&key(KeyCode::BackTab)), Key::BackTab);
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)),
            Key::BackTab
        );
        assert_eq!(map_key(&key(KeyCode::Esc)), Key::Escape);
        assert_eq!(map_key(&key(KeyCode::Char('x'))), Key::Other);
    }

    #[test]
    fn test_command_argv_drops_field_codes() {
        assert_eq!(command_argv("nautilus %U"), vec!["nautilus"]);
        assert_eq!(
            command_argv("printf 100%% --new-window %f"),
            vec!["printf", "100%", "--new-window"]
        );
        assert!(command_argv("   ").is_empty());
    }

    #[test]
    fn test_loads_catalog_sorted() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir);
        let ids: Vec<String> = app
            .display
            .sections()
            .ids()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, vec!["calc.desktop", "files.desktop", "term.desktop"]);
    }

    #[test]
    fn test_enter_records_usage_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        app.handle_event(&Event::Key(key(KeyCode::Tab)));
        app.handle_event(&Event::Key(key(KeyCode::Enter)));
        app.tick();

        assert_eq!(app.status_message.as_deref(), Some("Launched Calculator"));
        assert!(dir.path().join("usage.json").exists());
    }

    #[test]
    fn test_favorite_toggle_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        app.handle_event(&Event::Key(key(KeyCode::Tab)));
        app.handle_event(&Event::Key(key(KeyCode::Char('f'))));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Add to Favorites: Calculator")
        );
        let saved = Favorites::load(&dir.path().join("favorites.json")).unwrap();
        assert_eq!(saved, vec!["calc.desktop".to_string()]);
    }

    #[test]
    fn test_columns_keys_are_clamped_and_saved() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.update_settings(|s| s.columns = MIN_COLUMNS);

        app.handle_event(&Event::Key(key(KeyCode::Char('-'))));
        assert_eq!(app.settings().columns(), MIN_COLUMNS);

        app.handle_event(&Event::Key(key(KeyCode::Char('+'))));
        assert_eq!(app.settings().columns(), MIN_COLUMNS + 1);
        let saved = Settings::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(saved.columns, MIN_COLUMNS + 1);
    }

    #[test]
    fn test_escape_quits_when_unhandled() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_event(&Event::Key(key(KeyCode::Esc)));
        assert!(app.should_quit);
    }

    #[test]
    fn test_reload_catalog_redisplays() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        write(
            dir.path(),
            "apps.json",
            r#"[{"id": "new.desktop", "name": "New"}]"#,
        );
        app.reload(ReloadTarget::Catalog);
        assert!(app.display.redisplay_pending());

        // Let the fade out run on the real clock
        for _ in 0..200 {
            if !app.is_busy() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
            app.tick();
        }
        assert!(!app.display.redisplay_pending());
        assert_eq!(app.display.sections().len(), 1);
    }

    #[test]
    fn test_reload_malformed_keeps_settings() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let before = app.settings().get();

        write(dir.path(), "config.json", "{ not json");
        app.reload(ReloadTarget::Settings);

        assert_eq!(app.settings().get(), before);
        assert!(app.status_message.is_some());
    }
}
