//! Config directory watcher for hot-reload support.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use vgrid_core::config::Directories;

const DEBOUNCE_DURATION: Duration = Duration::from_millis(300);

/// Which file changed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadTarget {
    Settings,
    Catalog,
    Favorites,
    Hidden,
}

impl ReloadTarget {
    /// Map a changed path to what must be reloaded. Files we do not own
    /// (including usage.json, which only we write) are ignored.
    #[must_use]
    pub fn for_path(dirs: &Directories, path: &Path) -> Option<Self> {
        let name = path.file_name()?;
        let matches = |file: &PathBuf| file.file_name() == Some(name);

        if matches(&dirs.config_file) {
            Some(Self::Settings)
        } else if matches(&dirs.catalog_file) {
            Some(Self::Catalog)
        } else if matches(&dirs.favorites_file) {
            Some(Self::Favorites)
        } else if matches(&dirs.hidden_file) {
            Some(Self::Hidden)
        } else {
            None
        }
    }
}

/// Keeps the debouncer alive; dropping it stops watching.
pub struct ConfigWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

/// Watch the config directory and send one [`ReloadTarget`] per changed file
/// per debounce window.
///
/// # Errors
///
/// Returns an error if the watcher cannot be created or the directory cannot
/// be watched.
pub fn spawn_config_watcher(
    dirs: Directories,
    tx: mpsc::UnboundedSender<ReloadTarget>,
) -> notify::Result<ConfigWatcher> {
    let watch_dir = dirs.config.clone();

    let mut debouncer = new_debouncer(DEBOUNCE_DURATION, move |result: DebounceEventResult| {
        match result {
            Ok(events) => {
                let mut targets: Vec<ReloadTarget> = Vec::new();
                for target in events
                    .iter()
                    .filter_map(|event| ReloadTarget::for_path(&dirs, &event.path))
                {
                    if !targets.contains(&target) {
                        targets.push(target);
                    }
                }

                for target in targets {
                    debug!("Config file changed: {target:?}");
                    if tx.send(target).is_err() {
                        debug!("Reload receiver dropped");
                        return;
                    }
                }
            }
            Err(e) => error!("Config watcher error: {e}"),
        }
    })?;

    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)?;
    info!("Watching config directory: {}", watch_dir.display());

    Ok(ConfigWatcher {
        _debouncer: debouncer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_map_to_targets() {
        let dirs = Directories::with_base(PathBuf::from("/tmp/vgrid-test"));

        assert_eq!(
            ReloadTarget::for_path(&dirs, &dirs.config_file),
            Some(ReloadTarget::Settings)
        );
        assert_eq!(
            ReloadTarget::for_path(&dirs, &dirs.catalog_file),
            Some(ReloadTarget::Catalog)
        );
        assert_eq!(
            ReloadTarget::for_path(&dirs, &dirs.favorites_file),
            Some(ReloadTarget::Favorites)
        );
        assert_eq!(
            ReloadTarget::for_path(&dirs, &dirs.hidden_file),
            Some(ReloadTarget::Hidden)
        );
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let dirs = Directories::with_base(PathBuf::from("/tmp/vgrid-test"));
        assert_eq!(ReloadTarget::for_path(&dirs, &dirs.usage_file), None);
        assert_eq!(
            ReloadTarget::for_path(&dirs, Path::new("/tmp/vgrid-test/config.json.swp")),
            None
        );
        assert_eq!(ReloadTarget::for_path(&dirs, Path::new("/")), None);
    }
}
