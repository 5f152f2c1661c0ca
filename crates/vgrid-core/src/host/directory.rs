use super::{EntryDirectory, read_json_list};
use crate::Result;
use crate::signal::Signal;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};
use vgrid_types::AppInfo;

/// In-memory app directory, optionally loaded from a JSON catalog.
#[derive(Debug, Default)]
pub struct AppDirectory {
    apps: RefCell<Vec<AppInfo>>,
    installed_changed: Signal<()>,
}

impl AppDirectory {
    #[must_use]
    pub fn new(apps: Vec<AppInfo>) -> Self {
        Self {
            apps: RefCell::new(dedup(apps)),
            installed_changed: Signal::new(),
        }
    }

    /// Load a catalog file: a JSON array of app records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn load_catalog(path: &Path) -> Result<Vec<AppInfo>> {
        let apps: Vec<AppInfo> = read_json_list(path)?;
        debug!("Loaded {} apps from {}", apps.len(), path.display());
        Ok(apps)
    }

    /// Replace the installed set and notify listeners if it differs.
    pub fn set_apps(&self, apps: Vec<AppInfo>) {
        let apps = dedup(apps);
        let changed = *self.apps.borrow() != apps;
        if changed {
            *self.apps.borrow_mut() = apps;
            self.installed_changed.emit(&());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.borrow().is_empty()
    }
}

/// Drop repeated ids, keeping the first record.
fn dedup(apps: Vec<AppInfo>) -> Vec<AppInfo> {
    let mut seen = HashSet::new();
    apps.into_iter()
        .filter(|app| {
            let fresh = seen.insert(app.id.clone());
            if !fresh {
                warn!("Duplicate app id in catalog: {}", app.id);
            }
            fresh
        })
        .collect()
}

impl EntryDirectory for AppDirectory {
    fn installed(&self) -> Vec<AppInfo> {
        self.apps.borrow().clone()
    }

    fn lookup(&self, id: &str) -> Option<AppInfo> {
        self.apps.borrow().iter().find(|app| app.id == id).cloned()
    }

    fn installed_changed(&self) -> &Signal<()> {
        &self.installed_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;
    use std::rc::Rc;
    use tempfile::NamedTempFile;

    #[test]
    fn lookup_by_id() {
        let dir = AppDirectory::new(vec![
            AppInfo::new("a.desktop", "Alpha"),
            AppInfo::new("b.desktop", "Beta"),
        ]);
        assert_eq!(dir.lookup("b.desktop").unwrap().name, "Beta");
        assert!(dir.lookup("c.desktop").is_none());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let dir = AppDirectory::new(vec![
            AppInfo::new("a.desktop", "First"),
            AppInfo::new("a.desktop", "Second"),
        ]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.lookup("a.desktop").unwrap().name, "First");
    }

    #[test]
    fn set_apps_notifies_only_on_change() {
        let dir = AppDirectory::new(vec![AppInfo::new("a.desktop", "Alpha")]);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = dir.installed_changed().connect(move |()| h.set(h.get() + 1));

        dir.set_apps(vec![AppInfo::new("a.desktop", "Alpha")]);
        assert_eq!(hits.get(), 0);

        dir.set_apps(vec![
            AppInfo::new("a.desktop", "Alpha"),
            AppInfo::new("b.desktop", "Beta"),
        ]);
        assert_eq!(hits.get(), 1);
        assert_eq!(dir.installed().len(), 2);
    }

    #[test]
    fn load_catalog_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[{{"id": "firefox.desktop", "name": "Firefox", "icon": "firefox"}}]"#
        )
        .unwrap();

        let apps = AppDirectory::load_catalog(file.path()).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].icon.as_deref(), Some("firefox"));
    }

    #[test]
    fn missing_catalog_is_empty() {
        let apps = AppDirectory::load_catalog(Path::new("/nonexistent/apps.json")).unwrap();
        assert!(apps.is_empty());
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": "not-a-list"}}"#).unwrap();
        assert!(AppDirectory::load_catalog(file.path()).is_err());
    }
}
