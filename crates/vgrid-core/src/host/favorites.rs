use super::{FavoritesStore, read_json_list};
use crate::Result;
use crate::signal::Signal;
use std::cell::RefCell;
use std::path::Path;
use vgrid_types::AppInfo;

/// Ordered favorites list.
#[derive(Debug, Default)]
pub struct Favorites {
    ids: RefCell<Vec<String>>,
    changed: Signal<()>,
}

impl Favorites {
    #[must_use]
    pub fn new(ids: Vec<String>) -> Self {
        let store = Self::default();
        *store.ids.borrow_mut() = unique(ids);
        store
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON list of ids.
    pub fn load(path: &Path) -> Result<Vec<String>> {
        read_json_list(path)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&*self.ids.borrow())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace the list and notify if it differs.
    pub fn set_ids(&self, ids: Vec<String>) {
        let ids = unique(ids);
        if *self.ids.borrow() != ids {
            *self.ids.borrow_mut() = ids;
            self.changed.emit(&());
        }
    }

    /// Append `id` to the end of the list.
    pub fn add(&self, id: &str) {
        if self.is_favorite(id) {
            return;
        }
        self.ids.borrow_mut().push(id.to_string());
        self.changed.emit(&());
    }

    pub fn remove(&self, id: &str) {
        let removed = {
            let mut ids = self.ids.borrow_mut();
            let before = ids.len();
            ids.retain(|fav| fav != id);
            before != ids.len()
        };
        if removed {
            self.changed.emit(&());
        }
    }

    /// Add or remove `app`, returning whether it is now a favorite.
    pub fn toggle(&self, app: &AppInfo) -> bool {
        if self.is_favorite(&app.id) {
            self.remove(&app.id);
            false
        } else {
            self.add(&app.id);
            true
        }
    }
}

fn unique(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

impl FavoritesStore for Favorites {
    fn is_favorite(&self, id: &str) -> bool {
        self.ids.borrow().iter().any(|fav| fav == id)
    }

    fn ids(&self) -> Vec<String> {
        self.ids.borrow().clone()
    }

    fn changed(&self) -> &Signal<()> {
        &self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn keeps_manual_order_without_duplicates() {
        let favs = Favorites::new(ids(&["b", "a", "b"]));
        assert_eq!(favs.ids(), ids(&["b", "a"]));
        assert!(favs.is_favorite("a"));
        assert!(!favs.is_favorite("c"));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let favs = Favorites::default();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = favs.changed().connect(move |()| h.set(h.get() + 1));

        let app = AppInfo::new("x.desktop", "X");
        assert!(favs.toggle(&app));
        assert!(!favs.toggle(&app));
        favs.remove("x.desktop");

        assert_eq!(hits.get(), 2);
        assert!(favs.ids().is_empty());
    }

    #[test]
    fn set_ids_notifies_on_reorder() {
        let favs = Favorites::new(ids(&["a", "b"]));
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = favs.changed().connect(move |()| h.set(h.get() + 1));

        favs.set_ids(ids(&["a", "b"]));
        favs.set_ids(ids(&["b", "a"]));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");

        Favorites::new(ids(&["c", "a"])).save(&path).unwrap();
        assert_eq!(Favorites::load(&path).unwrap(), ids(&["c", "a"]));
    }
}
