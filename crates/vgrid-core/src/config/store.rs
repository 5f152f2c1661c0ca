//! Live settings with per-key change notification.

use super::Settings;
use crate::signal::{Signal, Subscription};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use vgrid_types::{AppSorting, FavoritesSorting, SettingKey};

struct Inner {
    settings: RefCell<Settings>,
    changed: Signal<SettingKey>,
}

/// Shared settings handle. Clones observe and mutate the same values.
///
/// Every mutation emits `changed` once for each key whose value actually
/// changed, after the new values are in place.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &self.inner.settings.borrow())
            .finish()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsStore {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Rc::new(Inner {
                settings: RefCell::new(settings.normalized()),
                changed: Signal::new(),
            }),
        }
    }

    /// Snapshot of all values.
    #[must_use]
    pub fn get(&self) -> Settings {
        self.inner.settings.borrow().clone()
    }

    #[must_use]
    pub fn columns(&self) -> u32 {
        self.inner.settings.borrow().columns
    }

    #[must_use]
    pub fn icon_size(&self) -> u32 {
        self.inner.settings.borrow().icon_size
    }

    #[must_use]
    pub fn icon_spacing(&self) -> u32 {
        self.inner.settings.borrow().icon_spacing
    }

    #[must_use]
    pub fn favorites_section(&self) -> bool {
        self.inner.settings.borrow().favorites_section
    }

    #[must_use]
    pub fn app_sorting(&self) -> AppSorting {
        self.inner.settings.borrow().app_sorting
    }

    #[must_use]
    pub fn favorites_sorting(&self) -> FavoritesSorting {
        self.inner.settings.borrow().favorites_sorting
    }

    #[must_use]
    pub fn animate_scroll(&self) -> bool {
        self.inner.settings.borrow().animate_scroll
    }

    pub fn set_columns(&self, columns: u32) {
        self.update(|s| s.columns = columns);
    }

    pub fn set_icon_size(&self, size: u32) {
        self.update(|s| s.icon_size = size);
    }

    pub fn set_icon_spacing(&self, spacing: u32) {
        self.update(|s| s.icon_spacing = spacing);
    }

    pub fn set_favorites_section(&self, enabled: bool) {
        self.update(|s| s.favorites_section = enabled);
    }

    pub fn set_app_sorting(&self, sorting: AppSorting) {
        self.update(|s| s.app_sorting = sorting);
    }

    pub fn set_favorites_sorting(&self, sorting: FavoritesSorting) {
        self.update(|s| s.favorites_sorting = sorting);
    }

    pub fn set_animate_scroll(&self, enabled: bool) {
        self.update(|s| s.animate_scroll = enabled);
    }

    /// Replace every value, e.g. after the config file was edited.
    /// Returns the keys that changed.
    pub fn replace(&self, settings: Settings) -> Vec<SettingKey> {
        self.update(move |s| *s = settings)
    }

    /// Apply `mutate` and notify for every key that changed.
    pub fn update(&self, mutate: impl FnOnce(&mut Settings)) -> Vec<SettingKey> {
        let changed = {
            let mut settings = self.inner.settings.borrow_mut();
            let before = settings.clone();
            mutate(&mut settings);
            *settings = settings.clone().normalized();
            before.changed_keys(&settings)
        };

        for key in &changed {
            debug!("Setting changed: {key}");
            self.inner.changed.emit(key);
        }

        changed
    }

    /// Subscribe to per-key change notifications.
    #[must_use = "keep the subscription to be able to disconnect"]
    pub fn connect_changed(&self, handler: impl Fn(&SettingKey) + 'static) -> Subscription {
        self.inner.changed.connect(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder(store: &SettingsStore) -> (Rc<RefCell<Vec<SettingKey>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let sub = store.connect_changed(move |key| s.borrow_mut().push(*key));
        (seen, sub)
    }

    #[test]
    fn setter_emits_only_on_change() {
        let store = SettingsStore::default();
        let (seen, _sub) = recorder(&store);

        store.set_columns(8);
        store.set_columns(8);
        store.set_icon_size(64);

        assert_eq!(*seen.borrow(), vec![SettingKey::Columns]);
        assert_eq!(store.columns(), 8);
    }

    #[test]
    fn replace_emits_one_notification_per_changed_key() {
        let store = SettingsStore::default();
        let (seen, _sub) = recorder(&store);

        let changed = store.replace(Settings {
            icon_spacing: 12,
            animate_scroll: false,
            ..Settings::default()
        });

        assert_eq!(
            changed,
            vec![SettingKey::IconSpacing, SettingKey::AnimateScroll]
        );
        assert_eq!(*seen.borrow(), changed);
    }

    #[test]
    fn handlers_see_new_values() {
        let store = SettingsStore::default();
        let observed = Rc::new(RefCell::new(None));
        let o = observed.clone();
        let reader = store.clone();
        let _sub = store.connect_changed(move |_| *o.borrow_mut() = Some(reader.icon_size()));

        store.set_icon_size(96);
        assert_eq!(*observed.borrow(), Some(96));
    }

    #[test]
    fn zero_columns_are_clamped() {
        let store = SettingsStore::default();
        store.set_columns(0);
        assert_eq!(store.columns(), 1);
    }

    #[test]
    fn sorting_setters() {
        let store = SettingsStore::default();
        store.set_app_sorting(AppSorting::Usage);
        store.set_favorites_sorting(FavoritesSorting::Dash);
        store.set_favorites_section(true);
        let settings = store.get();
        assert_eq!(settings.app_sorting, AppSorting::Usage);
        assert_eq!(settings.favorites_sorting, FavoritesSorting::Dash);
        assert!(settings.favorites_section);
    }
}
