//! Collaborators supplied by the host environment.
//!
//! The display never talks to the system directly. It reads installed apps,
//! favorites, the visibility policy and usage statistics through these
//! traits and listens to their change signals. In-memory implementations
//! backed by JSON files are provided for front ends without a shell.

mod directory;
mod favorites;
mod policy;

pub use directory::AppDirectory;
pub use favorites::Favorites;
pub use policy::HiddenAppsPolicy;

use crate::Result;
use crate::signal::Signal;
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::path::Path;
use vgrid_types::AppInfo;

/// Installed application directory.
pub trait EntryDirectory {
    fn installed(&self) -> Vec<AppInfo>;
    fn lookup(&self, id: &str) -> Option<AppInfo>;
    /// Emitted when apps are installed or removed
    fn installed_changed(&self) -> &Signal<()>;
}

/// User favorites with an explicit order.
pub trait FavoritesStore {
    fn is_favorite(&self, id: &str) -> bool;
    /// Favorite ids in their manual order
    fn ids(&self) -> Vec<String>;
    fn changed(&self) -> &Signal<()>;
}

/// Decides whether an app may be shown (parental controls, hidden apps).
pub trait VisibilityPolicy {
    /// # Errors
    ///
    /// Implementations may fail for malformed entries; callers treat a
    /// failure as "do not show this entry".
    fn should_show(&self, app: &AppInfo) -> Result<bool>;
    fn changed(&self) -> &Signal<()>;
}

/// Usage ranking between two apps.
pub trait UsageStats {
    /// `Less` means `a` ranks before `b`. `None` when nothing is known.
    fn compare(&self, a: &str, b: &str) -> Option<Ordering>;

    /// A comparator that stays consistent for a whole sort. Time-dependent
    /// rankings fix their clock once here.
    fn comparator(&self) -> Box<dyn Fn(&str, &str) -> Option<Ordering> + '_> {
        Box::new(|a, b| self.compare(a, b))
    }

    /// Note a launch of `id`. Read-only sources ignore it.
    fn record_launch(&self, _id: &str) {}
}

/// Read a JSON array from `path`. A missing file is an empty list.
pub(crate) fn read_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}
