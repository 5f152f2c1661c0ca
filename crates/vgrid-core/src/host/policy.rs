use super::{VisibilityPolicy, read_json_list};
use crate::signal::Signal;
use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;
use vgrid_types::AppInfo;

/// Hides apps by id or by category, like a parental-controls app filter.
#[derive(Debug, Default)]
pub struct HiddenAppsPolicy {
    hidden: RefCell<HashSet<String>>,
    changed: Signal<()>,
}

impl HiddenAppsPolicy {
    #[must_use]
    pub fn new(hidden: impl IntoIterator<Item = String>) -> Self {
        let policy = Self::default();
        *policy.hidden.borrow_mut() = hidden.into_iter().collect();
        policy
    }

    /// Entries are app ids or `category:<Name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON list.
    pub fn load(path: &Path) -> Result<Vec<String>> {
        read_json_list(path)
    }

    pub fn set_hidden(&self, hidden: impl IntoIterator<Item = String>) {
        let hidden: HashSet<String> = hidden.into_iter().collect();
        if *self.hidden.borrow() != hidden {
            *self.hidden.borrow_mut() = hidden;
            self.changed.emit(&());
        }
    }
}

impl VisibilityPolicy for HiddenAppsPolicy {
    fn should_show(&self, app: &AppInfo) -> Result<bool> {
        if app.id.trim().is_empty() {
            return Err(Error::Policy {
                app_id: app.name.clone(),
                reason: "missing app id".to_string(),
            });
        }

        let hidden = self.hidden.borrow();
        if hidden.contains(&app.id) {
            return Ok(false);
        }

        let blocked_category = app
            .categories
            .iter()
            .any(|category| hidden.contains(&format!("category:{category}")));

        Ok(!blocked_category)
    }

    fn changed(&self) -> &Signal<()> {
        &self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_by_id() {
        let policy = HiddenAppsPolicy::new(["steam.desktop".to_string()]);
        assert!(!policy.should_show(&AppInfo::new("steam.desktop", "Steam")).unwrap());
        assert!(policy.should_show(&AppInfo::new("gimp.desktop", "GIMP")).unwrap());
    }

    #[test]
    fn hides_by_category() {
        let policy = HiddenAppsPolicy::new(["category:Game".to_string()]);
        let mut app = AppInfo::new("chess.desktop", "Chess");
        app.categories = vec!["Board".to_string(), "Game".to_string()];
        assert!(!policy.should_show(&app).unwrap());
    }

    #[test]
    fn missing_id_is_an_error() {
        let policy = HiddenAppsPolicy::default();
        let err = policy.should_show(&AppInfo::new("  ", "Broken")).unwrap_err();
        assert!(matches!(err, Error::Policy { .. }));
    }

    #[test]
    fn set_hidden_notifies_on_change() {
        use std::cell::Cell;
        use std::rc::Rc;

        let policy = HiddenAppsPolicy::default();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = policy.changed().connect(move |()| h.set(h.get() + 1));

        policy.set_hidden(Vec::new());
        policy.set_hidden(vec!["a.desktop".to_string()]);
        assert_eq!(hits.get(), 1);
    }
}
