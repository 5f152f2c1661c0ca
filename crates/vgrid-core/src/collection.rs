//! Loading, filtering and sorting the app collection into sections.

use crate::config::Settings;
use crate::host::{EntryDirectory, FavoritesStore, UsageStats, VisibilityPolicy};
use feruca::Collator;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use tracing::{debug, warn};
use vgrid_types::{AppInfo, AppSorting, FavoritesSorting};

/// One launchable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub app: AppInfo,
    pub favorite: bool,
}

impl Entry {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.app.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.app.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Favorites,
    Main,
}

impl SectionKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorites => "Favorites",
            Self::Main => "All Apps",
        }
    }
}

/// The sectioned result of one load. Built in one go, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub favorites: Vec<Entry>,
    pub main: Vec<Entry>,
}

impl Sections {
    #[must_use]
    pub fn entries(&self, kind: SectionKind) -> &[Entry] {
        match kind {
            SectionKind::Favorites => &self.favorites,
            SectionKind::Main => &self.main,
        }
    }

    #[must_use]
    pub fn show_favorites(&self) -> bool {
        !self.favorites.is_empty()
    }

    #[must_use]
    pub fn show_main(&self) -> bool {
        !self.main.is_empty()
    }

    /// The "All Apps" label only makes sense when there is something above it.
    #[must_use]
    pub fn show_main_label(&self) -> bool {
        self.show_favorites() && self.show_main()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.favorites.len() + self.main.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in display order: favorites section first, then the main section.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.favorites.iter().chain(self.main.iter()).map(Entry::id)
    }
}

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Case-insensitive name comparison under the Unicode root collation, so
/// accented names sort with their base letters.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (la, lb) = (a.to_lowercase(), b.to_lowercase());
    COLLATOR.with(|collator| collator.borrow_mut().collate(la.as_str(), lb.as_str()))
}

/// Owns the collaborators the collection is built from.
#[derive(Clone)]
pub struct AppCollectionView {
    directory: Rc<dyn EntryDirectory>,
    favorites: Rc<dyn FavoritesStore>,
    policy: Rc<dyn VisibilityPolicy>,
    usage: Rc<dyn UsageStats>,
}

impl AppCollectionView {
    #[must_use]
    pub fn new(
        directory: Rc<dyn EntryDirectory>,
        favorites: Rc<dyn FavoritesStore>,
        policy: Rc<dyn VisibilityPolicy>,
        usage: Rc<dyn UsageStats>,
    ) -> Self {
        Self {
            directory,
            favorites,
            policy,
            usage,
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Rc<dyn EntryDirectory> {
        &self.directory
    }

    #[must_use]
    pub fn favorites(&self) -> &Rc<dyn FavoritesStore> {
        &self.favorites
    }

    #[must_use]
    pub fn policy(&self) -> &Rc<dyn VisibilityPolicy> {
        &self.policy
    }

    #[must_use]
    pub fn usage(&self) -> &Rc<dyn UsageStats> {
        &self.usage
    }

    /// Load the installed apps into sections according to `settings`.
    ///
    /// Favorites are sorted by the favorites policy, the rest by the app
    /// policy. With the favorites section disabled every entry lands in the
    /// main section, favorites first.
    #[must_use]
    pub fn load(&self, settings: &Settings) -> Sections {
        let (mut favs, mut apps): (Vec<Entry>, Vec<Entry>) = self
            .showable_entries()
            .into_iter()
            .partition(|entry| entry.favorite);

        self.sort_favorites(&mut favs, settings.favorites_sorting);
        self.sort_apps(&mut apps, settings.app_sorting);

        let sections = if settings.favorites_section {
            Sections {
                favorites: favs,
                main: apps,
            }
        } else {
            favs.extend(apps);
            Sections {
                favorites: Vec::new(),
                main: favs,
            }
        };

        debug!(
            "Loaded {} favorites and {} apps",
            sections.favorites.len(),
            sections.main.len()
        );
        sections
    }

    /// Installed apps that pass the visibility policy. An entry whose check
    /// fails is dropped on its own.
    fn showable_entries(&self) -> Vec<Entry> {
        self.directory
            .installed()
            .into_iter()
            .filter_map(|app| {
                if app.id.trim().is_empty() {
                    warn!("Skipping app without id: {:?}", app.name);
                    return None;
                }

                match self.policy.should_show(&app) {
                    Ok(true) => {}
                    Ok(false) => return None,
                    Err(e) => {
                        warn!("Skipping {}: {e}", app.id);
                        return None;
                    }
                }

                let favorite = self.favorites.is_favorite(&app.id);
                Some(Entry { app, favorite })
            })
            .collect()
    }

    fn sort_by_usage(&self, entries: &mut [Entry]) {
        let compare = self.usage.comparator();
        entries.sort_by(|a, b| compare(a.id(), b.id()).unwrap_or(Ordering::Equal));
    }

    fn sort_apps(&self, apps: &mut [Entry], sorting: AppSorting) {
        match sorting {
            AppSorting::Usage => self.sort_by_usage(apps),
            AppSorting::Alphabetical => apps.sort_by(|a, b| compare_names(a.name(), b.name())),
        }
    }

    fn sort_favorites(&self, favs: &mut [Entry], sorting: FavoritesSorting) {
        match sorting {
            FavoritesSorting::Dash => {
                let order = self.favorites.ids();
                // Ids missing from the order list go last, in input order
                favs.sort_by_key(|entry| {
                    order
                        .iter()
                        .position(|id| id == entry.id())
                        .unwrap_or(usize::MAX)
                });
            }
            FavoritesSorting::Usage => self.sort_by_usage(favs),
            FavoritesSorting::Alphabetical => {
                favs.sort_by(|a, b| compare_names(a.name(), b.name()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_names_ignores_case() {
        assert_eq!(compare_names("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_names("ZED", "yak"), Ordering::Greater);
        assert_eq!(compare_names("Files", "files"), Ordering::Equal);
    }

    #[test]
    fn compare_names_places_accents_with_base_letter() {
        assert_eq!(compare_names("Éditeur", "Zoom"), Ordering::Less);
        assert_eq!(compare_names("éclair", "Ecole"), Ordering::Less);
        assert_eq!(compare_names("Ångström", "apple"), Ordering::Less);
    }

    #[test]
    fn main_label_needs_both_sections() {
        let entry = Entry {
            app: AppInfo::new("a", "A"),
            favorite: false,
        };
        let only_main = Sections {
            favorites: Vec::new(),
            main: vec![entry.clone()],
        };
        assert!(!only_main.show_main_label());
        assert!(!only_main.show_favorites());

        let both = Sections {
            favorites: vec![entry.clone()],
            main: vec![entry],
        };
        assert!(both.show_main_label());
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn section_labels() {
        assert_eq!(SectionKind::Favorites.label(), "Favorites");
        assert_eq!(SectionKind::Main.label(), "All Apps");
    }
}
