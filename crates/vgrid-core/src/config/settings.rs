use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vgrid_types::{AppSorting, FavoritesSorting, SettingKey};

/// Grid settings, mirroring the extension's settings schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Icons per row, at least 1
    #[serde(default = "default_columns")]
    pub columns: u32,

    /// Icon size in pixels
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,

    /// Gap between icons in pixels, also drives label margins
    #[serde(default = "default_icon_spacing")]
    pub icon_spacing: u32,

    /// Show favorites in their own section above all apps
    #[serde(default)]
    pub favorites_section: bool,

    #[serde(default)]
    pub app_sorting: AppSorting,

    #[serde(default)]
    pub favorites_sorting: FavoritesSorting,

    /// Animate wheel scrolling
    #[serde(default = "default_animate_scroll")]
    pub animate_scroll: bool,
}

fn default_columns() -> u32 {
    6
}
fn default_icon_size() -> u32 {
    64
}
fn default_icon_spacing() -> u32 {
    24
}
fn default_animate_scroll() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            icon_size: default_icon_size(),
            icon_spacing: default_icon_spacing(),
            favorites_section: false,
            app_sorting: AppSorting::default(),
            favorites_sorting: FavoritesSorting::default(),
            animate_scroll: default_animate_scroll(),
        }
    }
}

impl Settings {
    /// Load settings from file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings.normalized())
    }

    /// Save settings to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Clamp values the layout cannot use.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.columns == 0 {
            tracing::warn!("columns must be at least 1, using 1");
            self.columns = 1;
        }
        self
    }

    /// Keys whose values differ between `self` and `other`.
    #[must_use]
    pub fn changed_keys(&self, other: &Settings) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| match key {
                SettingKey::Columns => self.columns != other.columns,
                SettingKey::IconSize => self.icon_size != other.icon_size,
                SettingKey::IconSpacing => self.icon_spacing != other.icon_spacing,
                SettingKey::FavoritesSection => self.favorites_section != other.favorites_section,
                SettingKey::AppSorting => self.app_sorting != other.app_sorting,
                SettingKey::FavoritesSorting => self.favorites_sorting != other.favorites_sorting,
                SettingKey::AnimateScroll => self.animate_scroll != other.animate_scroll,
            })
            .collect()
    }
}
