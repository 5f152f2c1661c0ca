//! Shared types for vgrid components.
//!
//! This crate provides the plain data types used by vgrid-core and the
//! front ends: application records, sorting policies, setting keys, input
//! events and geometry. All wire-facing types are serde serializable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Deserialize a Vec that may be null or missing (both become empty vec)
fn deserialize_null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// An installed application as reported by the entry directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    /// Stable identifier, usually the desktop file id (`org.gnome.Nautilus.desktop`)
    pub id: String,

    /// Display name
    pub name: String,

    /// Icon name or path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Command line used to launch the app
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<String>,

    /// Free-form categories, used by visibility policies
    #[serde(
        default,
        deserialize_with = "deserialize_null_as_empty_vec",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub categories: Vec<String>,
}

impl AppInfo {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_exec(mut self, exec: impl Into<String>) -> Self {
        self.exec = Some(exec.into());
        self
    }
}

/// Sort policy of the main ("All Apps") section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppSorting {
    Usage,
    #[default]
    Alphabetical,
}

impl AppSorting {
    /// Parse a stored setting value. Unknown values fall back to alphabetical.
    #[must_use]
    pub fn from_setting(value: &str) -> Self {
        match value {
            "usage" => Self::Usage,
            _ => Self::Alphabetical,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Alphabetical => "alphabetical",
        }
    }
}

/// Sort policy of the favorites section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FavoritesSorting {
    /// Explicit order of the favorites store (the dash order)
    Dash,
    Usage,
    #[default]
    Alphabetical,
}

impl FavoritesSorting {
    /// Parse a stored setting value. Unknown values fall back to alphabetical.
    #[must_use]
    pub fn from_setting(value: &str) -> Self {
        match value {
            "dash" => Self::Dash,
            "usage" => Self::Usage,
            _ => Self::Alphabetical,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dash => "dash",
            Self::Usage => "usage",
            Self::Alphabetical => "alphabetical",
        }
    }
}

macro_rules! lenient_string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw: Option<String> = Option::deserialize(deserializer)?;
                Ok(raw.map_or_else(Self::default, |s| Self::from_setting(&s)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

lenient_string_serde!(AppSorting);
lenient_string_serde!(FavoritesSorting);

/// Configuration keys, named as in the settings schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Columns,
    IconSize,
    IconSpacing,
    FavoritesSection,
    AppSorting,
    FavoritesSorting,
    AnimateScroll,
}

impl SettingKey {
    pub const ALL: [SettingKey; 7] = [
        SettingKey::Columns,
        SettingKey::IconSize,
        SettingKey::IconSpacing,
        SettingKey::FavoritesSection,
        SettingKey::AppSorting,
        SettingKey::FavoritesSorting,
        SettingKey::AnimateScroll,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Columns => "columns",
            Self::IconSize => "icon-size",
            Self::IconSpacing => "icon-spacing",
            Self::FavoritesSection => "favorites-section",
            Self::AppSorting => "app-sorting",
            Self::FavoritesSorting => "favorites-sorting",
            Self::AnimateScroll => "animate-scroll",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// Keys the display reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    /// Shift+Tab (`ISO_Left_Tab`)
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Other,
}

/// Result of event handling, mirroring toolkit event propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Event consumed
    Stop,
    /// Event not handled here, let the parent see it
    Proceed,
}

impl Propagation {
    #[must_use]
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
    /// Continuous (trackpad / high resolution wheel) scrolling with deltas
    Smooth,
}

/// A pointer scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub direction: ScrollDirection,
    /// Smooth deltas (x, y), only meaningful for `ScrollDirection::Smooth`
    pub delta: (f64, f64),
    /// Event synthesized from another event (pointer emulation)
    pub emulated: bool,
}

impl ScrollEvent {
    #[must_use]
    pub fn discrete(direction: ScrollDirection) -> Self {
        Self {
            direction,
            delta: (0.0, 0.0),
            emulated: false,
        }
    }

    #[must_use]
    pub fn smooth(dx: f64, dy: f64) -> Self {
        Self {
            direction: ScrollDirection::Smooth,
            delta: (dx, dy),
            emulated: false,
        }
    }

    #[must_use]
    pub fn emulated(mut self) -> Self {
        self.emulated = true;
        self
    }

    #[must_use]
    pub fn is_smooth(&self) -> bool {
        self.direction == ScrollDirection::Smooth
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size::new(0.0, 0.0);
}

/// An allocation box in the coordinate space of the parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl ActorBox {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Shift the box by the origin of its parent.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)] // Exact float comparisons are intentional in tests
mod tests {
    use super::*;

    #[test]
    fn app_sorting_unknown_falls_back_to_alphabetical() {
        assert_eq!(AppSorting::from_setting("usage"), AppSorting::Usage);
        assert_eq!(AppSorting::from_setting("dash"), AppSorting::Alphabetical);
        assert_eq!(AppSorting::from_setting(""), AppSorting::Alphabetical);
    }

    #[test]
    fn favorites_sorting_parses_all_modes() {
        assert_eq!(FavoritesSorting::from_setting("dash"), FavoritesSorting::Dash);
        assert_eq!(FavoritesSorting::from_setting("usage"), FavoritesSorting::Usage);
        assert_eq!(
            FavoritesSorting::from_setting("alphabetical"),
            FavoritesSorting::Alphabetical
        );
        assert_eq!(
            FavoritesSorting::from_setting("by-color"),
            FavoritesSorting::Alphabetical
        );
    }

    #[test]
    fn sorting_deserializes_leniently() {
        let sorting: AppSorting = serde_json::from_str("\"usage\"").unwrap();
        assert_eq!(sorting, AppSorting::Usage);

        let sorting: AppSorting = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(sorting, AppSorting::Alphabetical);

        let sorting: FavoritesSorting = serde_json::from_str("null").unwrap();
        assert_eq!(sorting, FavoritesSorting::Alphabetical);
    }

    #[test]
    fn sorting_serializes_as_setting_string() {
        assert_eq!(
            serde_json::to_string(&FavoritesSorting::Dash).unwrap(),
            "\"dash\""
        );
        assert_eq!(AppSorting::Usage.to_string(), "usage");
    }

    #[test]
    fn setting_key_roundtrips_through_str() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), key);
        }
        assert!("icon-colour".parse::<SettingKey>().is_err());
    }

    #[test]
    fn app_info_minimal_json() {
        let app: AppInfo =
            serde_json::from_str(r#"{"id": "firefox.desktop", "name": "Firefox"}"#).unwrap();
        assert_eq!(app.id, "firefox.desktop");
        assert!(app.icon.is_none());
        assert!(app.categories.is_empty());
    }

    #[test]
    fn app_info_null_categories() {
        let app: AppInfo = serde_json::from_str(
            r#"{"id": "a.desktop", "name": "A", "icon": "a", "categories": null}"#,
        )
        .unwrap();
        assert_eq!(app.icon.as_deref(), Some("a"));
        assert!(app.categories.is_empty());
    }

    #[test]
    fn actor_box_geometry() {
        let b = ActorBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.width(), 30.0);
        assert_eq!(b.height(), 40.0);
        let moved = b.translated(5.0, -5.0);
        assert_eq!(moved.x1, 15.0);
        assert_eq!(moved.y2, 55.0);
    }

    #[test]
    fn scroll_event_builders() {
        let ev = ScrollEvent::smooth(0.0, 1.5);
        assert!(ev.is_smooth());
        assert!(!ev.emulated);
        assert!(ScrollEvent::discrete(ScrollDirection::Down).emulated().emulated);
    }
}
