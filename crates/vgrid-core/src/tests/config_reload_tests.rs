//! Tests for reloading configuration and host files from disk

use super::fixtures::{Harness, make_apps};
use crate::Result;
use crate::bridge::ChangeNotificationBridge;
use crate::config::{Directories, Settings, SettingsStore};
use crate::host::{AppDirectory, Favorites, HiddenAppsPolicy};
use crate::usage::UsageTracker;
use std::fs;
use tempfile::TempDir;
use vgrid_types::{AppSorting, SettingKey};

#[test]
fn test_reload_emits_only_changed_keys() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let dirs = Directories::with_base(temp_dir.path().to_path_buf());
    dirs.ensure_exists()?;

    fs::write(&dirs.config_file, r#"{ "columns": 8, "iconSize": 48 }"#)?;
    let store = SettingsStore::new(Settings::load(&dirs.config_file)?);
    assert_eq!(store.columns(), 8);
    assert_eq!(store.icon_spacing(), 24);

    fs::write(
        &dirs.config_file,
        r#"{ "columns": 8, "iconSize": 56, "appSorting": "usage" }"#,
    )?;
    let changed = store.replace(Settings::load(&dirs.config_file)?);
    assert_eq!(changed, vec![SettingKey::IconSize, SettingKey::AppSorting]);
    assert_eq!(store.app_sorting(), AppSorting::Usage);

    // Unchanged file, nothing to report
    assert!(store.replace(Settings::load(&dirs.config_file)?).is_empty());
    Ok(())
}

#[test]
fn test_malformed_config_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ columns: ").unwrap();

    assert!(Settings::load(&path).is_err());
}

#[test]
fn test_host_files_load_from_directories() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let dirs = Directories::with_base(temp_dir.path().to_path_buf());
    dirs.ensure_exists()?;

    fs::write(
        &dirs.catalog_file,
        r#"[
            { "id": "files.desktop", "name": "Files", "icon": "folder" },
            { "id": "term.desktop", "name": "Terminal", "categories": ["System"] }
        ]"#,
    )?;
    fs::write(&dirs.favorites_file, r#"["term.desktop"]"#)?;
    fs::write(&dirs.hidden_file, r#"["category:Game"]"#)?;

    let apps = AppDirectory::load_catalog(&dirs.catalog_file)?;
    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].icon.as_deref(), Some("folder"));
    assert_eq!(apps[1].categories, vec!["System".to_string()]);

    assert_eq!(Favorites::load(&dirs.favorites_file)?, vec!["term.desktop"]);
    assert_eq!(HiddenAppsPolicy::load(&dirs.hidden_file)?, vec!["category:Game"]);

    // Never launched, nothing saved yet
    let usage = UsageTracker::load(&dirs.usage_file)?;
    assert!(usage.record("files.desktop").is_none());
    Ok(())
}

#[test]
fn test_reloaded_settings_reach_the_display() {
    let h = Harness::new(make_apps(9), &[], Settings::default());
    let _bridge = ChangeNotificationBridge::connect(&h.display, None);

    let mut edited = h.settings.get();
    edited.columns = 3;
    edited.icon_size = 32;
    h.settings.replace(edited);

    let geometry = h.display.geometry(crate::SectionKind::Main);
    assert_eq!(geometry.columns, 3);
    assert_eq!(geometry.rows, 3);
    assert!((geometry.cell_size - 64.0).abs() < f32::EPSILON);
    assert!(!h.display.redisplay_pending());
}
