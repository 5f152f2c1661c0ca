//! Wires external change notifications to display updates.

use crate::display::{VerticalAppDisplay, WeakDisplay};
use crate::signal::{Disposer, Signal};
use tracing::debug;
use vgrid_types::SettingKey;

/// The one update a notification maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeAction {
    Redisplay,
    UpdateLabelMargins,
    UpdateIconSize,
    UpdateLayout,
    ResetScroll,
}

/// Settings the display itself reacts to.
#[must_use]
pub fn display_action(key: SettingKey) -> Option<BridgeAction> {
    match key {
        SettingKey::AppSorting | SettingKey::FavoritesSection | SettingKey::FavoritesSorting => {
            Some(BridgeAction::Redisplay)
        }
        SettingKey::IconSpacing => Some(BridgeAction::UpdateLabelMargins),
        SettingKey::IconSize => Some(BridgeAction::UpdateIconSize),
        SettingKey::Columns | SettingKey::AnimateScroll => None,
    }
}

/// Settings the grid layouts react to.
#[must_use]
pub fn layout_action(key: SettingKey) -> Option<BridgeAction> {
    match key {
        SettingKey::Columns | SettingKey::IconSpacing => Some(BridgeAction::UpdateLayout),
        _ => None,
    }
}

fn apply(display: &WeakDisplay, action: BridgeAction) {
    let Some(display) = display.upgrade() else {
        return;
    };
    debug!("Bridge action: {action:?}");
    match action {
        BridgeAction::Redisplay => display.redisplay(),
        BridgeAction::UpdateLabelMargins => display.update_label_margins(),
        BridgeAction::UpdateIconSize => display.update_icon_size(),
        BridgeAction::UpdateLayout => display.update_layout(),
        BridgeAction::ResetScroll => display.overview_hidden(),
    }
}

/// Holds every subscription feeding one display.
#[derive(Debug)]
pub struct ChangeNotificationBridge {
    disposer: Disposer,
}

impl ChangeNotificationBridge {
    /// Subscribe `display` to its collaborators' change signals, its settings
    /// and, when given, the host's overview-hidden signal.
    #[must_use]
    pub fn connect(display: &VerticalAppDisplay, overview_hidden: Option<&Signal<()>>) -> Self {
        let mut disposer = Disposer::new();
        let collection = display.collection();
        let settings = display.settings();

        let sources = [
            collection.directory().installed_changed(),
            collection.favorites().changed(),
            collection.policy().changed(),
        ];
        for signal in sources {
            let weak = display.downgrade();
            disposer.add(signal.connect(move |()| apply(&weak, BridgeAction::Redisplay)));
        }

        let weak = display.downgrade();
        disposer.add(settings.connect_changed(move |key| {
            if let Some(action) = display_action(*key) {
                apply(&weak, action);
            }
        }));

        let weak = display.downgrade();
        disposer.add(settings.connect_changed(move |key| {
            if let Some(action) = layout_action(*key) {
                apply(&weak, action);
            }
        }));

        if let Some(signal) = overview_hidden {
            let weak = display.downgrade();
            disposer.add(signal.connect(move |()| apply(&weak, BridgeAction::ResetScroll)));
        }

        debug!("Bridge connected with {} subscriptions", disposer.len());
        Self { disposer }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.disposer.is_empty()
    }

    /// Disconnect everything. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.is_connected() {
            debug!("Bridge teardown");
        }
        self.disposer.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_subscriber_only_updates_layout() {
        for key in SettingKey::ALL {
            assert_ne!(display_action(key), Some(BridgeAction::UpdateLayout));
            assert!(matches!(
                layout_action(key),
                None | Some(BridgeAction::UpdateLayout)
            ));
        }
    }

    #[test]
    fn sorting_changes_rebuild() {
        assert_eq!(
            display_action(SettingKey::AppSorting),
            Some(BridgeAction::Redisplay)
        );
        assert_eq!(
            display_action(SettingKey::FavoritesSection),
            Some(BridgeAction::Redisplay)
        );
        assert_eq!(
            display_action(SettingKey::FavoritesSorting),
            Some(BridgeAction::Redisplay)
        );
    }

    #[test]
    fn size_and_spacing_update_in_place() {
        assert_eq!(
            display_action(SettingKey::IconSize),
            Some(BridgeAction::UpdateIconSize)
        );
        assert_eq!(
            display_action(SettingKey::IconSpacing),
            Some(BridgeAction::UpdateLabelMargins)
        );
        assert_eq!(
            layout_action(SettingKey::IconSpacing),
            Some(BridgeAction::UpdateLayout)
        );
        assert_eq!(
            layout_action(SettingKey::Columns),
            Some(BridgeAction::UpdateLayout)
        );
        assert_eq!(display_action(SettingKey::AnimateScroll), None);
        assert_eq!(layout_action(SettingKey::AnimateScroll), None);
    }
}
