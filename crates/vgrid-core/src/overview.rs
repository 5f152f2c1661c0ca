//! Policies the host overview asks the app display for.
//!
//! The host keeps ownership of its overview controls and app menu; it calls
//! these functions (and [`crate::VerticalAppDisplay::update_visibility`] /
//! [`crate::VerticalAppDisplay::set_search_active`]) instead of having its
//! behavior replaced.

/// Overview states in the order the host animates through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ControlsState {
    Hidden,
    WindowPicker,
    AppGrid,
}

/// A transition between two overview states, possibly in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub initial: ControlsState,
    pub target: ControlsState,
}

impl StateTransition {
    #[must_use]
    pub fn new(initial: ControlsState, target: ControlsState) -> Self {
        Self { initial, target }
    }

    #[must_use]
    pub fn settled(state: ControlsState) -> Self {
        Self::new(state, state)
    }
}

/// The app display is visible once either end of the transition is past the
/// window picker, unless a search is showing results.
#[must_use]
pub fn app_display_visible(transition: StateTransition, search_active: bool) -> bool {
    let state = transition.initial.max(transition.target);
    state > ControlsState::WindowPicker && !search_active
}

/// Opacity the display fades to when search toggles.
#[must_use]
pub fn search_fade_opacity(search_active: bool) -> f64 {
    if search_active { 0.0 } else { 1.0 }
}

/// Label for the favorite toggle in an app's context menu.
#[must_use]
pub fn favorite_menu_label(is_favorite: bool) -> &'static str {
    if is_favorite {
        "Remove from Favorites"
    } else {
        "Add to Favorites"
    }
}
