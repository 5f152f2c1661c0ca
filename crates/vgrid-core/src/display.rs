//! The vertical app display: labeled sections of icon grids in a kinetic
//! scroll box.
//!
//! [`VerticalAppDisplay`] composes the collection, two grid layouts, the
//! scroll controller and the fades. It never renders anything itself; front
//! ends read a [`DisplaySnapshot`] every frame.

use crate::animation::{Easing, FADE_DURATION, Transition};
use crate::clock::Clock;
use crate::collection::{AppCollectionView, Entry, SectionKind, Sections};
use crate::config::SettingsStore;
use crate::laters::{Laters, SourceId};
use crate::layout::{GridLayoutEngine, LayoutChild, LayoutGeometry};
use crate::overview::{StateTransition, app_display_visible, search_fade_opacity};
use crate::scroll::KineticScrollController;
use crate::signal::{Signal, Subscription};
use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, trace};
use vgrid_types::{ActorBox, Key, Propagation, ScrollEvent, Size};

/// Height of a section label line.
pub const LABEL_HEIGHT: f32 = 24.0;

/// Space around the icon inside its cell.
const ICON_PADDING: f32 = 8.0;

/// Height of the app name below the icon.
const ICON_LABEL_HEIGHT: f32 = 16.0;

// Pixel settings are small, f32 is exact for them
#[allow(clippy::cast_precision_loss)]
fn px(value: u32) -> f32 {
    value as f32
}

fn columns_of(value: u32) -> usize {
    usize::try_from(value).unwrap_or(1)
}

/// Rendered representation of one entry. Icon size changes mutate it in
/// place; everything else replaces it on redisplay.
#[derive(Debug)]
pub struct AppIcon {
    entry: Entry,
    icon_size: Cell<u32>,
}

impl AppIcon {
    #[must_use]
    pub fn new(entry: Entry, icon_size: u32) -> Self {
        Self {
            entry,
            icon_size: Cell::new(icon_size),
        }
    }

    #[must_use]
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.entry.id()
    }

    #[must_use]
    pub fn icon_size(&self) -> u32 {
        self.icon_size.get()
    }

    pub fn set_icon_size(&self, size: u32) {
        self.icon_size.set(size);
    }
}

impl LayoutChild for AppIcon {
    fn natural_size(&self) -> Size {
        let icon = px(self.icon_size.get());
        Size::new(
            icon + 2.0 * ICON_PADDING,
            icon + 2.0 * ICON_PADDING + ICON_LABEL_HEIGHT,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LabelMargins {
    pub top: f32,
    pub bottom: f32,
}

impl LabelMargins {
    #[must_use]
    pub fn for_section(kind: SectionKind, spacing: f32) -> Self {
        match kind {
            SectionKind::Favorites => Self {
                top: 0.0,
                bottom: spacing,
            },
            SectionKind::Main => Self {
                top: 2.0 * spacing,
                bottom: spacing,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSnapshot {
    pub text: &'static str,
    /// Relative to the content box
    pub bounds: ActorBox,
    pub margins: LabelMargins,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellSnapshot {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub icon_size: u32,
    /// Relative to the section grid
    pub bounds: ActorBox,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionSnapshot {
    pub kind: SectionKind,
    pub label: Option<LabelSnapshot>,
    /// Relative to the content box
    pub grid: ActorBox,
    pub geometry: LayoutGeometry,
    pub cells: Vec<CellSnapshot>,
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    pub visible: bool,
    /// Search fade times redisplay fade
    pub opacity: f64,
    pub scroll: f64,
    pub viewport: Size,
    /// The stacked sections, in scrollable content coordinates
    pub content: ActorBox,
    pub sections: Vec<SectionSnapshot>,
}

impl DisplaySnapshot {
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<&SectionSnapshot> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.sections.iter().map(|s| s.cells.len()).sum()
    }
}

/// An opacity that may be easing towards a new value.
#[derive(Debug, Clone, Copy)]
struct Fade {
    value: f64,
    transition: Option<Transition>,
}

impl Fade {
    fn opaque() -> Self {
        Self {
            value: 1.0,
            transition: None,
        }
    }

    fn start(&mut self, now: Duration, to: f64) {
        self.transition = Some(Transition::new(
            now,
            self.value,
            to,
            FADE_DURATION,
            Easing::EaseOutQuad,
        ));
    }

    fn set(&mut self, value: f64) {
        self.value = value;
        self.transition = None;
    }

    fn is_active(&self) -> bool {
        self.transition.is_some()
    }

    /// Advance to `now`. Returns true when the fade finished on this tick.
    fn tick(&mut self, now: Duration) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let (value, done) = transition.sample(now);
        if done {
            self.set(transition.target());
        } else {
            self.value = value;
        }
        done
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RedisplayPhase {
    Idle,
    /// Content is fading out; the rebuild is scheduled once it finishes
    FadingOut,
    Scheduled(SourceId),
}

struct DisplayState {
    this: Weak<RefCell<DisplayState>>,
    settings: SettingsStore,
    collection: AppCollectionView,
    laters: Laters,
    clock: Rc<dyn Clock>,
    scroll: KineticScrollController,
    activated: Rc<Signal<String>>,

    favorites_grid: GridLayoutEngine,
    main_grid: GridLayoutEngine,
    favorites_margins: LabelMargins,
    main_margins: LabelMargins,

    sections: Sections,
    favorites_icons: Vec<Rc<AppIcon>>,
    main_icons: Vec<Rc<AppIcon>>,
    focus: Option<usize>,

    viewport: Size,
    visible: bool,
    opacity: Fade,
    content_opacity: Fade,
    fade_source: Option<SourceId>,
    redisplay: RedisplayPhase,
    destroyed: bool,
}

impl DisplayState {
    fn icons(&self, kind: SectionKind) -> &[Rc<AppIcon>] {
        match kind {
            SectionKind::Favorites => &self.favorites_icons,
            SectionKind::Main => &self.main_icons,
        }
    }

    fn grid(&self, kind: SectionKind) -> &GridLayoutEngine {
        match kind {
            SectionKind::Favorites => &self.favorites_grid,
            SectionKind::Main => &self.main_grid,
        }
    }

    fn margins(&self, kind: SectionKind) -> LabelMargins {
        match kind {
            SectionKind::Favorites => self.favorites_margins,
            SectionKind::Main => self.main_margins,
        }
    }

    fn label_visible(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Favorites => self.sections.show_favorites(),
            SectionKind::Main => self.sections.show_main_label(),
        }
    }

    fn icon_count(&self) -> usize {
        self.favorites_icons.len() + self.main_icons.len()
    }

    /// Section and in-section index of a flattened icon index.
    fn locate(&self, index: usize) -> Option<(SectionKind, usize)> {
        let favorites = self.favorites_icons.len();
        if index < favorites {
            Some((SectionKind::Favorites, index))
        } else if index - favorites < self.main_icons.len() {
            Some((SectionKind::Main, index - favorites))
        } else {
            None
        }
    }

    fn icon_at(&self, index: usize) -> Option<&Rc<AppIcon>> {
        let (kind, local) = self.locate(index)?;
        self.icons(kind).get(local)
    }

    fn apply_grid_params(&mut self) {
        let columns = columns_of(self.settings.columns());
        let spacing = px(self.settings.icon_spacing());
        let mut changed = false;
        for grid in [&mut self.favorites_grid, &mut self.main_grid] {
            changed |= grid.set_columns(columns);
            changed |= grid.set_spacing(spacing);
        }
        if changed {
            debug!("Grid layout set to {columns} columns, {spacing}px spacing");
        }
    }

    fn apply_label_margins(&mut self) {
        let spacing = px(self.settings.icon_spacing());
        self.favorites_margins = LabelMargins::for_section(SectionKind::Favorites, spacing);
        self.main_margins = LabelMargins::for_section(SectionKind::Main, spacing);
    }

    /// Stack labels and grids top to bottom and center the result.
    fn arrange(&self) -> (ActorBox, Vec<SectionSnapshot>) {
        let mut sections = Vec::new();
        let mut y = 0.0_f32;
        let mut width = 0.0_f32;
        let mut offset = 0;

        for kind in [SectionKind::Favorites, SectionKind::Main] {
            let icons = self.icons(kind);
            if icons.is_empty() {
                continue;
            }

            let label = if self.label_visible(kind) {
                let margins = self.margins(kind);
                y += margins.top;
                let bounds = ActorBox::new(0.0, y, 0.0, LABEL_HEIGHT);
                y += LABEL_HEIGHT + margins.bottom;
                Some(LabelSnapshot {
                    text: kind.label(),
                    bounds,
                    margins,
                })
            } else {
                None
            };

            let engine = self.grid(kind);
            let geometry = engine.geometry(icons);
            let grid = ActorBox::new(0.0, y, geometry.preferred.width, geometry.preferred.height);
            y += geometry.preferred.height;
            width = width.max(geometry.preferred.width);

            let cells = icons
                .iter()
                .zip(engine.allocate(icons))
                .enumerate()
                .map(|(i, (icon, bounds))| CellSnapshot {
                    id: icon.id().to_string(),
                    name: icon.entry().name().to_string(),
                    icon: icon.entry().app.icon.clone(),
                    icon_size: icon.icon_size(),
                    bounds,
                    focused: self.focus == Some(offset + i),
                })
                .collect();
            offset += icons.len();

            sections.push(SectionSnapshot {
                kind,
                label,
                grid,
                geometry,
                cells,
            });
        }

        // Labels span the full content width
        for section in &mut sections {
            if let Some(label) = &mut section.label {
                label.bounds.x2 = label.bounds.x1 + width;
            }
        }

        let x = ((self.viewport.width - width) / 2.0).max(0.0).floor();
        let top = ((self.viewport.height - y) / 2.0).max(0.0).floor();
        (ActorBox::new(x, top, width, y), sections)
    }

    fn sync_layout(&mut self) {
        let (content, _) = self.arrange();
        let page = f64::from(self.viewport.height);
        let upper = f64::from(content.height()).max(page);
        self.scroll.set_bounds(0.0, upper, page);
    }

    fn scroll_to_icon(&self, index: usize) -> Propagation {
        let Some((kind, local)) = self.locate(index) else {
            return Propagation::Proceed;
        };
        let (content, sections) = self.arrange();
        let Some(section) = sections.iter().find(|s| s.kind == kind) else {
            return Propagation::Proceed;
        };
        let Some(cell) = section.cells.get(local) else {
            return Propagation::Proceed;
        };
        self.scroll
            .scroll_to_child(&[cell.bounds, section.grid, content])
    }

    fn rebuild(&mut self) {
        // Read at rebuild time so a deferred rebuild sees the latest values
        let settings = self.settings.get();

        self.favorites_icons.clear();
        self.main_icons.clear();
        self.focus = None;

        self.sections = self.collection.load(&settings);
        let make_icons = |entries: &[Entry]| -> Vec<Rc<AppIcon>> {
            entries
                .iter()
                .map(|entry| Rc::new(AppIcon::new(entry.clone(), settings.icon_size)))
                .collect()
        };
        self.favorites_icons = make_icons(&self.sections.favorites);
        self.main_icons = make_icons(&self.sections.main);

        self.apply_grid_params();
        self.apply_label_margins();
        self.sync_layout();

        debug!(
            "Rebuilt display: {} favorites, {} apps",
            self.favorites_icons.len(),
            self.main_icons.len()
        );
    }

    fn schedule_rebuild(&mut self) {
        let this = self.this.clone();
        let source = self.laters.add_idle(move || {
            if let Some(state) = this.upgrade() {
                state.borrow_mut().run_scheduled_rebuild();
            }
        });
        self.redisplay = RedisplayPhase::Scheduled(source);
    }

    fn run_scheduled_rebuild(&mut self) {
        if self.destroyed {
            return;
        }
        self.redisplay = RedisplayPhase::Idle;
        self.rebuild();

        if self.visible {
            let now = self.clock.now();
            self.content_opacity.start(now, 1.0);
            self.ensure_fade_driver();
        } else {
            self.content_opacity.set(1.0);
        }
    }

    fn ensure_fade_driver(&mut self) {
        if self.fade_source.is_some() {
            return;
        }
        let this = self.this.clone();
        self.fade_source = Some(self.laters.add_frame(move || {
            let Some(state) = this.upgrade() else {
                return ControlFlow::Break(());
            };
            let mut state = state.borrow_mut();
            state.tick_fades()
        }));
    }

    fn tick_fades(&mut self) -> ControlFlow<()> {
        let now = self.clock.now();
        self.opacity.tick(now);
        let content_done = self.content_opacity.tick(now);
        trace!(
            "Fade frame: opacity {:.3}, content {:.3}",
            self.opacity.value, self.content_opacity.value
        );

        if content_done && self.redisplay == RedisplayPhase::FadingOut {
            self.schedule_rebuild();
        }

        if self.opacity.is_active() || self.content_opacity.is_active() {
            ControlFlow::Continue(())
        } else {
            self.fade_source = None;
            ControlFlow::Break(())
        }
    }

    fn navigation_target(&self, key: Key) -> Option<usize> {
        let total = self.icon_count();
        if total == 0 {
            return None;
        }
        let last = total - 1;

        let Some(current) = self.focus.filter(|&i| i < total) else {
            return match key {
                Key::Tab | Key::Down | Key::Right => Some(0),
                Key::BackTab | Key::Up | Key::Left => Some(last),
                _ => None,
            };
        };

        let target = match key {
            Key::Tab => {
                if current == last {
                    0
                } else {
                    current + 1
                }
            }
            Key::BackTab => {
                if current == 0 {
                    last
                } else {
                    current - 1
                }
            }
            Key::Left => current.saturating_sub(1),
            Key::Right => (current + 1).min(last),
            Key::Up => self.vertical_target(current, false),
            Key::Down => self.vertical_target(current, true),
            // Keep the focused icon in view
            _ => current,
        };
        Some(target)
    }

    /// Move one row within the icon's section, crossing into the
    /// neighbouring section at its edges.
    fn vertical_target(&self, index: usize, down: bool) -> usize {
        let favorites = self.favorites_icons.len();
        let Some((kind, local)) = self.locate(index) else {
            return index;
        };
        let len = self.icons(kind).len();
        let columns = self.grid(kind).columns();
        let offset = index - local;

        if down {
            if local + columns < len {
                return index + columns;
            }
            if local / columns + 1 < len.div_ceil(columns) {
                return offset + len - 1;
            }
            if kind == SectionKind::Favorites && !self.main_icons.is_empty() {
                return favorites + (local % columns).min(self.main_icons.len() - 1);
            }
            index
        } else {
            if local >= columns {
                return index - columns;
            }
            if kind == SectionKind::Main && favorites > 0 {
                let fav_columns = self.favorites_grid.columns();
                let last_row_start = (favorites - 1) / fav_columns * fav_columns;
                return (last_row_start + local).min(favorites - 1);
            }
            index
        }
    }
}

/// The composed vertical app grid. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct VerticalAppDisplay {
    state: Rc<RefCell<DisplayState>>,
}

impl std::fmt::Debug for VerticalAppDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("VerticalAppDisplay")
            .field("favorites", &state.favorites_icons.len())
            .field("apps", &state.main_icons.len())
            .field("focus", &state.focus)
            .field("redisplay", &state.redisplay)
            .field("destroyed", &state.destroyed)
            .finish_non_exhaustive()
    }
}

/// Non-owning handle, used by signal handlers so subscriptions never keep
/// the display alive.
#[derive(Clone)]
pub struct WeakDisplay(Weak<RefCell<DisplayState>>);

impl WeakDisplay {
    #[must_use]
    pub fn upgrade(&self) -> Option<VerticalAppDisplay> {
        self.0.upgrade().map(|state| VerticalAppDisplay { state })
    }
}

impl VerticalAppDisplay {
    /// Build the display and load the collection right away.
    #[must_use]
    pub fn new(
        settings: SettingsStore,
        collection: AppCollectionView,
        laters: Laters,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let scroll = KineticScrollController::new(laters.clone(), Rc::clone(&clock));
        let state = Rc::new_cyclic(|this| {
            RefCell::new(DisplayState {
                this: this.clone(),
                settings,
                collection,
                laters,
                clock,
                scroll,
                activated: Rc::new(Signal::new()),
                favorites_grid: GridLayoutEngine::default(),
                main_grid: GridLayoutEngine::default(),
                favorites_margins: LabelMargins::default(),
                main_margins: LabelMargins::default(),
                sections: Sections::default(),
                favorites_icons: Vec::new(),
                main_icons: Vec::new(),
                focus: None,
                viewport: Size::ZERO,
                visible: true,
                opacity: Fade::opaque(),
                content_opacity: Fade::opaque(),
                fade_source: None,
                redisplay: RedisplayPhase::Idle,
                destroyed: false,
            })
        });
        state.borrow_mut().rebuild();
        Self { state }
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakDisplay {
        WeakDisplay(Rc::downgrade(&self.state))
    }

    #[must_use]
    pub fn settings(&self) -> SettingsStore {
        self.state.borrow().settings.clone()
    }

    #[must_use]
    pub fn collection(&self) -> AppCollectionView {
        self.state.borrow().collection.clone()
    }

    #[must_use]
    pub fn scroll(&self) -> KineticScrollController {
        self.state.borrow().scroll.clone()
    }

    /// The sections currently rendered.
    #[must_use]
    pub fn sections(&self) -> Sections {
        self.state.borrow().sections.clone()
    }

    /// Rendered icons in display order.
    #[must_use]
    pub fn icons(&self) -> Vec<Rc<AppIcon>> {
        let state = self.state.borrow();
        state
            .favorites_icons
            .iter()
            .chain(state.main_icons.iter())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn geometry(&self, kind: SectionKind) -> LayoutGeometry {
        let state = self.state.borrow();
        state.grid(kind).geometry(state.icons(kind))
    }

    #[must_use]
    pub fn label_margins(&self, kind: SectionKind) -> LabelMargins {
        self.state.borrow().margins(kind)
    }

    #[must_use]
    pub fn focus(&self) -> Option<usize> {
        self.state.borrow().focus
    }

    #[must_use]
    pub fn focused_id(&self) -> Option<String> {
        let state = self.state.borrow();
        let index = state.focus?;
        state.icon_at(index).map(|icon| icon.id().to_string())
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        let state = self.state.borrow();
        state.opacity.value * state.content_opacity.value
    }

    /// True while a redisplay is fading out or waiting for its idle tick.
    #[must_use]
    pub fn redisplay_pending(&self) -> bool {
        self.state.borrow().redisplay != RedisplayPhase::Idle
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    /// Connect to icon activation. The handler receives the app id.
    pub fn connect_activated(&self, handler: impl Fn(&String) + 'static) -> Subscription {
        self.state.borrow().activated.connect(handler)
    }

    pub fn set_viewport(&self, viewport: Size) {
        let mut state = self.state.borrow_mut();
        if state.viewport == viewport {
            return;
        }
        state.viewport = viewport;
        state.sync_layout();
    }

    /// Schedule a full rebuild. Triggers while one is pending collapse into
    /// it, and the rebuild reads the settings current when it runs.
    pub fn redisplay(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        if state.redisplay != RedisplayPhase::Idle {
            debug!("Redisplay already pending, coalescing");
            return;
        }

        if state.visible {
            let now = state.clock.now();
            state.content_opacity.start(now, 0.0);
            state.redisplay = RedisplayPhase::FadingOut;
            state.ensure_fade_driver();
            debug!("Redisplay: fading out");
        } else {
            state.schedule_rebuild();
            debug!("Redisplay: scheduled");
        }
    }

    /// Recompute label margins from the icon spacing.
    pub fn update_label_margins(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.apply_label_margins();
        state.sync_layout();
    }

    /// Push the configured icon size into the existing icons.
    pub fn update_icon_size(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        let size = state.settings.icon_size();
        for icon in state.favorites_icons.iter().chain(state.main_icons.iter()) {
            icon.set_icon_size(size);
        }
        state.sync_layout();
        debug!("Icon size updated to {size}");
    }

    /// Push columns and spacing into the grid layouts.
    pub fn update_layout(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.apply_grid_params();
        state.sync_layout();
    }

    /// Keyboard handling: Escape propagates, scroll keys go to the scroll
    /// controller, Enter activates the focused icon and everything else
    /// moves or keeps the focus.
    pub fn handle_key(&self, key: Key) -> Propagation {
        if key == Key::Escape || self.is_destroyed() {
            return Propagation::Proceed;
        }

        if self.scroll().handle_key(key).is_stop() {
            return Propagation::Stop;
        }

        if key == Key::Enter {
            return self.activate_focused();
        }

        let mut state = self.state.borrow_mut();
        let Some(target) = state.navigation_target(key) else {
            return Propagation::Proceed;
        };
        state.focus = Some(target);
        state.scroll_to_icon(target);
        Propagation::Stop
    }

    /// Launch the focused icon: record the launch and notify listeners.
    pub fn activate_focused(&self) -> Propagation {
        let (id, usage, activated) = {
            let state = self.state.borrow();
            let Some(icon) = state.focus.and_then(|i| state.icon_at(i)) else {
                return Propagation::Proceed;
            };
            (
                icon.id().to_string(),
                Rc::clone(state.collection.usage()),
                Rc::clone(&state.activated),
            )
        };

        usage.record_launch(&id);
        debug!("Activated {id}");
        activated.emit(&id);
        Propagation::Stop
    }

    /// Pointer scroll. Whether wheel steps animate is read per event.
    pub fn handle_scroll(&self, event: &ScrollEvent) -> Propagation {
        let (scroll, animate) = {
            let state = self.state.borrow();
            (state.scroll.clone(), state.settings.animate_scroll())
        };
        scroll.handle_scroll_event(event, animate)
    }

    /// Focus the icon at `index` (display order) and scroll it into view.
    pub fn focus_icon(&self, index: usize) -> Propagation {
        let mut state = self.state.borrow_mut();
        if index >= state.icon_count() {
            return Propagation::Proceed;
        }
        state.focus = Some(index);
        state.scroll_to_icon(index)
    }

    /// Apply the host's overview state.
    pub fn update_visibility(&self, transition: StateTransition, search_active: bool) {
        self.state.borrow_mut().visible = app_display_visible(transition, search_active);
    }

    /// Crossfade out while search shows results, back in when it ends.
    pub fn set_search_active(&self, active: bool) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        let now = state.clock.now();
        state.opacity.start(now, search_fade_opacity(active));
        state.ensure_fade_driver();
    }

    /// The overview was hidden: jump back to the top.
    pub fn overview_hidden(&self) {
        self.scroll().reset();
    }

    #[must_use]
    pub fn snapshot(&self) -> DisplaySnapshot {
        let state = self.state.borrow();
        let (content, sections) = state.arrange();
        DisplaySnapshot {
            visible: state.visible,
            opacity: state.opacity.value * state.content_opacity.value,
            scroll: state.scroll.value(),
            viewport: state.viewport,
            content,
            sections,
        }
    }

    /// Cancel the pending redisplay and all animations and release the
    /// icons. Safe to call more than once.
    pub fn destroy(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.destroyed = true;

        if let RedisplayPhase::Scheduled(source) = state.redisplay {
            state.laters.remove(source);
        }
        state.redisplay = RedisplayPhase::Idle;
        if let Some(source) = state.fade_source.take() {
            state.laters.remove(source);
        }
        state.scroll.destroy();

        state.favorites_icons.clear();
        state.main_icons.clear();
        state.sections = Sections::default();
        state.focus = None;
        debug!("Display destroyed");
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn icon_natural_size_tracks_icon_size() {
        let entry = Entry {
            app: vgrid_types::AppInfo::new("a", "A"),
            favorite: false,
        };
        let icon = AppIcon::new(entry, 64);
        assert_eq!(icon.natural_size(), Size::new(80.0, 96.0));

        icon.set_icon_size(32);
        assert_eq!(icon.natural_size(), Size::new(48.0, 64.0));
    }

    #[test]
    fn label_margins_follow_spacing() {
        assert_eq!(
            LabelMargins::for_section(SectionKind::Favorites, 12.0),
            LabelMargins {
                top: 0.0,
                bottom: 12.0
            }
        );
        assert_eq!(
            LabelMargins::for_section(SectionKind::Main, 12.0),
            LabelMargins {
                top: 24.0,
                bottom: 12.0
            }
        );
    }

    #[test]
    fn fade_reaches_target() {
        let mut fade = Fade::opaque();
        fade.start(Duration::ZERO, 0.0);
        assert!(!fade.tick(Duration::from_millis(100)));
        assert!(fade.value > 0.0 && fade.value < 1.0);
        assert!(fade.tick(FADE_DURATION));
        assert_eq!(fade.value, 0.0);
        assert!(!fade.is_active());
    }
}
