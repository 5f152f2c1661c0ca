//! Kinetic scrolling for the vertical app grid.
//!
//! The controller owns the scroll target and the rendered adjustment value.
//! Animated scrolls run as a per-frame source on [`Laters`] and ease with a
//! cubic ease-out from whatever value is currently rendered, so re-targeting
//! mid-flight never jumps. Discrete wheel notches are debounced against
//! recent trackpad input to avoid double scrolling on compatibility events.

use crate::animation::{Easing, Transition};
use crate::clock::Clock;
use crate::laters::{Laters, SourceId};
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, trace};
use vgrid_types::{ActorBox, Key, Propagation, ScrollDirection, ScrollEvent};

/// Duration of keyboard and programmatic scroll animations.
pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(200);

/// Discrete wheel events up to this long after trackpad input are dropped.
pub const TRACKPAD_DEBOUNCE: Duration = Duration::from_secs(1);

/// Fraction of the page moved by Page Up / Page Down.
const PAGE_STEP_FACTOR: f64 = 0.8;

/// Wheel animations last this many milliseconds per 100px of distance.
const WHEEL_MS_PER_100PX: f64 = 200.0;

/// Scroll bounds and the currently rendered value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Adjustment {
    pub lower: f64,
    pub upper: f64,
    pub page_size: f64,
    pub value: f64,
}

impl Adjustment {
    /// Largest reachable value, `upper - page_size`, never below `lower`.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        (self.upper - self.page_size).max(self.lower)
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.lower;
        }
        value.clamp(self.lower, self.max_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Animating,
}

#[derive(Debug, Default)]
struct ScrollState {
    adjustment: Adjustment,
    /// Settled target of the latest scroll request
    target: f64,
    animation: Option<Transition>,
    frame_source: Option<SourceId>,
    trackpad_time: Option<Duration>,
    destroyed: bool,
}

/// Cheap to clone; clones control the same scroll state.
#[derive(Clone)]
pub struct KineticScrollController {
    state: Rc<RefCell<ScrollState>>,
    laters: Laters,
    clock: Rc<dyn Clock>,
}

impl std::fmt::Debug for KineticScrollController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KineticScrollController")
            .field("state", &self.state.borrow())
            .finish_non_exhaustive()
    }
}

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

impl KineticScrollController {
    #[must_use]
    pub fn new(laters: Laters, clock: Rc<dyn Clock>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ScrollState::default())),
            laters,
            clock,
        }
    }

    #[must_use]
    pub fn adjustment(&self) -> Adjustment {
        self.state.borrow().adjustment
    }

    /// Currently rendered scroll offset.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.state.borrow().adjustment.value
    }

    /// Offset the controller is heading to (or resting at).
    #[must_use]
    pub fn target(&self) -> f64 {
        self.state.borrow().target
    }

    #[must_use]
    pub fn phase(&self) -> ScrollPhase {
        if self.state.borrow().frame_source.is_some() {
            ScrollPhase::Animating
        } else {
            ScrollPhase::Idle
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.phase() == ScrollPhase::Animating
    }

    /// Update content and viewport extents. The target and the rendered value
    /// are pulled back inside the new bounds.
    pub fn set_bounds(&self, lower: f64, upper: f64, page_size: f64) {
        let mut state = self.state.borrow_mut();
        state.adjustment.lower = lower;
        state.adjustment.upper = upper.max(lower);
        state.adjustment.page_size = page_size.max(0.0);

        let adjustment = state.adjustment;
        state.target = adjustment.clamp(state.target);
        if state.animation.is_none() {
            state.adjustment.value = adjustment.clamp(adjustment.value);
        }
    }

    /// Animated scroll to `target` with the default duration.
    pub fn scroll_to(&self, target: f64) -> Propagation {
        self.scroll_to_with(target, true, DEFAULT_SCROLL_DURATION)
    }

    /// Scroll to `target`, clamped to `[lower, upper - page_size]`.
    ///
    /// A request whose clamped target equals the current target is consumed
    /// without touching any state, so held-down keys never restart the
    /// animation.
    pub fn scroll_to_with(&self, target: f64, animate: bool, duration: Duration) -> Propagation {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();

        if state.destroyed {
            return Propagation::Stop;
        }

        let clamped = state.adjustment.clamp(target);
        if nearly_equal(state.target, clamped) {
            return Propagation::Stop;
        }

        state.target = clamped;

        if animate {
            let from = state.adjustment.value;
            state.animation = Some(Transition::new(
                now,
                from,
                clamped,
                duration,
                Easing::EaseOutCubic,
            ));

            if state.frame_source.is_none() {
                state.frame_source = Some(self.attach_frame_driver());
            }
            trace!("Scroll animation {from} -> {clamped} over {duration:?}");
        } else {
            if let Some(source) = state.frame_source.take() {
                self.laters.remove(source);
            }
            state.animation = None;
            state.adjustment.value = clamped;
        }

        Propagation::Stop
    }

    fn attach_frame_driver(&self) -> SourceId {
        let weak: Weak<RefCell<ScrollState>> = Rc::downgrade(&self.state);
        let clock = Rc::clone(&self.clock);

        self.laters.add_frame(move || {
            let Some(state) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            let mut state = state.borrow_mut();

            let Some(animation) = state.animation else {
                state.frame_source = None;
                return ControlFlow::Break(());
            };

            let (value, done) = animation.sample(clock.now());
            if done {
                state.adjustment.value = state.target;
                state.animation = None;
                state.frame_source = None;
                ControlFlow::Break(())
            } else {
                state.adjustment.value = value;
                ControlFlow::Continue(())
            }
        })
    }

    /// Center a child in the viewport. `chain` holds the child's allocation
    /// box followed by each ancestor's box, up to but excluding the scroll
    /// container.
    pub fn scroll_to_child(&self, chain: &[ActorBox]) -> Propagation {
        let Some(child) = chain.first() else {
            return Propagation::Proceed;
        };

        let child_y: f64 = chain.iter().map(|b| f64::from(b.y1)).sum();
        let child_center = child_y + f64::from(child.height()) / 2.0;
        let page_size = self.state.borrow().adjustment.page_size;

        self.scroll_to(child_center - page_size / 2.0)
    }

    /// Jump back to the top without animation.
    pub fn reset(&self) {
        let lower = self.state.borrow().adjustment.lower;
        self.scroll_to_with(lower, false, Duration::ZERO);
    }

    /// Handle a pointer scroll event.
    ///
    /// With `animate` off, wheel steps apply immediately and no trackpad
    /// debounce happens.
    pub fn handle_scroll_event(&self, event: &ScrollEvent, animate: bool) -> Propagation {
        if event.emulated {
            return Propagation::Stop;
        }

        let now = self.clock.now();
        let (adjustment, target) = {
            let state = self.state.borrow();
            (state.adjustment, state.target)
        };

        let step = adjustment.page_size.powf(2.0 / 3.0);

        let (delta, animate) = if event.is_smooth() {
            if animate {
                self.state.borrow_mut().trackpad_time = Some(now);
            }
            (event.delta.1, false)
        } else {
            let debounced = animate
                && self
                    .state
                    .borrow()
                    .trackpad_time
                    .is_some_and(|t| now.saturating_sub(t) <= TRACKPAD_DEBOUNCE);

            if debounced {
                debug!("Dropping discrete scroll event after trackpad input");
                (0.0, false)
            } else {
                let delta = match event.direction {
                    ScrollDirection::Up => -1.0,
                    ScrollDirection::Down => 1.0,
                    _ => 0.0,
                };
                (delta, animate)
            }
        };

        let clamped = adjustment.clamp(target + delta * step);
        let distance = (target - clamped).abs();
        if distance < f64::EPSILON {
            return Propagation::Stop;
        }

        let duration = Duration::from_secs_f64(distance / 100.0 * WHEEL_MS_PER_100PX / 1000.0);
        self.scroll_to_with(clamped, animate, duration)
    }

    /// Home, End, Page Up and Page Down. Other keys propagate.
    pub fn handle_key(&self, key: Key) -> Propagation {
        let (adjustment, target) = {
            let state = self.state.borrow();
            (state.adjustment, state.target)
        };
        let page = adjustment.page_size;

        let destination = match key {
            Key::Home => adjustment.lower,
            Key::End => adjustment.upper - page,
            Key::PageUp => target - page * PAGE_STEP_FACTOR,
            Key::PageDown => target + page * PAGE_STEP_FACTOR,
            _ => return Propagation::Proceed,
        };

        self.scroll_to(destination)
    }

    /// Detach the frame driver and refuse further scrolling. Idempotent.
    pub fn destroy(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(source) = state.frame_source.take() {
            self.laters.remove(source);
        }
        state.animation = None;
        state.destroyed = true;
    }
}
