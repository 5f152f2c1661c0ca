//! Deferred callbacks on the single UI thread.
//!
//! The host event loop calls [`Laters::run_idle`] once current work settles
//! and [`Laters::run_frame`] after each paint. Components schedule work here
//! instead of running it inline so rapid triggers can be batched and
//! animations advance once per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::rc::Rc;
use tracing::trace;

/// Handle for a scheduled callback, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

type IdleFn = Box<dyn FnOnce()>;
type FrameFn = Rc<RefCell<dyn FnMut() -> ControlFlow<()>>>;

#[derive(Default)]
struct Sources {
    next_id: u64,
    idle: VecDeque<(SourceId, IdleFn)>,
    frame: Vec<(SourceId, FrameFn)>,
}

impl Sources {
    fn allocate(&mut self) -> SourceId {
        self.next_id += 1;
        SourceId(self.next_id)
    }
}

/// Shared handle to the idle and frame queues. Clones share the same queues.
#[derive(Clone, Default)]
pub struct Laters {
    sources: Rc<RefCell<Sources>>,
}

impl std::fmt::Debug for Laters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources = self.sources.borrow();
        f.debug_struct("Laters")
            .field("idle", &sources.idle.len())
            .field("frame", &sources.frame.len())
            .finish()
    }
}

impl Laters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once, the next time the loop goes idle.
    pub fn add_idle(&self, callback: impl FnOnce() + 'static) -> SourceId {
        let mut sources = self.sources.borrow_mut();
        let id = sources.allocate();
        sources.idle.push_back((id, Box::new(callback)));
        id
    }

    /// Run `callback` after every frame until it returns `Break` or is removed.
    pub fn add_frame(&self, callback: impl FnMut() -> ControlFlow<()> + 'static) -> SourceId {
        let mut sources = self.sources.borrow_mut();
        let id = sources.allocate();
        sources.frame.push((id, Rc::new(RefCell::new(callback))));
        id
    }

    /// Cancel a pending source. Returns false if it already ran or was removed.
    pub fn remove(&self, id: SourceId) -> bool {
        let mut sources = self.sources.borrow_mut();
        let before = sources.idle.len() + sources.frame.len();
        sources.idle.retain(|(source, _)| *source != id);
        sources.frame.retain(|(source, _)| *source != id);
        before != sources.idle.len() + sources.frame.len()
    }

    #[must_use]
    pub fn is_pending(&self, id: SourceId) -> bool {
        let sources = self.sources.borrow();
        sources.idle.iter().any(|(source, _)| *source == id)
            || sources.frame.iter().any(|(source, _)| *source == id)
    }

    #[must_use]
    pub fn has_idle(&self) -> bool {
        !self.sources.borrow().idle.is_empty()
    }

    #[must_use]
    pub fn has_frame(&self) -> bool {
        !self.sources.borrow().frame.is_empty()
    }

    /// Run every idle callback queued before this call. Callbacks queued while
    /// running wait for the next idle pass. Returns how many ran.
    pub fn run_idle(&self) -> usize {
        let limit = SourceId(self.sources.borrow().next_id);
        let mut ran = 0;

        loop {
            let next = {
                let mut sources = self.sources.borrow_mut();
                match sources.idle.front() {
                    Some((id, _)) if *id <= limit => sources.idle.pop_front(),
                    _ => None,
                }
            };

            let Some((id, callback)) = next else {
                break;
            };

            trace!("Running idle source {id:?}");
            callback();
            ran += 1;
        }

        ran
    }

    /// Run every frame callback once. Callbacks returning `Break` are detached.
    pub fn run_frame(&self) -> usize {
        let snapshot: Vec<(SourceId, FrameFn)> = self
            .sources
            .borrow()
            .frame
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();

        let mut ran = 0;
        for (id, callback) in snapshot {
            // Removed by an earlier callback in this pass
            if !self.sources.borrow().frame.iter().any(|(s, _)| *s == id) {
                continue;
            }

            let flow = {
                let mut callback = callback.borrow_mut();
                (*callback)()
            };
            ran += 1;

            if flow.is_break() {
                self.remove(id);
            }
        }

        ran
    }
}
