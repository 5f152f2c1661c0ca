//! Change notification signals with explicit subscription handles.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;
type HandlerList<T> = RefCell<Vec<(u64, Handler<T>)>>;

/// A single-threaded multicast signal.
pub struct Signal<T> {
    handlers: Rc<HandlerList<T>>,
    next_id: Cell<u64>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            handlers: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }
}

impl<T: 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a handler. It stays connected until the returned
    /// [`Subscription`] is disconnected.
    #[must_use = "dropping the subscription handle leaves no way to disconnect"]
    pub fn connect(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));

        let weak: Weak<HandlerList<T>> = Rc::downgrade(&self.handlers);
        Subscription {
            disconnect: Some(Box::new(move || {
                if let Some(handlers) = weak.upgrade() {
                    handlers.borrow_mut().retain(|(h, _)| *h != id);
                }
            })),
        }
    }

    /// Invoke every connected handler. Handlers may connect or disconnect
    /// while the signal is being emitted.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(u64, Handler<T>)> = self
            .handlers
            .borrow()
            .iter()
            .map(|(id, handler)| (*id, Rc::clone(handler)))
            .collect();

        for (id, handler) in snapshot {
            let still_connected = self.handlers.borrow().iter().any(|(h, _)| *h == id);
            if still_connected {
                handler(value);
            }
        }
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

/// Handle for one connected handler.
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Disconnect the handler. Safe to call more than once.
    pub fn disconnect(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.disconnect.is_some()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Collects subscriptions and releases them together.
#[derive(Debug, Default)]
pub struct Disposer {
    subscriptions: Vec<Subscription>,
}

impl Disposer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Disconnect everything. Idempotent.
    pub fn dispose(&mut self) {
        for mut subscription in self.subscriptions.drain(..) {
            subscription.disconnect();
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}
