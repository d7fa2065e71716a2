//! Contract between the history core and a platform binding.

use super::transition::Transition;
use crate::core::{AdapterError, HistoryError, Location};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Receives the user's answer to a confirmation prompt.
pub type ConfirmCallback = Box<dyn FnOnce(bool)>;

/// The platform binding the core navigates through.
///
/// Implementations talk to whatever actually owns the stack (a browser's
/// History API, a full-reload fallback, an in-memory list). Native
/// back/forward movement is reported to the core through the [`PopSink`]
/// handed to [`attach_native`](Self::attach_native).
pub trait HistoryAdapter {
    /// Ask the user to confirm a navigation. The callback may run later.
    fn get_user_confirmation(&self, message: &str, callback: ConfirmCallback);

    /// The location the platform is currently showing.
    fn current_location(&self) -> Location;

    fn push_location(&self, location: &Location) -> Result<(), AdapterError>;

    fn replace_location(&self, location: &Location) -> Result<(), AdapterError>;

    fn go(&self, delta: isize) -> Result<(), AdapterError>;

    /// Turn a path into an href. Hash-based bindings prepend `#` here.
    fn create_href(&self, path: &str) -> String {
        path.to_string()
    }

    /// Called once per listener or hook registered on the core.
    fn attach_native(&self, _sink: PopSink) {}

    /// Called once per listener or hook removed from the core.
    fn detach_native(&self) {}
}

pub(crate) trait PopTarget {
    fn accept_pop(self: Rc<Self>, location: Location) -> Result<Transition, HistoryError>;
}

/// Channel a binding uses to report that the native stack already moved.
#[derive(Clone)]
pub struct PopSink {
    target: Weak<dyn PopTarget>,
}

impl PopSink {
    pub(crate) fn new(target: Weak<dyn PopTarget>) -> Self {
        Self { target }
    }

    /// Run the arrival through the core's hook pipeline as a POP.
    ///
    /// Returns `None` once the history it belonged to has been dropped.
    pub fn transition_to(&self, location: Location) -> Option<Result<Transition, HistoryError>> {
        self.target
            .upgrade()
            .map(|target| target.accept_pop(location))
    }

    pub fn is_connected(&self) -> bool {
        self.target.strong_count() > 0
    }
}

impl std::fmt::Debug for PopSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopSink")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Reference count for a native event subscription, owned by one adapter.
///
/// The first `acquire` attaches the real listener and keeps its detach
/// handle; the matching last `release` runs it.
#[derive(Default)]
pub struct NativeListenerCount {
    count: Cell<usize>,
    detach: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl NativeListenerCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire<F, D>(&self, attach: F)
    where
        F: FnOnce() -> D,
        D: FnOnce() + 'static,
    {
        let count = self.count.get() + 1;
        self.count.set(count);
        if count == 1 {
            let detach = attach();
            *self.detach.borrow_mut() = Some(Box::new(detach));
        }
    }

    pub fn release(&self) {
        let count = self.count.get();
        if count == 0 {
            return;
        }
        self.count.set(count - 1);
        if count == 1 {
            let detach = self.detach.borrow_mut().take();
            if let Some(detach) = detach {
                detach();
            }
        }
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    pub fn is_attached(&self) -> bool {
        self.detach.borrow().is_some()
    }
}
