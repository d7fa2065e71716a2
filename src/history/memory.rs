//! An in-memory platform binding for hosts without a native history stack.

use super::adapter::{ConfirmCallback, HistoryAdapter, NativeListenerCount, PopSink};
use crate::core::{create_location, Action, AdapterError, HistoryError, Location, LocationInput};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

type Confirm = Rc<dyn Fn(&str, ConfirmCallback)>;

struct MemoryStack {
    entries: Vec<Location>,
    index: usize,
}

/// A [`HistoryAdapter`] that keeps the whole stack in a `Vec`.
///
/// `go` moves within the stack and, while the core is listening, reports
/// the arrival back to it as a POP, the same way a browser fires
/// `popstate` after the user presses back.
pub struct MemoryAdapter {
    stack: RefCell<MemoryStack>,
    confirm: Confirm,
    native: NativeListenerCount,
    sink: Rc<RefCell<Option<PopSink>>>,
    go_calls: RefCell<Vec<isize>>,
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAdapter {
    /// Start with a single entry at `/` whose key is unset.
    pub fn new() -> Self {
        let initial = Location {
            key: None,
            ..Location::default()
        };
        Self::with_initial_location(initial)
    }

    pub fn with_initial_path(path: impl Into<LocationInput>) -> Result<Self, HistoryError> {
        let initial = create_location(path, Action::Pop, None)?;
        Ok(Self::with_initial_location(initial))
    }

    fn with_initial_location(initial: Location) -> Self {
        Self {
            stack: RefCell::new(MemoryStack {
                entries: vec![initial],
                index: 0,
            }),
            confirm: Rc::new(|message: &str, callback: ConfirmCallback| {
                debug!(prompt = message, "accepting confirmation prompt");
                callback(true)
            }),
            native: NativeListenerCount::new(),
            sink: Rc::new(RefCell::new(None)),
            go_calls: RefCell::new(Vec::new()),
        }
    }

    /// Replace the default always-accept confirmation.
    ///
    /// The callback may be stored and answered later.
    pub fn with_user_confirmation<F>(mut self, confirm: F) -> Self
    where
        F: Fn(&str, ConfirmCallback) + 'static,
    {
        self.confirm = Rc::new(confirm);
        self
    }

    pub fn entries(&self) -> Vec<Location> {
        self.stack.borrow().entries.clone()
    }

    pub fn index(&self) -> usize {
        self.stack.borrow().index
    }

    /// Every delta passed to `go`, in call order.
    pub fn go_calls(&self) -> Vec<isize> {
        self.go_calls.borrow().clone()
    }

    pub fn native_listeners(&self) -> usize {
        self.native.count()
    }

    pub fn can_go(&self, delta: isize) -> bool {
        let stack = self.stack.borrow();
        let target = stack.index as isize + delta;
        target >= 0 && (target as usize) < stack.entries.len()
    }
}

impl HistoryAdapter for MemoryAdapter {
    fn get_user_confirmation(&self, message: &str, callback: ConfirmCallback) {
        (self.confirm)(message, callback)
    }

    fn current_location(&self) -> Location {
        let stack = self.stack.borrow();
        stack.entries[stack.index].clone()
    }

    fn push_location(&self, location: &Location) -> Result<(), AdapterError> {
        let mut stack = self.stack.borrow_mut();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(location.clone());
        stack.index = keep;
        Ok(())
    }

    fn replace_location(&self, location: &Location) -> Result<(), AdapterError> {
        let mut stack = self.stack.borrow_mut();
        let index = stack.index;
        stack.entries[index] = location.clone();
        Ok(())
    }

    fn go(&self, delta: isize) -> Result<(), AdapterError> {
        self.go_calls.borrow_mut().push(delta);

        let arrived = {
            let mut stack = self.stack.borrow_mut();
            let target = stack.index as isize + delta;
            if target < 0 || target as usize >= stack.entries.len() {
                return Err(AdapterError::OutOfRange {
                    delta,
                    index: stack.index,
                    len: stack.entries.len(),
                });
            }
            if delta == 0 {
                return Ok(());
            }
            stack.index = target as usize;
            Location {
                action: Action::Pop,
                ..stack.entries[stack.index].clone()
            }
        };

        let sink = self.sink.borrow().clone();
        if let Some(sink) = sink {
            if let Some(Err(err)) = sink.transition_to(arrived) {
                warn!(error = %err, "core rejected native pop");
            }
        }
        Ok(())
    }

    fn attach_native(&self, sink: PopSink) {
        let slot = Rc::clone(&self.sink);
        self.native.acquire(move || {
            *slot.borrow_mut() = Some(sink);
            move || {
                slot.borrow_mut().take();
            }
        });
    }

    fn detach_native(&self) {
        self.native.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::create_key;

    fn pushed(path: &str) -> Location {
        create_location(path, Action::Push, Some(create_key())).unwrap()
    }

    #[test]
    fn starts_at_root_without_a_key() {
        let adapter = MemoryAdapter::new();
        let current = adapter.current_location();
        assert_eq!(current.pathname, "/");
        assert_eq!(current.key, None);
        assert_eq!(current.action, Action::Pop);
    }

    #[test]
    fn initial_path_is_parsed() {
        let adapter = MemoryAdapter::with_initial_path("/start?x=1").unwrap();
        let current = adapter.current_location();
        assert_eq!(current.pathname, "/start");
        assert_eq!(current.search, "?x=1");
        assert!(MemoryAdapter::with_initial_path("/%E0%A4%A").is_err());
    }

    #[test]
    fn push_truncates_forward_entries() {
        let adapter = MemoryAdapter::new();
        adapter.push_location(&pushed("/a")).unwrap();
        adapter.push_location(&pushed("/b")).unwrap();
        adapter.go(-1).unwrap();
        adapter.push_location(&pushed("/c")).unwrap();

        let paths: Vec<_> = adapter
            .entries()
            .into_iter()
            .map(|l| l.pathname)
            .collect();
        assert_eq!(paths, vec!["/", "/a", "/c"]);
        assert_eq!(adapter.index(), 2);
    }

    #[test]
    fn replace_overwrites_current_entry() {
        let adapter = MemoryAdapter::new();
        adapter.replace_location(&pushed("/x")).unwrap();
        assert_eq!(adapter.entries().len(), 1);
        assert_eq!(adapter.current_location().pathname, "/x");
    }

    #[test]
    fn go_out_of_range_fails() {
        let adapter = MemoryAdapter::new();
        let err = adapter.go(-1).unwrap_err();
        assert_eq!(
            err,
            AdapterError::OutOfRange {
                delta: -1,
                index: 0,
                len: 1
            }
        );
        assert!(!adapter.can_go(1));
        assert_eq!(adapter.go_calls(), vec![-1]);
    }

    #[test]
    fn default_confirmation_accepts() {
        let adapter = MemoryAdapter::new();
        let answer = Rc::new(RefCell::new(None));
        let seen = Rc::clone(&answer);
        adapter.get_user_confirmation(
            "sure?",
            Box::new(move |ok: bool| *seen.borrow_mut() = Some(ok)),
        );
        assert_eq!(*answer.borrow(), Some(true));
    }
}
