//! Before-hook outcomes and the continuation handed to each hook.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// What a before-hook thinks of a candidate location.
///
/// Hooks that answer immediately return `Allow`, `Block` or `Prompt`.
/// Hooks that need to wait return `Defer` and later resolve the
/// [`Continuation`] they were given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookResult {
    /// No objection; move on to the next hook.
    Allow,
    /// Veto the navigation.
    Block,
    /// Ask the user, showing this message, before continuing.
    Prompt(String),
    /// The hook will answer through its continuation.
    Defer,
}

impl From<bool> for HookResult {
    fn from(allow: bool) -> Self {
        if allow {
            Self::Allow
        } else {
            Self::Block
        }
    }
}

impl From<()> for HookResult {
    fn from(_: ()) -> Self {
        Self::Allow
    }
}

impl From<&str> for HookResult {
    fn from(message: &str) -> Self {
        Self::Prompt(message.to_string())
    }
}

impl From<String> for HookResult {
    fn from(message: String) -> Self {
        Self::Prompt(message)
    }
}

type Resume = Box<dyn FnOnce(HookResult)>;

/// Completion handle for one hook invocation within one transition attempt.
///
/// Only the first resolution counts; later calls are ignored. Resolving
/// with [`HookResult::Defer`] is read as [`HookResult::Allow`].
#[derive(Clone)]
pub struct Continuation {
    slot: Rc<RefCell<Option<Resume>>>,
}

impl Continuation {
    pub(crate) fn new<F>(resume: F) -> Self
    where
        F: FnOnce(HookResult) + 'static,
    {
        Self {
            slot: Rc::new(RefCell::new(Some(Box::new(resume)))),
        }
    }

    pub fn resolve(&self, result: impl Into<HookResult>) {
        let resume = self.slot.borrow_mut().take();
        if let Some(resume) = resume {
            resume(result.into());
        }
    }

    pub fn allow(&self) {
        self.resolve(HookResult::Allow);
    }

    pub fn block(&self) {
        self.resolve(HookResult::Block);
    }

    pub fn prompt(&self, message: impl Into<String>) {
        self.resolve(HookResult::Prompt(message.into()));
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().is_none()
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn conversions_follow_hook_conventions() {
        assert_eq!(HookResult::from(true), HookResult::Allow);
        assert_eq!(HookResult::from(false), HookResult::Block);
        assert_eq!(HookResult::from(()), HookResult::Allow);
        assert_eq!(
            HookResult::from("Are you sure?"),
            HookResult::Prompt("Are you sure?".to_string())
        );
    }

    #[test]
    fn continuation_resolves_once() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::new(RefCell::new(None));
        let continuation = {
            let calls = Rc::clone(&calls);
            let seen = Rc::clone(&seen);
            Continuation::new(move |result| {
                calls.set(calls.get() + 1);
                *seen.borrow_mut() = Some(result);
            })
        };

        assert!(!continuation.is_resolved());
        continuation.block();
        continuation.allow();
        continuation.clone().prompt("again");

        assert!(continuation.is_resolved());
        assert_eq!(calls.get(), 1);
        assert_eq!(*seen.borrow(), Some(HookResult::Block));
    }
}
