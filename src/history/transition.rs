//! Handle for a single navigation attempt.

use crate::core::{AdapterError, Location};
use std::cell::RefCell;
use std::rc::Rc;

/// Where a transition attempt ended up.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionStatus {
    /// Waiting on a hook continuation or a user confirmation
    Pending,
    /// Became the current location and listeners were notified
    Committed,
    /// Vetoed by a hook or declined by the user
    Cancelled,
    /// A newer attempt started before this one finished
    Superseded,
    /// The platform binding failed to apply the navigation
    Failed(AdapterError),
}

impl TransitionStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

struct TransitionInner {
    generation: u64,
    location: Location,
    status: RefCell<TransitionStatus>,
}

/// Shared view of one attempt, returned by `push`, `replace` and
/// `transition_to`.
///
/// When every hook answers synchronously the attempt has already settled
/// by the time the handle is returned.
#[derive(Clone)]
pub struct Transition {
    inner: Rc<TransitionInner>,
}

impl Transition {
    pub(crate) fn new(generation: u64, location: Location) -> Self {
        Self {
            inner: Rc::new(TransitionInner {
                generation,
                location,
                status: RefCell::new(TransitionStatus::Pending),
            }),
        }
    }

    pub(crate) fn settled(generation: u64, location: Location, status: TransitionStatus) -> Self {
        let transition = Self::new(generation, location);
        transition.settle(status);
        transition
    }

    /// Record the final status. The first settlement wins.
    pub(crate) fn settle(&self, status: TransitionStatus) {
        let mut current = self.inner.status.borrow_mut();
        if !current.is_settled() {
            *current = status;
        }
    }

    /// Generation token assigned when the attempt started.
    pub fn generation(&self) -> u64 {
        self.inner.generation
    }

    /// The candidate location this attempt is trying to commit.
    pub fn location(&self) -> &Location {
        &self.inner.location
    }

    pub fn status(&self) -> TransitionStatus {
        self.inner.status.borrow().clone()
    }

    pub fn is_committed(&self) -> bool {
        matches!(*self.inner.status.borrow(), TransitionStatus::Committed)
    }

    pub fn is_settled(&self) -> bool {
        self.inner.status.borrow().is_settled()
    }
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("generation", &self.inner.generation)
            .field("location", &self.inner.location)
            .field("status", &*self.inner.status.borrow())
            .finish()
    }
}
