//! The navigation surface shared by the core and its decorators.

use super::hook::{Continuation, HookResult};
use super::listener::Unlisten;
use super::transition::Transition;
use crate::core::{create_key, Action, HistoryError, Location, LocationInput};

/// Everything application code can do with a history.
///
/// Implemented by [`History`](super::History) and by decorators such as
/// [`BasenameHistory`](crate::basename::BasenameHistory), so callers can be
/// generic over whether their routes are scoped under a prefix.
pub trait Navigator {
    /// The current location. No hooks run.
    fn current_location(&self) -> Location;

    /// Register a hook that may veto or ask for confirmation before any
    /// navigation commits. Hooks run in registration order.
    fn listen_before<F>(&self, hook: F) -> Unlisten
    where
        F: Fn(&Location, Continuation) -> HookResult + 'static;

    /// Register a listener. It is called immediately with the current
    /// location, then after every commit, in registration order.
    fn listen<F>(&self, listener: F) -> Unlisten
    where
        F: Fn(&Location) + 'static;

    /// Add a new entry.
    fn push(&self, input: impl Into<LocationInput>) -> Result<Transition, HistoryError>;

    /// Overwrite the current entry.
    fn replace(&self, input: impl Into<LocationInput>) -> Result<Transition, HistoryError>;

    /// Move the native stack. Bypasses hooks: the platform moves first and
    /// the arrival is reported back through `transition_to`.
    fn go(&self, delta: isize) -> Result<(), HistoryError>;

    fn go_back(&self) -> Result<(), HistoryError> {
        self.go(-1)
    }

    fn go_forward(&self) -> Result<(), HistoryError> {
        self.go(1)
    }

    /// Accept a location the native stack has already moved to.
    fn transition_to(&self, location: Location) -> Result<Transition, HistoryError>;

    fn create_location(
        &self,
        input: impl Into<LocationInput>,
        action: Action,
    ) -> Result<Location, HistoryError>;

    fn create_path(&self, input: impl Into<LocationInput>) -> String;

    fn create_href(&self, input: impl Into<LocationInput>) -> String;

    fn create_key(&self) -> String {
        create_key()
    }
}
