//! The transition pipeline: the state machine every navigation runs through.

use super::adapter::{ConfirmCallback, HistoryAdapter, PopSink, PopTarget};
use super::hook::{Continuation, HookResult};
use super::listener::{Registry, Unlisten};
use super::navigator::Navigator;
use super::transition::{Transition, TransitionStatus};
use crate::core::{
    create_key, create_location, create_path, Action, AdapterError, HistoryError, Location,
    LocationInput,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace, warn};

type HookFn = Rc<dyn Fn(&Location, Continuation) -> HookResult>;
type ListenerFn = Rc<dyn Fn(&Location)>;

struct CoreState {
    current: Option<Location>,
    hooks: Registry<HookFn>,
    listeners: Registry<ListenerFn>,
    generation: u64,
    pending: usize,
    /// Keys of the entries this core knows about, in stack order
    keys: Vec<Option<String>>,
}

impl CoreState {
    fn position(&self, key: &Option<String>) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.position(&current.key)
    }

    fn record_key(&mut self, location: &Location) {
        let index = self.current_index();
        match location.action {
            Action::Push => {
                self.keys.truncate(index.map_or(0, |i| i + 1));
                self.keys.push(location.key.clone());
            }
            Action::Replace => match index {
                Some(i) => self.keys[i] = location.key.clone(),
                None => self.keys.push(location.key.clone()),
            },
            Action::Pop => {}
        }
    }
}

struct Shared<A> {
    adapter: A,
    state: RefCell<CoreState>,
}

impl<A: HistoryAdapter + 'static> Shared<A> {
    fn current(&self) -> Location {
        let cached = self.state.borrow().current.clone();
        if let Some(location) = cached {
            return location;
        }

        let location = self.adapter.current_location();
        let mut state = self.state.borrow_mut();
        if let Some(existing) = &state.current {
            return existing.clone();
        }
        state.keys = vec![location.key.clone()];
        state.current = Some(location.clone());
        location
    }

    fn start(shared: &Rc<Self>, candidate: Location) -> Result<Transition, HistoryError> {
        let transition = Self::begin(shared, candidate);
        match transition.status() {
            TransitionStatus::Failed(err) => Err(err.into()),
            _ => Ok(transition),
        }
    }

    fn begin(shared: &Rc<Self>, candidate: Location) -> Transition {
        shared.current();

        let (generation, hooks) = {
            let mut state = shared.state.borrow_mut();
            state.generation += 1;
            state.pending += 1;
            (state.generation, Rc::new(state.hooks.snapshot()))
        };

        debug!(
            generation,
            action = %candidate.action,
            path = %candidate.path(),
            "transition started"
        );

        let transition = Transition::new(generation, candidate);
        Self::run_hook(Rc::clone(shared), transition.clone(), hooks, 0);
        transition
    }

    fn run_hook(shared: Rc<Self>, transition: Transition, hooks: Rc<Vec<HookFn>>, index: usize) {
        let Some(hook) = hooks.get(index).cloned() else {
            shared.finish(&transition, true);
            return;
        };

        trace!(generation = transition.generation(), index, "running before-hook");

        let continuation = {
            let shared = Rc::clone(&shared);
            let transition = transition.clone();
            let hooks = Rc::clone(&hooks);
            Continuation::new(move |result| {
                Self::after_hook(shared, transition, hooks, index, result)
            })
        };

        let returned = hook(transition.location(), continuation.clone());
        if returned != HookResult::Defer {
            continuation.resolve(returned);
        }
    }

    fn after_hook(
        shared: Rc<Self>,
        transition: Transition,
        hooks: Rc<Vec<HookFn>>,
        index: usize,
        result: HookResult,
    ) {
        match result {
            HookResult::Block => {
                debug!(
                    generation = transition.generation(),
                    index, "before-hook blocked transition"
                );
                shared.finish(&transition, false);
            }
            HookResult::Prompt(message) => {
                let callback: ConfirmCallback = {
                    let shared = Rc::clone(&shared);
                    let transition = transition.clone();
                    Box::new(move |confirmed| {
                        if confirmed {
                            Self::run_hook(shared, transition, hooks, index + 1);
                        } else {
                            debug!(
                                generation = transition.generation(),
                                "user declined transition"
                            );
                            shared.finish(&transition, false);
                        }
                    })
                };
                shared.adapter.get_user_confirmation(&message, callback);
            }
            HookResult::Allow | HookResult::Defer => {
                Self::run_hook(shared, transition, hooks, index + 1);
            }
        }
    }

    fn finish(&self, transition: &Transition, passed: bool) {
        let latest = {
            let mut state = self.state.borrow_mut();
            state.pending = state.pending.saturating_sub(1);
            state.generation == transition.generation()
        };

        if !latest {
            debug!(
                generation = transition.generation(),
                "transition superseded by a newer attempt"
            );
            transition.settle(TransitionStatus::Superseded);
            return;
        }

        if !passed {
            let candidate = transition.location();
            let status = match candidate.action {
                Action::Pop => match self.restore_native(candidate) {
                    Ok(()) => TransitionStatus::Cancelled,
                    Err(err) => TransitionStatus::Failed(err),
                },
                _ => TransitionStatus::Cancelled,
            };
            transition.settle(status);
            return;
        }

        self.commit(transition);
    }

    fn commit(&self, transition: &Transition) {
        let location = transition.location();
        let applied = match location.action {
            Action::Push => self.adapter.push_location(location),
            Action::Replace => self.adapter.replace_location(location),
            // The native stack has already moved.
            Action::Pop => Ok(()),
        };

        if let Err(err) = applied {
            warn!(
                generation = transition.generation(),
                error = %err,
                "platform binding failed to apply transition"
            );
            transition.settle(TransitionStatus::Failed(err));
            return;
        }

        let listeners = {
            let mut state = self.state.borrow_mut();
            state.record_key(location);
            state.current = Some(location.clone());
            state.listeners.snapshot()
        };

        debug!(
            generation = transition.generation(),
            action = %location.action,
            path = %location.path(),
            "transition committed"
        );
        transition.settle(TransitionStatus::Committed);

        for listener in listeners {
            listener(location);
        }
    }

    /// Undo a native move whose POP was vetoed.
    fn restore_native(&self, candidate: &Location) -> Result<(), AdapterError> {
        let delta = {
            let state = self.state.borrow();
            state
                .current_index()
                .zip(state.position(&candidate.key))
                .map(|(prev, next)| prev as isize - next as isize)
        };

        match delta {
            Some(delta) if delta != 0 => {
                debug!(delta, "restoring native stack after cancelled pop");
                self.adapter.go(delta)
            }
            _ => {
                warn!(
                    key = ?candidate.key,
                    "cannot restore native stack: unknown stack position"
                );
                Ok(())
            }
        }
    }

    fn transition_to(shared: &Rc<Self>, location: Location) -> Result<Transition, HistoryError> {
        let candidate = Location {
            action: Action::Pop,
            ..location
        };

        let current = shared.current();
        if candidate.key == current.key {
            trace!(key = ?candidate.key, "pop arrived at the current entry");
            let generation = shared.state.borrow().generation;
            return Ok(Transition::settled(
                generation,
                candidate,
                TransitionStatus::Cancelled,
            ));
        }

        Self::start(shared, candidate)
    }
}

impl<A: HistoryAdapter + 'static> PopTarget for Shared<A> {
    fn accept_pop(self: Rc<Self>, location: Location) -> Result<Transition, HistoryError> {
        Self::transition_to(&self, location)
    }
}

/// Session history driven through a platform [`HistoryAdapter`].
///
/// Every `push`, `replace` and native POP runs through the registered
/// before-hooks in order. The first veto or declined confirmation cancels
/// the attempt; otherwise the adapter is updated, the current location is
/// replaced and listeners are notified in order.
///
/// # Example
///
/// ```rust
/// use waypoint::{HookResult, History, MemoryAdapter, Navigator, TransitionStatus};
///
/// let history = History::new(MemoryAdapter::new());
/// let _guard = history.listen_before(|location, _| {
///     if location.pathname == "/admin" {
///         HookResult::Block
///     } else {
///         HookResult::Allow
///     }
/// });
///
/// let blocked = history.push("/admin").unwrap();
/// assert_eq!(blocked.status(), TransitionStatus::Cancelled);
///
/// let allowed = history.push("/home").unwrap();
/// assert!(allowed.is_committed());
/// assert_eq!(history.current_location().pathname, "/home");
/// ```
pub struct History<A: HistoryAdapter + 'static> {
    shared: Rc<Shared<A>>,
}

impl<A: HistoryAdapter + 'static> History<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            shared: Rc::new(Shared {
                adapter,
                state: RefCell::new(CoreState {
                    current: None,
                    hooks: Registry::new(),
                    listeners: Registry::new(),
                    generation: 0,
                    pending: 0,
                    keys: Vec::new(),
                }),
            }),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.shared.adapter
    }

    /// Attempts that are still waiting on a hook or a confirmation.
    pub fn pending_transitions(&self) -> usize {
        self.shared.state.borrow().pending
    }

    /// Token of the most recently started attempt.
    pub fn generation(&self) -> u64 {
        self.shared.state.borrow().generation
    }

    pub fn hook_count(&self) -> usize {
        self.shared.state.borrow().hooks.len()
    }

    pub fn listener_count(&self) -> usize {
        self.shared.state.borrow().listeners.len()
    }

    /// Channel through which a binding reports native POP arrivals.
    pub fn pop_sink(&self) -> PopSink {
        PopSink::new(Rc::downgrade(&self.shared) as std::rc::Weak<dyn PopTarget>)
    }
}

impl<A: HistoryAdapter + 'static> Clone for History<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<A: HistoryAdapter + 'static> std::fmt::Debug for History<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("History")
            .field("current", &state.current)
            .field("generation", &state.generation)
            .field("pending", &state.pending)
            .field("hooks", &state.hooks.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl<A: HistoryAdapter + 'static> Navigator for History<A> {
    fn current_location(&self) -> Location {
        self.shared.current()
    }

    fn listen_before<F>(&self, hook: F) -> Unlisten
    where
        F: Fn(&Location, Continuation) -> HookResult + 'static,
    {
        let id = self.shared.state.borrow_mut().hooks.insert(Rc::new(hook));
        trace!(id, "before-hook registered");
        self.shared.adapter.attach_native(self.pop_sink());

        let weak = Rc::downgrade(&self.shared);
        Unlisten::new(move || {
            if let Some(shared) = weak.upgrade() {
                let removed = shared.state.borrow_mut().hooks.remove(id);
                if removed {
                    trace!(id, "before-hook removed");
                    shared.adapter.detach_native();
                }
            }
        })
    }

    fn listen<F>(&self, listener: F) -> Unlisten
    where
        F: Fn(&Location) + 'static,
    {
        let listener: ListenerFn = Rc::new(listener);
        let id = self
            .shared
            .state
            .borrow_mut()
            .listeners
            .insert(Rc::clone(&listener));
        trace!(id, "listener registered");
        self.shared.adapter.attach_native(self.pop_sink());

        listener(&self.shared.current());

        let weak = Rc::downgrade(&self.shared);
        Unlisten::new(move || {
            if let Some(shared) = weak.upgrade() {
                let removed = shared.state.borrow_mut().listeners.remove(id);
                if removed {
                    trace!(id, "listener removed");
                    shared.adapter.detach_native();
                }
            }
        })
    }

    fn push(&self, input: impl Into<LocationInput>) -> Result<Transition, HistoryError> {
        let candidate = create_location(input, Action::Push, Some(create_key()))?;
        Shared::start(&self.shared, candidate)
    }

    fn replace(&self, input: impl Into<LocationInput>) -> Result<Transition, HistoryError> {
        let candidate = create_location(input, Action::Replace, Some(create_key()))?;
        Shared::start(&self.shared, candidate)
    }

    fn go(&self, delta: isize) -> Result<(), HistoryError> {
        trace!(delta, "moving native stack");
        Ok(self.shared.adapter.go(delta)?)
    }

    fn transition_to(&self, location: Location) -> Result<Transition, HistoryError> {
        Shared::transition_to(&self.shared, location)
    }

    fn create_location(
        &self,
        input: impl Into<LocationInput>,
        action: Action,
    ) -> Result<Location, HistoryError> {
        create_location(input, action, Some(create_key()))
    }

    fn create_path(&self, input: impl Into<LocationInput>) -> String {
        match input.into() {
            LocationInput::Path(path) => path,
            LocationInput::Partial(partial) => create_path(
                partial.pathname.as_deref().unwrap_or("/"),
                partial.search.as_deref().unwrap_or(""),
                partial.hash.as_deref().unwrap_or(""),
            ),
        }
    }

    fn create_href(&self, input: impl Into<LocationInput>) -> String {
        self.shared.adapter.create_href(&self.create_path(input))
    }
}
