//! Waypoint: session history with veto-able transitions
//!
//! Waypoint keeps a "pure core, imperative shell" split. The location model,
//! path parsing and equality helpers in [`core`] are plain functions with no
//! side effects, while [`history`] owns the mutable registries and talks to
//! the platform through a [`HistoryAdapter`].
//!
//! # Core Concepts
//!
//! - **Location**: pathname, search, hash, optional state, the action that
//!   produced it and a unique key
//! - **Before-hooks**: run in order before every navigation and may allow,
//!   block, ask the user, or answer later
//! - **Listeners**: notified in order after every committed navigation
//! - **Basename**: a decorator that scopes all routes under a prefix
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use waypoint::{Action, History, HookResult, MemoryAdapter, Navigator};
//!
//! let history = History::new(MemoryAdapter::new());
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let _unlisten = history.listen(move |location| {
//!     sink.borrow_mut().push((location.action, location.pathname.clone()));
//! });
//!
//! let _guard = history.listen_before(|location, _| {
//!     if location.pathname.starts_with("/private") {
//!         HookResult::Block
//!     } else {
//!         HookResult::Allow
//!     }
//! });
//!
//! history.push("/home").unwrap();
//! history.push("/private/notes").unwrap();
//! history.replace("/about").unwrap();
//!
//! assert_eq!(
//!     *seen.borrow(),
//!     vec![
//!         (Action::Pop, "/".to_string()),
//!         (Action::Push, "/home".to_string()),
//!         (Action::Replace, "/about".to_string()),
//!     ]
//! );
//! ```

pub mod basename;
pub mod builder;
pub mod core;
pub mod history;

// Re-export commonly used types
pub use basename::BasenameHistory;
pub use builder::{BuildError, HistoryBuilder};
pub use core::{
    create_key, create_location, create_path, create_query, locations_are_equal, parse_path,
    states_are_equal, Action, AdapterError, HistoryError, Location, LocationInput,
    PartialLocation, Query, StateValue,
};
pub use history::{
    Continuation, History, HistoryAdapter, HookResult, MemoryAdapter, Navigator, PopSink,
    Transition, TransitionStatus, Unlisten,
};
