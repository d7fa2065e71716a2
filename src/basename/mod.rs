//! Scoping a history under a fixed pathname prefix.
//!
//! Locations leaving the decorator have the prefix stripped and recorded in
//! `basename`; locations entering it get the prefix put back exactly once.

use crate::core::{Action, HistoryError, Location, LocationInput, PartialLocation};
use crate::history::{
    Continuation, History, HistoryAdapter, HookResult, Navigator, Transition, Unlisten,
};
use std::rc::Rc;

/// Normalized prefix shared by the decorator and the callbacks it wraps.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Basename {
    prefix: String,
}

impl Basename {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Whether `pathname` lies under the prefix, ignoring ASCII case.
    fn scopes(&self, pathname: &str) -> bool {
        let len = self.prefix.len();
        let head_matches = pathname
            .get(..len)
            .is_some_and(|head| head.eq_ignore_ascii_case(&self.prefix));
        head_matches && matches!(pathname.as_bytes().get(len), None | Some(b'/'))
    }

    fn strip(&self, location: &Location) -> Location {
        let mut location = location.clone();
        if self.prefix.is_empty() || location.basename.is_some() {
            return location;
        }

        if self.scopes(&location.pathname) {
            let rest = &location.pathname[self.prefix.len()..];
            location.pathname = if rest.is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            };
            location.basename = Some(self.prefix.clone());
        } else {
            location.basename = Some(String::new());
        }
        location
    }

    fn prepend(&self, input: LocationInput) -> LocationInput {
        let partial = input.into_partial();
        if self.prefix.is_empty() {
            return partial.into();
        }

        let pathname = partial.pathname.as_deref().unwrap_or("/");
        let relative = pathname.strip_prefix('/').unwrap_or(pathname);
        PartialLocation {
            pathname: Some(format!("{}/{}", self.prefix, relative)),
            basename: None,
            ..partial
        }
        .into()
    }
}

/// A [`Navigator`] whose routes live under a fixed prefix.
///
/// # Example
///
/// ```rust
/// use waypoint::{BasenameHistory, History, MemoryAdapter, Navigator};
///
/// let history = BasenameHistory::new(History::new(MemoryAdapter::new()), "/base/url/");
///
/// assert_eq!(history.current_location().basename.as_deref(), Some(""));
/// assert_eq!(history.create_path("/the/path"), "/base/url/the/path");
///
/// history.push("/home").unwrap();
/// let current = history.current_location();
/// assert_eq!(current.pathname, "/home");
/// assert_eq!(current.basename.as_deref(), Some("/base/url"));
/// ```
pub struct BasenameHistory<A: HistoryAdapter + 'static> {
    history: History<A>,
    basename: Rc<Basename>,
}

impl<A: HistoryAdapter + 'static> BasenameHistory<A> {
    /// Wrap `history`. A trailing slash on `basename` is ignored.
    pub fn new(history: History<A>, basename: &str) -> Self {
        Self {
            history,
            basename: Rc::new(Basename::new(basename)),
        }
    }

    /// The normalized prefix.
    pub fn basename(&self) -> &str {
        &self.basename.prefix
    }

    /// The wrapped, unscoped history.
    pub fn inner(&self) -> &History<A> {
        &self.history
    }
}

impl<A: HistoryAdapter + 'static> Clone for BasenameHistory<A> {
    fn clone(&self) -> Self {
        Self {
            history: self.history.clone(),
            basename: Rc::clone(&self.basename),
        }
    }
}

impl<A: HistoryAdapter + 'static> Navigator for BasenameHistory<A> {
    fn current_location(&self) -> Location {
        self.basename.strip(&self.history.current_location())
    }

    fn listen_before<F>(&self, hook: F) -> Unlisten
    where
        F: Fn(&Location, Continuation) -> HookResult + 'static,
    {
        let basename = Rc::clone(&self.basename);
        self.history
            .listen_before(move |location, continuation| {
                hook(&basename.strip(location), continuation)
            })
    }

    fn listen<F>(&self, listener: F) -> Unlisten
    where
        F: Fn(&Location) + 'static,
    {
        let basename = Rc::clone(&self.basename);
        self.history
            .listen(move |location| listener(&basename.strip(location)))
    }

    fn push(&self, input: impl Into<LocationInput>) -> Result<Transition, HistoryError> {
        self.history.push(self.basename.prepend(input.into()))
    }

    fn replace(&self, input: impl Into<LocationInput>) -> Result<Transition, HistoryError> {
        self.history.replace(self.basename.prepend(input.into()))
    }

    fn go(&self, delta: isize) -> Result<(), HistoryError> {
        self.history.go(delta)
    }

    fn transition_to(&self, location: Location) -> Result<Transition, HistoryError> {
        self.history.transition_to(location)
    }

    fn create_location(
        &self,
        input: impl Into<LocationInput>,
        action: Action,
    ) -> Result<Location, HistoryError> {
        let location = self
            .history
            .create_location(self.basename.prepend(input.into()), action)?;
        Ok(self.basename.strip(&location))
    }

    fn create_path(&self, input: impl Into<LocationInput>) -> String {
        self.history.create_path(self.basename.prepend(input.into()))
    }

    fn create_href(&self, input: impl Into<LocationInput>) -> String {
        self.history.create_href(self.basename.prepend(input.into()))
    }
}
