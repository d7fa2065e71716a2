//! The location model: where the application is, and how it got there.

use super::action::Action;
use super::error::HistoryError;
use super::path::{create_path, decode_pathname, parse_path};
use super::state::{optional_states_are_equal, StateValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single committed (or candidate) point in navigation history.
///
/// Locations are values: once built they are never mutated by the core.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Action, Location};
///
/// let location = Location::new("/home?the=query#the-hash").unwrap();
///
/// assert_eq!(location.pathname, "/home");
/// assert_eq!(location.search, "?the=query");
/// assert_eq!(location.hash, "#the-hash");
/// assert_eq!(location.action, Action::Pop);
/// assert_eq!(location.key.as_deref(), Some(""));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Absolute, percent-decoded path
    pub pathname: String,
    /// Raw query string, empty or starting with `?`
    pub search: String,
    /// Fragment, empty or starting with `#`
    pub hash: String,
    /// Caller payload; `None` means undefined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateValue>,
    /// What produced this location
    pub action: Action,
    /// Stack entry identifier; `None` before the core has pushed anything
    pub key: Option<String>,
    /// Prefix stripped by a basename decorator, if one was involved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basename: Option<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
            state: None,
            action: Action::Pop,
            key: Some(String::new()),
            basename: None,
        }
    }
}

impl Location {
    /// Build a bare location with action POP and an empty key.
    pub fn new(input: impl Into<LocationInput>) -> Result<Self, HistoryError> {
        create_location(input, Action::Pop, Some(String::new()))
    }

    /// The pathname, search and hash joined into one string.
    pub fn path(&self) -> String {
        create_path(&self.pathname, &self.search, &self.hash)
    }
}

/// Partial location description supplied by application code.
///
/// Missing fields fall back to `/`, `""`, `""` and undefined state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialLocation {
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
    pub state: Option<StateValue>,
    pub basename: Option<String>,
}

impl PartialLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn state(mut self, state: impl Into<StateValue>) -> Self {
        self.state = Some(state.into());
        self
    }
}

impl From<Location> for PartialLocation {
    fn from(location: Location) -> Self {
        Self {
            pathname: Some(location.pathname),
            search: Some(location.search),
            hash: Some(location.hash),
            state: location.state,
            basename: location.basename,
        }
    }
}

/// Anything a navigation can be requested with: a path string or a
/// partial location.
#[derive(Clone, Debug, PartialEq)]
pub enum LocationInput {
    Path(String),
    Partial(PartialLocation),
}

impl LocationInput {
    /// Tokenize path strings; partial locations pass through untouched.
    pub fn into_partial(self) -> PartialLocation {
        match self {
            Self::Path(path) => parse_path(&path),
            Self::Partial(partial) => partial,
        }
    }
}

impl Default for LocationInput {
    fn default() -> Self {
        Self::Path("/".to_string())
    }
}

impl From<&str> for LocationInput {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for LocationInput {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<PartialLocation> for LocationInput {
    fn from(partial: PartialLocation) -> Self {
        Self::Partial(partial)
    }
}

impl From<Location> for LocationInput {
    fn from(location: Location) -> Self {
        Self::Partial(location.into())
    }
}

impl From<&Location> for LocationInput {
    fn from(location: &Location) -> Self {
        Self::Partial(location.clone().into())
    }
}

/// Build a location from a path string or partial description.
///
/// The pathname is percent-decoded; a malformed escape fails with
/// [`HistoryError::PathDecoding`]. Any `basename` on the input is dropped.
pub fn create_location(
    input: impl Into<LocationInput>,
    action: Action,
    key: Option<String>,
) -> Result<Location, HistoryError> {
    let partial = input.into().into_partial();

    let raw_pathname = partial.pathname.unwrap_or_else(|| "/".to_string());
    let pathname = decode_pathname(&raw_pathname)?;

    Ok(Location {
        pathname,
        search: partial.search.unwrap_or_default(),
        hash: partial.hash.unwrap_or_default(),
        state: partial.state,
        action,
        key,
        basename: None,
    })
}

/// Whether two locations are literally the same stack entry with the same
/// target.
///
/// Keys are compared first; different keys are never equal.
///
/// # Panics
///
/// Panics if either state contains a callable or a date (see
/// [`states_are_equal`](super::states_are_equal)).
pub fn locations_are_equal(a: &Location, b: &Location) -> bool {
    a.key == b.key
        && a.pathname == b.pathname
        && a.search == b.search
        && a.hash == b.hash
        && optional_states_are_equal(a.state.as_ref(), b.state.as_ref())
}

/// Opaque stack-entry identifier, unique within a session.
pub fn create_key() -> String {
    Uuid::new_v4().simple().to_string()
}
