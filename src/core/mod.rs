//! Location model and pure helpers.
//!
//! This module contains everything that does not touch a platform binding:
//! - `Action` and `Location`, the unit of navigation state
//! - Location construction, path parsing and percent-decoding
//! - Structural equality for state payloads and locations
//! - Query maps and key generation
//!
//! Nothing in here has side effects.

mod action;
mod error;
mod location;
mod path;
mod query;
mod state;

pub use action::Action;
pub use error::{AdapterError, HistoryError};
pub use location::{
    create_key, create_location, locations_are_equal, Location, LocationInput, PartialLocation,
};
pub use path::{create_path, decode_pathname, parse_path};
pub use query::{create_query, Query, QueryValue};
pub use state::{states_are_equal, try_states_are_equal, StateFn, StateValue};
