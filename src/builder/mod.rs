//! Builder API for constructing histories.
//!
//! ```
//! use waypoint::builder::HistoryBuilder;
//! use waypoint::{MemoryAdapter, Navigator};
//!
//! let history = HistoryBuilder::new()
//!     .adapter(MemoryAdapter::new())
//!     .basename("/app/")
//!     .build_with_basename()
//!     .unwrap();
//!
//! assert_eq!(history.create_href("/settings"), "/app/settings");
//! ```

pub mod error;
pub mod history;

pub use error::BuildError;
pub use history::HistoryBuilder;
