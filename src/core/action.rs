//! Provenance tag for locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a [`Location`](super::Location) came to be.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// A new entry was added to the stack.
    Push,
    /// The current entry was overwritten.
    Replace,
    /// The native stack moved backward or forward.
    #[default]
    Pop,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "PUSH",
            Self::Replace => "REPLACE",
            Self::Pop => "POP",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
