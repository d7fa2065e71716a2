//! Opaque state payload attached to locations.
//!
//! State is any serializable value. Two kinds of value can be represented
//! but must never be stored: callables and dates. Comparing a payload that
//! contains either one is a programmer error.

use super::error::HistoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

const NO_FUNCTIONS: &str = "You must not store functions in location state";
const NO_DATES: &str = "You must not store Date objects in location state";

/// A callable smuggled into state. Only exists so the invariant can be checked.
#[derive(Clone)]
pub struct StateFn(Arc<dyn Fn() + Send + Sync>);

impl StateFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Whether both handles point at the same callable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for StateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateFn(..)")
    }
}

impl PartialEq for StateFn {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Opaque payload carried by a [`Location`](super::Location).
///
/// Undefined state is modelled as `None` on the location itself, so this
/// enum only covers values that are actually present.
///
/// The derived `PartialEq` is plain structural equality and never panics.
/// Use [`states_are_equal`] for the checked comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<StateValue>),
    Object(BTreeMap<String, StateValue>),
    #[serde(skip_deserializing)]
    Date(DateTime<Utc>),
    #[serde(skip)]
    Function(StateFn),
}

impl StateValue {
    /// Build an object from key/value pairs.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<StateValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn forbidden(&self) -> Option<&'static str> {
        match self {
            Self::Function(_) => Some(NO_FUNCTIONS),
            Self::Date(_) => Some(NO_DATES),
            _ => None,
        }
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for StateValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<StateValue>> for StateValue {
    fn from(value: Vec<StateValue>) -> Self {
        Self::Array(value)
    }
}

impl From<DateTime<Utc>> for StateValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<StateFn> for StateValue {
    fn from(value: StateFn) -> Self {
        Self::Function(value)
    }
}

impl From<serde_json::Value> for StateValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Recursive structural comparison of two state payloads.
///
/// Numbers use IEEE equality, so `NaN` never equals `NaN`.
///
/// # Panics
///
/// Panics when a callable or a date is met during the comparison. Storing
/// either in location state is a programmer error.
pub fn states_are_equal(a: &StateValue, b: &StateValue) -> bool {
    match try_states_are_equal(a, b) {
        Ok(equal) => equal,
        Err(err) => panic!("{err}"),
    }
}

/// Checked form of [`states_are_equal`].
pub fn try_states_are_equal(a: &StateValue, b: &StateValue) -> Result<bool, HistoryError> {
    if let (StateValue::Function(f), StateValue::Function(g)) = (a, b) {
        if f.ptr_eq(g) {
            return Ok(true);
        }
    }

    if let Some(message) = a.forbidden().or_else(|| b.forbidden()) {
        return Err(HistoryError::InvariantViolation(message));
    }

    match (a, b) {
        (StateValue::Null, StateValue::Null) => Ok(true),
        (StateValue::Bool(x), StateValue::Bool(y)) => Ok(x == y),
        (StateValue::Number(x), StateValue::Number(y)) => Ok(x == y),
        (StateValue::String(x), StateValue::String(y)) => Ok(x == y),
        (StateValue::Array(xs), StateValue::Array(ys)) => {
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (x, y) in xs.iter().zip(ys) {
                if !try_states_are_equal(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (StateValue::Object(xs), StateValue::Object(ys)) => {
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (key, x) in xs {
                let Some(y) = ys.get(key) else {
                    return Ok(false);
                };
                if !try_states_are_equal(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Compare optional payloads, where `None` is undefined state.
pub(crate) fn optional_states_are_equal(a: Option<&StateValue>, b: Option<&StateValue>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => states_are_equal(a, b),
        _ => false,
    }
}
