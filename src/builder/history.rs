//! Builder for constructing histories.

use crate::basename::BasenameHistory;
use crate::builder::error::BuildError;
use crate::history::{History, HistoryAdapter};
use tracing::debug;

/// Builder for constructing a [`History`] or [`BasenameHistory`] with a
/// fluent API.
pub struct HistoryBuilder<A: HistoryAdapter + 'static> {
    adapter: Option<A>,
    basename: Option<String>,
}

impl<A: HistoryAdapter + 'static> HistoryBuilder<A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            adapter: None,
            basename: None,
        }
    }

    /// Set the platform binding (required).
    pub fn adapter(mut self, adapter: A) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Scope the history under `basename`. Only used by
    /// [`build_with_basename`](Self::build_with_basename).
    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Some(basename.into());
        self
    }

    /// Build an unscoped history.
    /// Returns an error if no adapter was given.
    pub fn build(self) -> Result<History<A>, BuildError> {
        let adapter = self.adapter.ok_or(BuildError::MissingAdapter)?;
        debug!("history built");
        Ok(History::new(adapter))
    }

    /// Build a history scoped under the configured basename.
    /// Returns an error if the adapter or basename is missing, or the
    /// basename is not absolute.
    pub fn build_with_basename(self) -> Result<BasenameHistory<A>, BuildError> {
        let basename = self.basename.ok_or(BuildError::MissingBasename)?;
        if !basename.starts_with('/') {
            return Err(BuildError::InvalidBasename(basename));
        }

        let adapter = self.adapter.ok_or(BuildError::MissingAdapter)?;
        let normalized = basename.trim_end_matches('/');
        debug!(basename = normalized, "scoped history built");
        Ok(BasenameHistory::new(History::new(adapter), normalized))
    }
}

impl<A: HistoryAdapter + 'static> Default for HistoryBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{MemoryAdapter, Navigator};

    #[test]
    fn builder_validates_required_fields() {
        let result = HistoryBuilder::<MemoryAdapter>::new().build();

        assert!(matches!(result, Err(BuildError::MissingAdapter)));
    }

    #[test]
    fn builder_requires_basename_for_scoped_history() {
        let result = HistoryBuilder::new()
            .adapter(MemoryAdapter::new())
            .build_with_basename();

        assert!(matches!(result, Err(BuildError::MissingBasename)));
    }

    #[test]
    fn relative_basename_is_rejected() {
        let result = HistoryBuilder::new()
            .adapter(MemoryAdapter::new())
            .basename("base")
            .build_with_basename();

        assert_eq!(
            result.err(),
            Some(BuildError::InvalidBasename("base".to_string()))
        );
    }

    #[test]
    fn fluent_api_builds_history() {
        let history = HistoryBuilder::new()
            .adapter(MemoryAdapter::new())
            .build()
            .unwrap();

        assert_eq!(history.current_location().pathname, "/");
        assert!(history.push("/home").unwrap().is_committed());
    }

    #[test]
    fn scoped_history_trims_trailing_slashes() {
        let history = HistoryBuilder::new()
            .adapter(MemoryAdapter::new())
            .basename("/base/url//")
            .build_with_basename()
            .unwrap();

        assert_eq!(history.basename(), "/base/url");
        assert_eq!(history.create_path("/x"), "/base/url/x");
    }

    #[test]
    fn root_basename_scopes_nothing() {
        let history = HistoryBuilder::new()
            .adapter(MemoryAdapter::new())
            .basename("/")
            .build_with_basename()
            .unwrap();

        assert_eq!(history.basename(), "");
        assert_eq!(history.create_path("/x"), "/x");
        assert_eq!(history.current_location().basename, None);
    }
}
