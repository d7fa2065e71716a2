//! The history core and its platform-binding contract.
//!
//! This is the imperative shell around [`crate::core`]: it owns the current
//! location, the hook and listener registries, and the generation counter
//! that decides which of several overlapping attempts may commit.
//!
//! # Key Concepts
//!
//! - **History**: runs every navigation through before-hooks, confirmation
//!   and commit, and reconciles native POP movement
//! - **Hooks**: answer with a [`HookResult`] directly or later through a
//!   [`Continuation`]
//! - **Adapters**: the [`HistoryAdapter`] a history navigates through;
//!   [`MemoryAdapter`] keeps the stack in memory

mod adapter;
mod hook;
mod listener;
mod machine;
mod memory;
mod navigator;
mod transition;

pub use adapter::{ConfirmCallback, HistoryAdapter, NativeListenerCount, PopSink};
pub use hook::{Continuation, HookResult};
pub use listener::Unlisten;
pub use machine::History;
pub use memory::MemoryAdapter;
pub use navigator::Navigator;
pub use transition::{Transition, TransitionStatus};
