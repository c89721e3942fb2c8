//! Infrastructure adapters for state backends.

pub mod state;
pub use state::InMemoryState;
