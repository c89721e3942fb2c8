//! State backends.

pub mod memory;

pub use memory::InMemoryState;
