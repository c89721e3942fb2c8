//! Configuration models for the feasibility stack.

pub mod stack;

pub use stack::{QuotaConfig, StackConfig};
