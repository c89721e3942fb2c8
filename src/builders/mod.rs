//! Builders to assemble feasibility stacks from configuration.

pub mod stack_builder;

pub use stack_builder::{build_stack, build_stack_from_json, FeasibilityStack};
