//! Unit tests for individual components

mod config_test;
mod error_test;
mod metrics_test;
mod state_test;
mod util_test;
