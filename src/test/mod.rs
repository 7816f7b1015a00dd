//! Test sequencing on top of a [`crate::session::Session`].

pub mod outcome;

pub use outcome::TestOutcome;
pub use runner::run_throughput_test;
pub use test_config::ThroughputConfig;
