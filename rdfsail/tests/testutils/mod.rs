//! Test utilities for rdfsail integration tests
//!
//! - `fixtures`: failure-injecting store, recording closure engine and
//!   listener, counting estimator
//! - `init_logging`: route `log` output through env_logger

#![allow(dead_code)]

pub mod fixtures;

/// Initialize env_logger once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
