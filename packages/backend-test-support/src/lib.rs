//! Backend test support utilities
//!
//! Shared helpers for backend integration tests: one-time logging
//! initialization, Problem Details assertions and unique test data.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
