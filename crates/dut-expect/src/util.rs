//! Utility modules for expect operations.

pub mod timeout;

pub use timeout::Deadline;
