//! Shared utilities.

pub mod retry;
pub mod timeout;
