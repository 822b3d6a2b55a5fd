//! Shared utilities

pub mod logger;
pub mod money;
pub mod time;
