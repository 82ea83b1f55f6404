//! Shared utilities for the Tsunagari workspace.

pub mod logger;
pub mod time;
