//! Shared utilities for the referenda workspace.

pub mod time;

pub use time::{format_duration, format_eta};
