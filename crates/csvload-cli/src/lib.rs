//! CLI library components for csvload.

pub mod config;
pub mod logging;
