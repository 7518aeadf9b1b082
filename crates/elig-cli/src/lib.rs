//! CLI library components for the eligibility screener.

pub mod logging;
pub mod screening;
pub mod types;
