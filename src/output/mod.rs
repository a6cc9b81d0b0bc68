//! Result rendering
//!
//! Both renderers take a finished [`RunSummary`](crate::coordinator::RunSummary)
//! and write to stdout only.

pub mod json;
pub mod text;
