//! Profile extraction, scoring and analysis

pub mod taxonomy;
pub mod profile;
pub mod scoring;
pub mod suggestions;
pub mod job_context;
pub mod analyzer;
