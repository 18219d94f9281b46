//! Data types for links, metadata, configuration and batch reports.

pub mod config;
pub mod link;
pub mod metadata;
pub mod outcome;
