//! Core trait abstractions for the link metadata library.
//!
//! These traits define the seams between the orchestrator, the network
//! and the link database.

pub mod extractor;
pub mod store;
