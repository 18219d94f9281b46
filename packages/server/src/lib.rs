// Linkblog metadata service - API Core
//
// HTTP and CLI entry points for the link metadata backfill. The backfill
// itself lives in the link-metadata crate; this crate wires configuration,
// storage and logging around it.

pub mod config;
pub mod server;

pub use config::*;
