//! Backfill pipeline.
//!
//! Orchestrates one batch run:
//! - Candidate selection (single link or newest blank titles)
//! - Sequential, paced metadata extraction
//! - Merge rules (never overwrite an existing summary)
//! - Write-back and per-link error collection

pub mod backfill;

pub use backfill::{backfill_links, build_update, process_candidate, CandidateOutcome};
