//! Storage implementations for link records.
//!
//! Available backends:
//! - `MemoryLinkStore` - In-memory storage (always available)
//! - `PostgrestLinkStore` - PostgREST / Supabase REST API (always available)
//! - `PostgresLinkStore` - Direct PostgreSQL access (requires `postgres` feature)

pub mod memory;
pub mod postgrest;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryLinkStore;
pub use postgrest::PostgrestLinkStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresLinkStore;
