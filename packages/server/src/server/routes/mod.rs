// HTTP routes
pub mod fetch_metadata;
pub mod health;

pub use fetch_metadata::*;
pub use health::*;
