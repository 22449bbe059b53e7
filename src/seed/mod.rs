//! Seeds the transaction store from an external product listing.
//!
//! Seeding is meant to run once per deployment. Nothing stops it from running
//! again, in which case every record is inserted again.

mod endpoint;
mod source;

pub use endpoint::seed_data_endpoint;
pub use source::{DEFAULT_SEED_URL, HttpSeedSource, SeedSource};
