//! Contains the transaction store trait and its SQLite implementation.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    Error,
    transaction::{Transaction, TransactionBuilder},
};

mod aggregation;
mod filter;
mod sqlite;

pub use aggregation::{Aggregation, Group, GroupKey, PriceRange};
pub use filter::{Field, Filter, Value};
pub use sqlite::SQLiteTransactionStore;

/// The number of rows changed by a write.
pub type RowsAffected = usize;

/// Handles the storage and retrieval of transactions.
///
/// Request handlers only talk to the store through this trait.
#[async_trait]
pub trait TransactionStore: Debug + Send + Sync {
    /// Retrieve up to `limit` transactions matching `filter` in insertion
    /// order, skipping the first `skip` matches.
    async fn find(&self, filter: &Filter, skip: u64, limit: u64)
    -> Result<Vec<Transaction>, Error>;

    /// Count the transactions matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<u64, Error>;

    /// Run `aggregation` and return its groups.
    async fn aggregate(&self, aggregation: &Aggregation) -> Result<Vec<Group>, Error>;

    /// Insert all of `builders`, or none of them if any insert fails.
    ///
    /// Returns the number of inserted transactions.
    async fn insert_many(&self, builders: Vec<TransactionBuilder>) -> Result<usize, Error>;

    /// Delete the first transaction (in insertion order) matching `filter`.
    async fn delete_one(&self, filter: &Filter) -> Result<RowsAffected, Error>;
}
