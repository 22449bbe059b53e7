//! Implements a struct that holds the state of the REST server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{
    Error, db::initialize, pagination::PaginationConfig, seed::SeedSource,
    stores::{SQLiteTransactionStore, TransactionStore},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store holding all transactions.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// Where the seed endpoint gets its data from.
    pub seed_source: Arc<dyn SeedSource>,

    /// The config that controls how to page transactions.
    pub pagination_config: PaginationConfig,

    /// The time limit for computing the combined dashboard data.
    pub fan_out_timeout: Duration,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_source: Arc<dyn SeedSource>,
        pagination_config: PaginationConfig,
        fan_out_timeout: Duration,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            transaction_store: Arc::new(SQLiteTransactionStore::new(connection)),
            seed_source,
            pagination_config,
            fan_out_timeout,
        })
    }
}
