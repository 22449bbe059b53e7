use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::{
    AppState, Error, PaginationConfig,
    db::initialize,
    stores::{
        Aggregation, Filter, Group, GroupKey, RowsAffected, SQLiteTransactionStore,
        TransactionStore,
    },
    transaction::{Transaction, TransactionBuilder},
};

use super::StaticSeedSource;

#[track_caller]
pub(crate) fn get_test_store() -> Arc<SQLiteTransactionStore> {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    Arc::new(SQLiteTransactionStore::new(Arc::new(Mutex::new(connection))))
}

/// App state backed by `store` with the default pagination config and an
/// empty seed source.
pub(crate) fn get_test_state(store: Arc<dyn TransactionStore>) -> AppState {
    AppState {
        transaction_store: store,
        seed_source: StaticSeedSource::new("[]"),
        pagination_config: PaginationConfig::default(),
        fan_out_timeout: Duration::from_secs(5),
    }
}

pub(crate) async fn insert(store: &dyn TransactionStore, builders: Vec<TransactionBuilder>) {
    store
        .insert_many(builders)
        .await
        .expect("Could not insert test transactions");
}

/// Identifies a store method, and for aggregations, which grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreCall {
    Find,
    Count,
    AggregateNothing,
    AggregateCategory,
    AggregatePriceRange,
    InsertMany,
    DeleteOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    Error,
    Hang,
}

/// A store that fails or never responds on some calls and passes the rest to
/// an in-memory SQLite store.
#[derive(Debug)]
pub(crate) struct FailingStore {
    inner: Arc<SQLiteTransactionStore>,
    /// `None` affects every call.
    call: Option<StoreCall>,
    fault: Fault,
}

impl FailingStore {
    /// Fail every call.
    pub(crate) fn always() -> Arc<Self> {
        Self::new(None, Fault::Error)
    }

    /// Fail only `call`.
    pub(crate) fn on(call: StoreCall) -> Arc<Self> {
        Self::new(Some(call), Fault::Error)
    }

    /// Never finish `call`.
    pub(crate) fn hanging_on(call: StoreCall) -> Arc<Self> {
        Self::new(Some(call), Fault::Hang)
    }

    fn new(call: Option<StoreCall>, fault: Fault) -> Arc<Self> {
        Arc::new(Self {
            inner: get_test_store(),
            call,
            fault,
        })
    }

    async fn check(&self, call: StoreCall) -> Result<(), Error> {
        if self.call.is_some_and(|failing_call| failing_call != call) {
            return Ok(());
        }

        match self.fault {
            Fault::Error => Err(Error::DatabaseLockError),
            Fault::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl TransactionStore for FailingStore {
    async fn find(
        &self,
        filter: &Filter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, Error> {
        self.check(StoreCall::Find).await?;
        self.inner.find(filter, skip, limit).await
    }

    async fn count(&self, filter: &Filter) -> Result<u64, Error> {
        self.check(StoreCall::Count).await?;
        self.inner.count(filter).await
    }

    async fn aggregate(&self, aggregation: &Aggregation) -> Result<Vec<Group>, Error> {
        let call = match aggregation.group_by {
            GroupKey::Nothing => StoreCall::AggregateNothing,
            GroupKey::Category => StoreCall::AggregateCategory,
            GroupKey::PriceRange { .. } => StoreCall::AggregatePriceRange,
        };
        self.check(call).await?;
        self.inner.aggregate(aggregation).await
    }

    async fn insert_many(&self, builders: Vec<TransactionBuilder>) -> Result<usize, Error> {
        self.check(StoreCall::InsertMany).await?;
        self.inner.insert_many(builders).await
    }

    async fn delete_one(&self, filter: &Filter) -> Result<RowsAffected, Error> {
        self.check(StoreCall::DeleteOne).await?;
        self.inner.delete_one(filter).await
    }
}
