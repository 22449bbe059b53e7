use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    AppState, Error, database_id::TransactionId, json_message, month::MonthNumber,
    stores::{Filter, TransactionStore},
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The store holding the transactions.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The query parameters for deleting a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// The ID of the transaction to delete.
    pub id: Option<String>,
    /// If given, the transaction must have been sold in this month.
    pub month: Option<String>,
}

/// A route handler for deleting a transaction by its ID.
///
/// Responds with 404 if there is no transaction with the ID, or if a month is
/// given and the transaction was sold in a different month.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    match delete_transaction(&query, state.transaction_store.as_ref()).await {
        Ok(id) => {
            tracing::info!("Deleted transaction {id}");
            json_message(StatusCode::OK, "Transaction deleted successfully")
        }
        Err(error) => error.into_json_response("Failed to delete transaction"),
    }
}

async fn delete_transaction(
    query: &DeleteQuery,
    store: &dyn TransactionStore,
) -> Result<TransactionId, Error> {
    let id = parse_transaction_id(query.id.as_deref())?;
    let month = MonthNumber::parse_optional(query.month.as_deref())?;
    let filter = Filter::id(id).and(Filter::optional_month_of_sale(month));

    match store.delete_one(&filter).await? {
        0 => Err(Error::NotFound),
        _ => Ok(id),
    }
}

fn parse_transaction_id(text: Option<&str>) -> Result<TransactionId, Error> {
    text.and_then(|text| text.trim().parse::<TransactionId>().ok())
        .filter(|id| *id > 0)
        .ok_or(Error::InvalidTransactionId)
}
