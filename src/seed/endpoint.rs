//! Defines the route handler that seeds the store from the seed source.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    AppState, Error, json_message,
    stores::TransactionStore,
    transaction::{Transaction, TransactionBuilder},
};

use super::SeedSource;

/// The state needed to seed the store.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The store that receives the seed records.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// Where the seed records come from.
    pub seed_source: Arc<dyn SeedSource>,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            seed_source: state.seed_source.clone(),
        }
    }
}

/// The fields kept from each seed record. Any other fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedRecord {
    title: String,
    description: String,
    category: String,
    price: f64,
    #[serde(default)]
    sold: bool,
    #[serde(with = "time::serde::rfc3339")]
    date_of_sale: OffsetDateTime,
    #[serde(default)]
    image: Option<String>,
}

impl SeedRecord {
    fn into_builder(self) -> TransactionBuilder {
        Transaction::build(&self.title, self.price, self.date_of_sale)
            .description(&self.description)
            .category(&self.category)
            .sold(self.sold)
            .image(self.image.as_deref())
    }
}

/// A route handler that fetches the seed data and inserts every record.
///
/// Responds with 400 if the seed data is not a non-empty array of valid
/// records, and 500 if it could not be fetched or inserted.
pub async fn seed_data_endpoint(State(state): State<SeedState>) -> Response {
    match seed_transactions(state.seed_source.as_ref(), state.transaction_store.as_ref()).await {
        Ok(inserted) => {
            tracing::info!("Seeded {inserted} transactions");
            json_message(StatusCode::OK, "Data seeded successfully")
        }
        Err(error) => error.into_json_response("Failed to seed data"),
    }
}

/// Fetch the seed data from `source`, validate all of it, then insert it into `store`.
///
/// Returns the number of inserted transactions.
async fn seed_transactions(
    source: &dyn SeedSource,
    store: &dyn TransactionStore,
) -> Result<usize, Error> {
    let body = source.fetch().await?;
    let builders = parse_seed_data(&body)?;

    store.insert_many(builders).await
}

/// Parse the seed data into transactions ready to insert.
///
/// # Errors
/// Returns [Error::InvalidSeedData] if `body` is not a non-empty JSON array,
/// or if any record lacks a required field or has a wrongly typed field.
/// Prices are checked by the store when inserting.
fn parse_seed_data(body: &str) -> Result<Vec<TransactionBuilder>, Error> {
    let value: Value = serde_json::from_str(body)
        .map_err(|error| Error::InvalidSeedData(format!("not JSON: {error}")))?;

    let records = match value {
        Value::Array(records) if !records.is_empty() => records,
        Value::Array(_) => return Err(Error::InvalidSeedData("empty array".to_owned())),
        other => {
            return Err(Error::InvalidSeedData(format!(
                "expected an array, got {}",
                json_type_name(&other)
            )));
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<SeedRecord>(record)
                .map(SeedRecord::into_builder)
                .map_err(|error| Error::InvalidSeedData(format!("record {index}: {error}")))
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
