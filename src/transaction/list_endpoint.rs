//! Defines the route handler for listing and searching a month's transactions.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    month::MonthNumber,
    pagination::{Page, PaginationConfig},
    stores::TransactionStore,
};

use super::{Transaction, build_transaction_filter};

/// The state needed for the transactions list.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The store to read transactions from.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The config that controls how to page transactions.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for the transactions list.
///
/// Values are kept as raw text and validated by the handler.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// The month to list transactions for.
    pub month: Option<String>,
    /// Text to search the title, description and price for.
    pub search_text: Option<String>,
    /// The 1-based page number.
    pub page: Option<String>,
    /// The number of transactions per page.
    pub per_page: Option<String>,
}

/// One page of the transactions list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// The number of transactions matching the query across all pages.
    pub total_records: u64,
    /// The number of pages needed to show every matching transaction.
    pub total_pages: u64,
    /// The page number that was requested.
    pub current_page: u64,
    /// The requested page size.
    pub per_page: u64,
    /// The transactions on this page, ordered by insertion.
    pub data: Vec<Transaction>,
}

/// A route handler for a page of the transactions sold in a month that match the search text.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionsState>,
    Query(query): Query<ListQuery>,
) -> Response {
    match list_transactions(&query, &state).await {
        Ok(page) => Json(page).into_response(),
        Err(error) => error.into_json_response("Failed to list transactions"),
    }
}

async fn list_transactions(
    query: &ListQuery,
    state: &TransactionsState,
) -> Result<TransactionPage, Error> {
    let month = MonthNumber::parse_required(query.month.as_deref())?;
    let page = Page::parse(
        query.page.as_deref(),
        query.per_page.as_deref(),
        &state.pagination_config,
    )?;
    let filter = build_transaction_filter(month, query.search_text.as_deref().unwrap_or_default());

    let data = state
        .transaction_store
        .find(&filter, page.offset(), page.size)
        .await?;
    let total_records = state.transaction_store.count(&filter).await?;

    Ok(TransactionPage {
        total_records,
        total_pages: page.page_count(total_records),
        current_page: page.number,
        per_page: page.size,
        data,
    })
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        PaginationConfig, endpoints,
        test_utils::{FailingStore, StoreCall, get_test_store, insert},
        transaction::Transaction,
    };

    use super::{TransactionsState, list_transactions_endpoint};

    fn get_test_server(state: TransactionsState) -> TestServer {
        let app = Router::new()
            .route(endpoints::ALL_TRANSACTIONS, get(list_transactions_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    async fn get_seeded_server() -> TestServer {
        let store = get_test_store();
        insert(
            &*store,
            vec![
                Transaction::build("Backpack", 109.95, datetime!(2021-03-27 20:29:54 UTC))
                    .description("Fits 15 inch laptops"),
                Transaction::build("T-Shirt", 22.3, datetime!(2022-03-01 00:00:00 UTC))
                    .description("Slim fit"),
                Transaction::build("Jacket", 55.99, datetime!(2021-03-15 12:00:00 UTC))
                    .description("Great outerwear"),
                Transaction::build("Ring", 150.0, datetime!(2021-03-09 00:00:00 UTC))
                    .description("Gold plated"),
                Transaction::build("Monitor", 999.99, datetime!(2021-04-09 00:00:00 UTC))
                    .description("Full HD"),
            ],
        )
        .await;

        get_test_server(TransactionsState {
            transaction_store: store,
            pagination_config: PaginationConfig::default(),
        })
    }

    fn titles(body: &Value) -> Vec<&str> {
        body["data"]
            .as_array()
            .expect("data should be an array")
            .iter()
            .map(|transaction| transaction["title"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn lists_every_transaction_in_month_of_any_year() {
        let server = get_seeded_server().await;

        let response = server
            .get(endpoints::ALL_TRANSACTIONS)
            .add_query_param("month", 3)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["totalRecords"], 4);
        assert_eq!(body["totalPages"], 1);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["perPage"], 10);
        assert_eq!(titles(&body), ["Backpack", "T-Shirt", "Jacket", "Ring"]);
    }

    #[tokio::test]
    async fn transactions_are_camel_case() {
        let server = get_seeded_server().await;

        let response = server
            .get(endpoints::ALL_TRANSACTIONS)
            .add_query_param("month", 4)
            .await;

        let body: Value = response.json();
        let transaction = &body["data"][0];
        assert_eq!(transaction["title"], "Monitor");
        assert_eq!(transaction["dateOfSale"], "2021-04-09T00:00:00Z");
        assert_eq!(transaction["sold"], false);
        assert_eq!(transaction["image"], Value::Null);
        assert!(transaction["createdAt"].is_string());
    }

    #[tokio::test]
    async fn pages_through_matches() {
        let server = get_seeded_server().await;

        let response = server
            .get(endpoints::ALL_TRANSACTIONS)
            .add_query_param("month", 3)
            .add_query_param("page", 2)
            .add_query_param("perPage", 3)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["totalRecords"], 4);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["perPage"], 3);
        assert_eq!(titles(&body), ["Ring"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let server = get_seeded_server().await;

        let response = server
            .get(endpoints::ALL_TRANSACTIONS)
            .add_query_param("month", 3)
            .add_query_param("page", 9)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["totalRecords"], 4);
        assert!(titles(&body).is_empty());
    }

    #[tokio::test]
    async fn searches_title_description_and_price() {
        let server = get_seeded_server().await;

        for (search_text, want) in [
            ("back", vec!["Backpack"]),
            ("  OUTERWEAR ", vec!["Jacket"]),
            ("150", vec!["Ring"]),
            ("22.3", vec!["T-Shirt"]),
        ] {
            let response = server
                .get(endpoints::ALL_TRANSACTIONS)
                .add_query_param("month", 3)
                .add_query_param("searchText", search_text)
                .await;

            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(titles(&body), want, "search text '{search_text}'");
            assert_eq!(body["totalRecords"], want.len());
        }
    }

    #[tokio::test]
    async fn no_matches_has_zero_pages() {
        let server = get_seeded_server().await;

        let response = server
            .get(endpoints::ALL_TRANSACTIONS)
            .add_query_param("month", 12)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "totalRecords": 0,
            "totalPages": 0,
            "currentPage": 1,
            "perPage": 10,
            "data": []
        }));
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let server = get_seeded_server().await;

        for month in ["0", "13", "abc"] {
            let response = server
                .get(endpoints::ALL_TRANSACTIONS)
                .add_query_param("month", month)
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({ "message": "Invalid month number" }));
        }

        let response = server.get(endpoints::ALL_TRANSACTIONS).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_pagination_is_bad_request() {
        let server = get_seeded_server().await;

        for (param, value) in [("page", "0"), ("perPage", "-1"), ("page", "two")] {
            let response = server
                .get(endpoints::ALL_TRANSACTIONS)
                .add_query_param("month", 3)
                .add_query_param(param, value)
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({ "message": "Invalid pagination parameters" }));
        }
    }

    #[tokio::test]
    async fn validates_before_touching_the_store() {
        let server = get_test_server(TransactionsState {
            transaction_store: FailingStore::always(),
            pagination_config: PaginationConfig::default(),
        });

        let response = server
            .get(endpoints::ALL_TRANSACTIONS)
            .add_query_param("month", 3)
            .add_query_param("page", 0)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_failure_is_internal_server_error() {
        for call in [StoreCall::Find, StoreCall::Count] {
            let server = get_test_server(TransactionsState {
                transaction_store: FailingStore::on(call),
                pagination_config: PaginationConfig::default(),
            });

            let response = server
                .get(endpoints::ALL_TRANSACTIONS)
                .add_query_param("month", 3)
                .await;

            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            response.assert_json(&json!({ "message": "Failed to list transactions" }));
        }
    }

    #[tokio::test]
    async fn uses_configured_default_page_size() {
        let store = get_test_store();
        insert(
            &*store,
            (0..3)
                .map(|i| {
                    Transaction::build(&format!("Item {i}"), 1.0, datetime!(2022-06-01 00:00 UTC))
                })
                .collect(),
        )
        .await;
        let server = get_test_server(TransactionsState {
            transaction_store: store,
            pagination_config: PaginationConfig {
                default_page: 1,
                default_page_size: 2,
            },
        });

        let response = server
            .get(endpoints::ALL_TRANSACTIONS)
            .add_query_param("month", 6)
            .await;

        let body: Value = response.json();
        assert_eq!(body["perPage"], 2);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(titles(&body), ["Item 0", "Item 1"]);
    }
}
