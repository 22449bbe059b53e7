//! The statistics, bar chart and pie chart data of a month in one response.

use std::time::Duration;

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    Error,
    month::{MonthNumber, MonthQuery},
    stores::TransactionStore,
};

use super::{
    DashboardState,
    bar_chart::{BarChart, get_bar_chart},
    pie_chart::{CategoryCount, get_pie_chart},
    statistics::{Statistics, get_statistics},
};

/// Everything the dashboard shows for a month.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// The sale statistics.
    pub statistics_data: Statistics,
    /// The number of transactions per price range.
    pub bar_chart_data: BarChart,
    /// The number of transactions per category.
    pub pie_chart_data: Vec<CategoryCount>,
}

/// A route handler for the statistics, bar chart and pie chart data of a month.
///
/// Responds with 500 if any part fails or the parts take longer than the
/// fan-out timeout. Partial results are never returned.
pub async fn get_combined_data_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let combined = match MonthNumber::parse_required(query.month.as_deref()) {
        Ok(month) => {
            get_combined_data(
                month,
                state.transaction_store.as_ref(),
                state.fan_out_timeout,
            )
            .await
        }
        Err(error) => Err(error),
    };

    match combined {
        Ok(combined) => Json(combined).into_response(),
        Err(error) => error.into_json_response("Failed to fetch combined data"),
    }
}

/// Compute the three parts concurrently, failing as soon as any part fails.
async fn get_combined_data(
    month: MonthNumber,
    store: &dyn TransactionStore,
    timeout: Duration,
) -> Result<CombinedData, Error> {
    let all_parts = async {
        tokio::try_join!(
            get_statistics(month, store),
            get_bar_chart(Some(month), store),
            get_pie_chart(Some(month), store),
        )
    };

    let (statistics_data, bar_chart_data, pie_chart_data) =
        tokio::time::timeout(timeout, all_parts)
            .await
            .map_err(|_| Error::Timeout(timeout))??;

    Ok(CombinedData {
        statistics_data,
        bar_chart_data,
        pie_chart_data,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        dashboard::test_utils::{get_test_server, get_test_server_with_timeout},
        endpoints,
        test_utils::{FailingStore, StoreCall, get_test_store, insert},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn merges_all_three_parts() {
        let store = get_test_store();
        insert(
            &*store,
            vec![
                Transaction::build("Ring", 50.0, datetime!(2021-09-01 12:00 UTC))
                    .category("jewelery")
                    .sold(true),
                Transaction::build("Laptop", 950.0, datetime!(2021-09-20 12:00 UTC))
                    .category("electronics"),
                Transaction::build("Shirt", 22.3, datetime!(2021-10-05 12:00 UTC))
                    .category("men's clothing")
                    .sold(true),
            ],
        )
        .await;
        let server = get_test_server(store);

        let response = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", 9)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["statisticsData"],
            json!({ "totalSaleAmount": 50.0, "totalSoldItems": 1, "totalNotSoldItems": 1 })
        );
        assert_eq!(body["barChartData"]["0-100"], 1);
        assert_eq!(body["barChartData"]["901-above"], 1);
        assert_eq!(body["barChartData"].as_object().map(|map| map.len()), Some(10));
        assert_eq!(
            body["pieChartData"],
            json!([
                { "category": "electronics", "count": 1 },
                { "category": "jewelery", "count": 1 }
            ])
        );
    }

    #[tokio::test]
    async fn any_failing_part_fails_the_whole() {
        for call in [
            StoreCall::Count,
            StoreCall::AggregateNothing,
            StoreCall::AggregatePriceRange,
            StoreCall::AggregateCategory,
        ] {
            let server = get_test_server(FailingStore::on(call));

            let response = server
                .get(endpoints::COMBINED_DATA)
                .add_query_param("month", 9)
                .await;

            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            response.assert_json(&json!({ "message": "Failed to fetch combined data" }));
        }
    }

    #[tokio::test]
    async fn slow_part_times_out() {
        let server = get_test_server_with_timeout(
            FailingStore::hanging_on(StoreCall::AggregateCategory),
            Duration::from_millis(50),
        );

        let response = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", 9)
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "message": "Failed to fetch combined data" }));
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let server = get_test_server(get_test_store());

        for month in ["0", "13", "abc", ""] {
            let response = server
                .get(endpoints::COMBINED_DATA)
                .add_query_param("month", month)
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({ "message": "Invalid month number" }));
        }

        let response = server.get(endpoints::COMBINED_DATA).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
