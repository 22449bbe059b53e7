//! The number of transactions in each category, for the dashboard's pie chart.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    Error,
    month::{MonthNumber, MonthQuery},
    stores::{Aggregation, Filter, GroupKey, TransactionStore},
};

use super::DashboardState;

/// The number of transactions in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// The category name.
    pub category: String,
    /// The number of transactions in the category.
    pub count: u64,
}

/// A route handler for the number of transactions per category.
///
/// Counts every transaction when no month is given.
pub async fn get_pie_chart_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let pie_chart = match MonthNumber::parse_optional(query.month.as_deref()) {
        Ok(month) => get_pie_chart(month, state.transaction_store.as_ref()).await,
        Err(error) => Err(error),
    };

    match pie_chart {
        Ok(pie_chart) => Json(pie_chart).into_response(),
        Err(error) => error.into_json_response("Failed to fetch pie chart data"),
    }
}

/// Count the transactions sold in `month`, or all transactions, per category.
///
/// Only categories with transactions are included, ordered by name.
pub(super) async fn get_pie_chart(
    month: Option<MonthNumber>,
    store: &dyn TransactionStore,
) -> Result<Vec<CategoryCount>, Error> {
    let groups = store
        .aggregate(&Aggregation {
            filter: Filter::optional_month_of_sale(month),
            group_by: GroupKey::Category,
        })
        .await?;

    Ok(groups
        .into_iter()
        .map(|group| CategoryCount {
            category: group.key.unwrap_or_default(),
            count: group.count,
        })
        .collect())
}
