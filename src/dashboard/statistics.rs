//! The total sale amount and the number of sold and unsold items in a month.

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

/// Sale statistics for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of the sold items.
    pub total_sale_amount: f64,
    /// The number of sold items.
    pub total_sold_items: u64,
    /// The number of items that have not sold.
    pub total_not_sold_items: u64,
}

/// A route handler for the sale statistics of a month.
pub async fn get_statistics_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let statistics = match MonthNumber::parse_required(query.month.as_deref()) {
        Ok(month) => get_statistics(month, state.transaction_store.as_ref()).await,
        Err(error) => Err(error),
    };

    match statistics {
        Ok(statistics) => Json(statistics).into_response(),
        Err(error) => error.into_json_response("Failed to fetch statistics"),
    }
}

/// Compute the statistics for the transactions sold in `month` of any year.
pub(super) async fn get_statistics(
    month: MonthNumber,
    store: &dyn TransactionStore,
) -> Result<Statistics, Error> {
    let month_filter = Filter::month_of_sale(month);
    let sold_filter = month_filter.clone().and(Filter::sold(true));

    let total_sold_items = store.count(&sold_filter).await?;
    let total_not_sold_items = store
        .count(&month_filter.and(Filter::sold(false)))
        .await?;
    let total_sale_amount = store
        .aggregate(&Aggregation {
            filter: sold_filter,
            group_by: GroupKey::Nothing,
        })
        .await?
        .first()
        .map_or(0.0, |group| group.price_sum);

    Ok(Statistics {
        total_sale_amount,
        total_sold_items,
        total_not_sold_items,
    })
}
