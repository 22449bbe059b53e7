//! The number of transactions in each price range, for the dashboard's bar chart.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    Error,
    month::{MonthNumber, MonthQuery},
    stores::{Aggregation, Filter, GroupKey, PriceRange, TransactionStore},
};

use super::DashboardState;

/// The label for prices above the last bucket.
const ABOVE_LABEL: &str = "901-above";

/// The bar chart's price buckets, in display order.
///
/// Prices above 900, and a price of exactly 0, are in no bucket and go to [ABOVE_LABEL].
static PRICE_BUCKETS: [PriceRange; 9] = [
    bucket("0-100", Some(0.0), 100.0),
    bucket("101-200", Some(100.0), 200.0),
    bucket("201-300", Some(200.0), 300.0),
    bucket("301-400", Some(300.0), 400.0),
    bucket("401-500", Some(400.0), 500.0),
    bucket("501-600", Some(500.0), 600.0),
    bucket("601-700", Some(600.0), 700.0),
    bucket("701-800", Some(700.0), 800.0),
    bucket("801-900", Some(800.0), 900.0),
];

const fn bucket(label: &'static str, above: Option<f64>, up_to: f64) -> PriceRange {
    PriceRange {
        label,
        above,
        up_to,
    }
}

/// The count for every bucket label, in display order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart(Vec<(&'static str, u64)>);

impl BarChart {
    /// The count for `label`, if it is a bucket label.
    #[cfg(test)]
    fn count(&self, label: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(bucket_label, _)| *bucket_label == label)
            .map(|(_, count)| *count)
    }
}

impl Serialize for BarChart {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// A route handler for the number of transactions per price range.
///
/// Counts every transaction when no month is given.
pub async fn get_bar_chart_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let bar_chart = match MonthNumber::parse_optional(query.month.as_deref()) {
        Ok(month) => get_bar_chart(month, state.transaction_store.as_ref()).await,
        Err(error) => Err(error),
    };

    match bar_chart {
        Ok(bar_chart) => Json(bar_chart).into_response(),
        Err(error) => error.into_json_response("Failed to fetch bar chart data"),
    }
}

/// Count the transactions sold in `month`, or all transactions, in each price bucket.
///
/// Buckets without transactions have a count of zero.
pub(super) async fn get_bar_chart(
    month: Option<MonthNumber>,
    store: &dyn TransactionStore,
) -> Result<BarChart, Error> {
    let groups = store
        .aggregate(&Aggregation {
            filter: Filter::optional_month_of_sale(month),
            group_by: GroupKey::PriceRange {
                ranges: &PRICE_BUCKETS,
                otherwise: ABOVE_LABEL,
            },
        })
        .await?;

    let counts = PRICE_BUCKETS
        .iter()
        .map(|bucket| bucket.label)
        .chain([ABOVE_LABEL])
        .map(|label| {
            let count = groups
                .iter()
                .find(|group| group.key.as_deref() == Some(label))
                .map_or(0, |group| group.count);

            (label, count)
        })
        .collect();

    Ok(BarChart(counts))
}
