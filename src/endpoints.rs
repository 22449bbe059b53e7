//! The API endpoints URIs.

/// The route that seeds the store from the seed source.
pub const SEED_DATA: &str = "/api/v1/seed-data";
/// The route for listing and searching a month's transactions.
pub const ALL_TRANSACTIONS: &str = "/api/v1/all-transactions";
/// The route for a month's sale statistics.
pub const STATISTICS: &str = "/api/v1/statistics";
/// The route for the number of transactions per price range.
pub const BAR_CHART_DATA: &str = "/api/v1/bar-chart-data";
/// The route for the number of transactions per category.
pub const PIE_CHART_DATA: &str = "/api/v1/pie-chart-data";
/// The route for the statistics, bar chart and pie chart data in one response.
pub const COMBINED_DATA: &str = "/api/v1/combined-data";
/// The route for deleting a transaction.
pub const DELETE_TRANSACTION: &str = "/api/v1/delete";
