//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get},
};

use crate::{
    AppState,
    dashboard::{
        get_bar_chart_endpoint, get_combined_data_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    seed::seed_data_endpoint,
    transaction::{delete_transaction_endpoint, list_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SEED_DATA, get(seed_data_endpoint))
        .route(endpoints::ALL_TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART_DATA, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART_DATA, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED_DATA, get(get_combined_data_endpoint))
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}
