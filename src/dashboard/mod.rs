//! Dashboard module
//!
//! Provides the monthly sale statistics and the data behind the dashboard's
//! bar and pie charts, separately or combined into one response.

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;

use crate::{AppState, stores::TransactionStore};

mod bar_chart;
mod combined;
mod pie_chart;
mod statistics;

pub use bar_chart::get_bar_chart_endpoint;
pub use combined::get_combined_data_endpoint;
pub use pie_chart::get_pie_chart_endpoint;
pub use statistics::get_statistics_endpoint;

/// The state needed for the dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store to summarise transactions from.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The time limit for computing the combined data.
    pub fan_out_timeout: Duration,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            fan_out_timeout: state.fan_out_timeout,
        }
    }
}
