//! Transactions, the product sale records served by the application.
//!
//! This module contains the `Transaction` model, the filter used to list and
//! search a month's transactions, and the route handlers for listing and
//! deleting transactions.

mod delete_endpoint;
mod list_endpoint;
mod models;
mod query;

pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use models::{Transaction, TransactionBuilder};
pub use query::build_transaction_filter;
