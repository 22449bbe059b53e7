//! Grouped summaries over filtered transactions.

use super::Filter;

/// Match transactions with `filter`, group them by `group_by`, and count and
/// sum the prices in each group.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Selects the transactions to summarise.
    pub filter: Filter,
    /// How to group the selected transactions.
    pub group_by: GroupKey,
}

/// The key that transactions are grouped by.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKey {
    /// A single group holding every selected transaction, present even when
    /// nothing matched. Its key is `None`.
    Nothing,
    /// One group per distinct category.
    Category,
    /// One group per price range label. Ranges are tested in order and the
    /// first match wins; unmatched prices go to `otherwise`.
    PriceRange {
        /// The ranges to test.
        ranges: &'static [PriceRange],
        /// The label for prices outside every range.
        otherwise: &'static str,
    },
}

/// A labelled price interval `above < price <= up_to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// The label used as the group key.
    pub label: &'static str,
    /// The exclusive lower bound, or `None` for no lower bound.
    pub above: Option<f64>,
    /// The inclusive upper bound.
    pub up_to: f64,
}

/// One row of an aggregation result.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// The group key, `None` for [GroupKey::Nothing].
    pub key: Option<String>,
    /// The number of transactions in the group.
    pub count: u64,
    /// The sum of the prices in the group, 0 for an empty group.
    pub price_sum: f64,
}
