//! A small expression tree for selecting transactions.
//!
//! Filters are built by the request handlers and translated by each store
//! into its own query language.

use crate::{database_id::TransactionId, month::MonthNumber};

/// A boolean predicate over transaction fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every transaction.
    All,
    /// Matches when every inner filter matches. Empty matches everything.
    And(Vec<Filter>),
    /// Matches when any inner filter matches. Empty matches nothing.
    Or(Vec<Filter>),
    /// Matches when the field equals the value.
    Equals(Field, Value),
    /// Matches when the field's text contains the string, ignoring ASCII case.
    ///
    /// The string is matched literally.
    Contains(Field, String),
}

/// The transaction fields that a [Filter] can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The transaction ID.
    Id,
    /// The product title.
    Title,
    /// The product description.
    Description,
    /// The price. As text, whole prices have no fractional part, e.g. `150`.
    Price,
    /// Whether the product was sold.
    Sold,
    /// The month (1-12) of the UTC sale date, ignoring the year.
    MonthOfSale,
}

/// A literal to compare a [Field] against.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer.
    Integer(i64),
    /// A floating point number.
    Real(f64),
    /// A boolean.
    Bool(bool),
}

impl Filter {
    /// Select transactions sold in `month` of any year.
    pub fn month_of_sale(month: MonthNumber) -> Self {
        Filter::Equals(Field::MonthOfSale, Value::Integer(month.get().into()))
    }

    /// Select transactions sold in `month`, or every transaction when `month` is `None`.
    pub fn optional_month_of_sale(month: Option<MonthNumber>) -> Self {
        month.map_or(Filter::All, Self::month_of_sale)
    }

    /// Select transactions by their sold flag.
    pub fn sold(sold: bool) -> Self {
        Filter::Equals(Field::Sold, Value::Bool(sold))
    }

    /// Select the transaction with the given ID.
    pub fn id(id: TransactionId) -> Self {
        Filter::Equals(Field::Id, Value::Integer(id))
    }

    /// Combine two filters so that both must match.
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, other) => other,
            (filter, Filter::All) => filter,
            (Filter::And(mut filters), other) => {
                filters.push(other);
                Filter::And(filters)
            }
            (filter, other) => Filter::And(vec![filter, other]),
        }
    }
}
