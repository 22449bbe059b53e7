//! Builds the filter for the transactions list from the selected month and search text.

use crate::{
    month::MonthNumber,
    stores::{Field, Filter, Value},
};

/// Select transactions sold in `month` of any year that match `search_text`.
///
/// Blank search text selects every transaction in the month. Otherwise a
/// transaction matches when its title or description contains the trimmed
/// text ignoring case, its price equals the text as a number, or its price
/// as text contains the text (e.g. "50" matches 150 and 501).
pub fn build_transaction_filter(month: MonthNumber, search_text: &str) -> Filter {
    let month_filter = Filter::month_of_sale(month);
    let search_text = search_text.trim();

    if search_text.is_empty() {
        return month_filter;
    }

    let mut search_filters = vec![
        Filter::Contains(Field::Title, search_text.to_owned()),
        Filter::Contains(Field::Description, search_text.to_owned()),
    ];

    if let Some(price) = search_text
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
    {
        search_filters.push(Filter::Equals(Field::Price, Value::Real(price)));
    }

    search_filters.push(Filter::Contains(Field::Price, search_text.to_owned()));

    month_filter.and(Filter::Or(search_filters))
}
