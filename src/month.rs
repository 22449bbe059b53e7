//! The calendar month query parameter shared by the list and dashboard endpoints.

use serde::Deserialize;

use crate::Error;

/// A month of the year, 1 (January) to 12 (December).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthNumber(u8);

impl MonthNumber {
    /// Parse a month number from a query string value.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `text` is not an integer from 1 to 12.
    pub fn parse(text: &str) -> Result<Self, Error> {
        text.trim()
            .parse::<u8>()
            .ok()
            .filter(|month| (1..=12).contains(month))
            .map(Self)
            .ok_or(Error::InvalidMonth)
    }

    /// Parse a month that must be present.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `text` is missing or invalid.
    pub fn parse_required(text: Option<&str>) -> Result<Self, Error> {
        text.ok_or(Error::InvalidMonth).and_then(Self::parse)
    }

    /// Parse a month that may be omitted.
    ///
    /// A missing or empty value means no month was selected.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if a non-empty `text` is invalid.
    pub fn parse_optional(text: Option<&str>) -> Result<Option<Self>, Error> {
        match text {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => Self::parse(text).map(Some),
        }
    }

    /// The month as a number from 1 to 12.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// The query parameters for endpoints that only take a month.
///
/// The month is kept as raw text so that invalid values produce the
/// application's own error message rather than the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The selected month, unparsed.
    pub month: Option<String>,
}
