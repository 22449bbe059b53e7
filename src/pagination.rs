//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The 1-based page number.
    pub number: u64,
    /// The number of records per page.
    pub size: u64,
}

impl Page {
    /// Parse the page number and page size from raw query values, falling back
    /// to the defaults in `config` for missing values.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] if either value is present but not a
    /// positive integer.
    pub fn parse(
        page: Option<&str>,
        per_page: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let number = parse_positive(page, config.default_page)?;
        let size = parse_positive(per_page, config.default_page_size)?;

        Ok(Self { number, size })
    }

    /// The number of records before this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }

    /// The number of pages needed to show `total_records`.
    pub fn page_count(&self, total_records: u64) -> u64 {
        total_records.div_ceil(self.size)
    }
}

fn parse_positive(text: Option<&str>, default: u64) -> Result<u64, Error> {
    let Some(text) = text else {
        return Ok(default);
    };

    match text.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(Error::InvalidPagination),
    }
}
