//! Where seed data comes from.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;

use crate::Error;

/// The product listing used to seed a fresh deployment.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Provides the raw body of the seed data.
#[async_trait]
pub trait SeedSource: Debug + Send + Sync {
    /// Fetch the seed data as text, expected to hold a JSON array.
    ///
    /// # Errors
    /// Returns [Error::SeedFetchError] if the data could not be retrieved.
    async fn fetch(&self) -> Result<String, Error>;
}

/// Fetches seed data with an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSeedSource {
    /// Create a source that downloads `url`, giving up after `timeout`.
    ///
    /// # Errors
    /// Returns [Error::SeedFetchError] if the HTTP client could not be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::SeedFetchError(error.to_string()))?;

        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<String, Error> {
        tracing::info!("Fetching seed data from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::SeedFetchError(error.to_string()))?;

        response
            .text()
            .await
            .map_err(|error| Error::SeedFetchError(error.to_string()))
    }
}
