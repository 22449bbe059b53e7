use std::sync::Arc;

use async_trait::async_trait;

use crate::{Error, seed::SeedSource};

/// A seed source that returns a fixed body, or fails when it has none.
#[derive(Debug)]
pub(crate) struct StaticSeedSource {
    body: Option<String>,
}

impl StaticSeedSource {
    pub(crate) fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Some(body.to_owned()),
        })
    }

    pub(crate) fn unavailable() -> Arc<Self> {
        Arc::new(Self { body: None })
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch(&self) -> Result<String, Error> {
        self.body
            .clone()
            .ok_or_else(|| Error::SeedFetchError("connection refused".to_owned()))
    }
}
