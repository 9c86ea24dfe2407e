use crate::configuration::ApplicationSettings;
use crate::domain::LocationsDocument;
use crate::errors::error_chain_fmt;
use std::future::Future;

/// Where the binder gets its locations document from.
pub trait LocationSource {
    fn fetch(&self) -> impl Future<Output = Result<LocationsDocument, SourceError>> + Send;
}

#[derive(thiserror::Error)]
pub enum SourceError {
    #[error("Failed to request the locations document")]
    Request(#[from] reqwest::Error),
    #[error("Locations endpoint answered with status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
    #[error("Locations document is malformed")]
    Malformed(#[from] serde_json::Error),
}
impl std::fmt::Debug for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Fetches the locations document over HTTP.
#[derive(Clone, Debug)]
pub struct HttpLocationSource {
    http_client: reqwest::Client,
    url: String,
}

impl HttpLocationSource {
    pub fn new(http_client: reqwest::Client, url: String) -> Self {
        Self { http_client, url }
    }

    pub fn from_settings(settings: &ApplicationSettings) -> Result<Self, SourceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self::new(builder.build()?, settings.locations_url()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LocationSource for HttpLocationSource {
    #[tracing::instrument(name = "Fetching locations document", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<LocationsDocument, SourceError> {
        let response = self.http_client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus(status));
        }

        // A body that fails to decode is `Malformed`, not a `Request` error.
        let body = response.bytes().await?;
        let document: LocationsDocument = serde_json::from_slice(&body)?;

        tracing::info!(locations = document.len(), "Fetched locations document");
        Ok(document)
    }
}

impl LocationSource for LocationsDocument {
    async fn fetch(&self) -> Result<LocationsDocument, SourceError> {
        Ok(self.clone())
    }
}
