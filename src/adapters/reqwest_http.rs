//! Reqwest-based HTTP client adapter.
//!
//! This module provides the production HTTP client implementation using
//! reqwest, implementing the [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};

use crate::config::AnalyzerConfig;
use crate::traits::{ByteStream, FilePart, HttpClient, HttpError};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use apidrift::adapters::ReqwestHttpClient;
/// use apidrift::config::AnalyzerConfig;
///
/// let client = ReqwestHttpClient::from_config(&AnalyzerConfig::from_env())?;
/// let body = client.post_multipart_stream(&url, parts).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client honouring the configured connect timeout.
    ///
    /// No overall request timeout is set: the analysis response streams for
    /// as long as the model keeps generating.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| HttpError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Build the multipart form from file parts.
    fn build_form(parts: Vec<FilePart>) -> Form {
        parts.into_iter().fold(Form::new(), |form, part| {
            let file = Part::bytes(part.content.to_vec()).file_name(part.file_name);
            form.part(part.field, file)
        })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_multipart_stream(
        &self,
        url: &str,
        parts: Vec<FilePart>,
    ) -> Result<ByteStream, HttpError> {
        let response = self
            .client
            .post(url)
            .header("Accept", "text/event-stream")
            .multipart(Self::build_form(parts))
            .send()
            .await
            .map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            };
            return Err(HttpError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(e.to_string())
                } else {
                    HttpError::Io(e.to_string())
                }
            })
        });

        Ok(Box::pin(stream))
    }
}
