use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::RemoteSource;

/// Everything that can stop a scaffold from landing on disk.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("remote answered {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Downloads scaffold archives from the remote source.
pub struct ApiClient {
    client: reqwest::Client,
    source: RemoteSource,
}

impl ApiClient {
    pub fn new(source: RemoteSource) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("create-kapp"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(source, client))
    }

    pub fn with_client(source: RemoteSource, client: reqwest::Client) -> Self {
        Self { client, source }
    }

    /// Fetches the whole archive for `template` into memory.
    pub async fn fetch_archive(&self, template: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.source.archive_url(template);
        tracing::debug!(%url, "requesting scaffold archive");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        tracing::debug!(bytes = body.len(), "archive downloaded");
        Ok(body.to_vec())
    }
}
