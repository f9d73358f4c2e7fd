use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::analysis;
use crate::types::{AnalysisResult, RefreshError};

/// 数据来源：HTTP 地址或本地 JSON 文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Http(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Http(url) => f.write_str(url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// 取数错误
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Response from {location} is not valid JSON: {source}")]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Performs the single GET (or file read) per refresh cycle.
pub struct DataFetcher {
    source: DataSource,
    http: reqwest::Client,
}

impl DataFetcher {
    pub fn new(source: DataSource, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { source, http })
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetches the raw payload. Shape validation is left to the analyzer.
    pub async fn fetch_payload(&self) -> Result<Value, FetchError> {
        let bytes = match &self.source {
            DataSource::Http(url) => self.fetch_http(url).await?,
            DataSource::File(path) => tokio::fs::read(path).await.map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?,
        };

        debug!("Fetched {} bytes from {}", bytes.len(), self.source);

        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            location: self.source.to_string(),
            source,
        })
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        Ok(body.to_vec())
    }
}

/// 一次完整的刷新：取数后分析
pub async fn refresh_once(fetcher: &DataFetcher) -> Result<AnalysisResult, RefreshError> {
    let payload = fetcher.fetch_payload().await?;
    Ok(analysis::analyze(&payload)?)
}
