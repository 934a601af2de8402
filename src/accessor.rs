use std::future::Future;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::record::Record;

pub const DATA_PATH: &str = "/api/data";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("Malformed dataset: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Where the session loads its raw dataset from.
pub trait RecordSource {
    fn fetch_all_records(&self) -> impl Future<Output = Result<Vec<Record>, FetchError>> + Send;
}

pub struct HttpRecordSource {
    client: Client,
    url: String,
}

impl HttpRecordSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}{DATA_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RecordSource for HttpRecordSource {
    async fn fetch_all_records(&self) -> Result<Vec<Record>, FetchError> {
        debug!("Fetching dataset from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let records: Vec<Record> = response.json().await.map_err(FetchError::Decode)?;
        info!("Fetched {} records", records.len());

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::HttpRecordSource;

    #[test]
    fn test_url_joins_base() {
        assert_eq!(
            HttpRecordSource::new("http://localhost:1111").url(),
            "http://localhost:1111/api/data"
        );
        assert_eq!(
            HttpRecordSource::new("http://localhost:1111/").url(),
            "http://localhost:1111/api/data"
        );
    }
}
