//! # Meilisearch
//!
//! Document store holding the insights dataset.
//!
//! ## Requirements
//!
//! - Read only from the server's point of view, the `seed` tool is the only writer
//! - Every document goes out verbatim, no projection or reshaping
//! - ~1000 documents, so reading the whole index per request is fine
//!
//! ## Implementation
//!
//! - One index (`DATA_INDEX`, default `data`), primary key `id`
//! - Meilisearch caps document reads per call, so [`DocumentStore::fetch_all`] walks the index in
//!   pages of [`PAGE_SIZE`] until it has read `total` documents
//! - Paging stays internal, `GET /api/data` always answers with the full array
//!
//! ## Commands
//!
//! Count documents.
//! ```sh
//! curl -H "Authorization: Bearer $(cat /run/secrets/MEILI_ADMIN_KEY)" http://localhost:7700/indexes/data/stats
//! ```
use meilisearch_sdk::{client::Client, documents::DocumentsQuery};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AppError;

pub const PAGE_SIZE: usize = 1000;

pub type Document = Map<String, Value>;

pub struct DocumentStore {
    client: Client,
    index: String,
}

impl DocumentStore {
    pub fn connect(meili_url: &str, meili_key: Option<&str>, index: &str) -> Result<Self, AppError> {
        let client = Client::new(meili_url, meili_key)?;

        Ok(Self {
            client,
            index: index.to_string(),
        })
    }

    pub async fn fetch_all(&self) -> Result<Vec<Document>, AppError> {
        let index = self.client.index(&self.index);
        let mut documents = Vec::new();
        let mut offset = 0;

        loop {
            let mut query = DocumentsQuery::new(&index);
            query.with_offset(offset).with_limit(PAGE_SIZE);

            let page = query.execute::<Document>().await?;
            let fetched = page.results.len();
            documents.extend(page.results);

            debug!("Read {fetched} documents at offset {offset} of {}", page.total);

            match next_offset(offset, fetched, page.total as usize) {
                Some(next) => offset = next,
                None => break,
            }
        }

        Ok(documents)
    }

    pub async fn is_healthy(&self) -> bool {
        self.client.is_healthy().await
    }
}

fn next_offset(offset: usize, fetched: usize, total: usize) -> Option<usize> {
    let next = offset + fetched;

    (fetched > 0 && next < total).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::{PAGE_SIZE, next_offset};

    #[test]
    fn test_single_page() {
        assert_eq!(next_offset(0, 3, 3), None);
        assert_eq!(next_offset(0, 0, 0), None);
    }

    #[test]
    fn test_multiple_pages() {
        assert_eq!(next_offset(0, PAGE_SIZE, 2500), Some(1000));
        assert_eq!(next_offset(1000, PAGE_SIZE, 2500), Some(2000));
        assert_eq!(next_offset(2000, 500, 2500), None);
    }

    #[test]
    fn test_stops_on_short_read() {
        // index shrank between pages
        assert_eq!(next_offset(1000, 0, 2500), None);
    }
}
