//! # Dataset Seeding
//!
//! Loads the insights dataset into Meilisearch so the server has something to serve.
//!
//! ## Input
//! - A JSON array of objects, from a local file or an `http(s)` URL
//! - Typically a collection export, so documents may carry an `_id` object that Meilisearch cannot
//!   use as a primary key
//!
//! ## Steps
//! 1. Read the array.
//!
//! 2. Give every document without an `id` its position in the array as `id`. Nothing else is touched,
//!    the server hands documents out verbatim.
//!
//! 3. Upload in batches, waiting on each indexing task so a failure stops the run with the batch it
//!    happened in.
//!
//! ## Notes
//! - Re-running with the same file is safe, `add_or_update` replaces documents by `id`
//! - Positions only stay stable if the file does, so reseed from the same export
use std::{fs, time::Duration};

use anyhow::{Context, Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use meilisearch_sdk::client::Client;
use serde_json::{Map, Value};
use tracing::info;

pub mod utils;

use utils::{PRIMARY_KEY, assign_ids, is_remote};

pub type Document = Map<String, Value>;

pub async fn load_dataset(source: &str) -> Result<Vec<Document>> {
    let text = if is_remote(source) {
        reqwest::get(source)
            .await
            .with_context(|| format!("Request failed for {source}"))?
            .error_for_status()
            .with_context(|| format!("HTTP error for {source}"))?
            .text()
            .await
            .with_context(|| format!("Reading body of {source}"))?
    } else {
        fs::read_to_string(source).with_context(|| format!("Reading {source}"))?
    };

    parse_dataset(&text).with_context(|| format!("Decoding JSON from {source}"))
}

pub fn parse_dataset(text: &str) -> Result<Vec<Document>> {
    let value: Value = serde_json::from_str(text)?;

    let Value::Array(items) = value else {
        bail!("expected a JSON array of documents");
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::Object(document) => Ok(document),
            other => Err(anyhow!("item {position} is not an object: {other}")),
        })
        .collect()
}

pub async fn seed(client: &Client, index_name: &str, mut documents: Vec<Document>, batch: usize) -> Result<usize> {
    let assigned = assign_ids(&mut documents);
    info!("Assigned ids to {assigned} of {} documents", documents.len());

    let index = client.index(index_name);
    let batch = batch.max(1);

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    for (number, chunk) in documents.chunks(batch).enumerate() {
        pb.set_message(format!("Batch {}", number + 1));

        let task = index
            .add_or_update(chunk, Some(PRIMARY_KEY))
            .await?
            .wait_for_completion(client, None, Some(Duration::from_secs(60)))
            .await?;

        if task.is_failure() {
            pb.abandon_with_message("Failed");
            bail!("indexing batch {} into {index_name} failed: {task:?}", number + 1);
        }

        pb.inc(chunk.len() as u64);
    }

    pb.finish_with_message("Done");

    Ok(documents.len())
}
