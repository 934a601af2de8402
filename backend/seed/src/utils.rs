use serde_json::Value;

use crate::Document;

pub const PRIMARY_KEY: &str = "id";

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Returns how many documents received an id.
pub fn assign_ids(documents: &mut [Document]) -> usize {
    let mut assigned = 0;

    for (position, document) in documents.iter_mut().enumerate() {
        if document.contains_key(PRIMARY_KEY) {
            continue;
        }

        document.insert(PRIMARY_KEY.to_string(), Value::from(position));
        assigned += 1;
    }

    assigned
}
