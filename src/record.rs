//! # Records
//!
//! One entry of the insights dataset, as served by `GET /api/data`.
//!
//! Nothing on a record is required. Exports of this dataset are loose about
//! numbers: a missing score shows up as an absent key, `null`, or `""`, and a
//! few rows carry numbers as strings. All of those deserialize cleanly, and
//! anything that is not a finite number is treated as absent.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub pestle: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub country: Option<String>,

    #[serde(default, deserialize_with = "loose_number")]
    pub intensity: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub likelihood: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub relevance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "loose_number", skip_serializing_if = "Option::is_none")]
    pub start_year: Option<f64>,
    #[serde(default, deserialize_with = "loose_number", skip_serializing_if = "Option::is_none")]
    pub end_year: Option<f64>,
    #[serde(default, deserialize_with = "loose_number", skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(number.filter(|n| n.is_finite()))
}
