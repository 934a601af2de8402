use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

use crate::error::AppError;

pub struct Config {
    pub port: u16,
    pub meili_url: String,
    pub meili_key: Option<String>,
    pub data_index: String,
    pub allowed_origin: String,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            meili_url: try_load("MEILI_URL", "http://meilisearch:7700")?,
            meili_key: read_secret("MEILI_ADMIN_KEY"),
            data_index: try_load("DATA_INDEX", "data")?,
            allowed_origin: try_load("ALLOWED_ORIGIN", "*")?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");

        AppError::Config {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Docker secret first, then the plain environment variable.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => Some(secret.trim().to_string()),
        Err(e) => {
            warn!("Failed to read {secret_name} from file: {e}");

            var(secret_name).or_else(|| {
                warn!("{secret_name} not set, connecting without a key");
                None
            })
        }
    }
}
