use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::config::{InvalidPricingConfig, PricingConfig};
use crate::config::PricingSourceConfig;

const USER_AGENT: &str = concat!("cleanbook/", env!("CARGO_PKG_VERSION"));

/// Where a resolved snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Live snapshot served by the pricing service.
    Database,
    /// Compiled-in defaults.
    Config,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPricing {
    pub pricing: PricingConfig,
    pub source: ConfigSource,
    /// Why the fallback was used, when a fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

impl ResolvedPricing {
    pub fn is_fallback(&self) -> bool {
        self.source == ConfigSource::Config
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PricingFetchError {
    #[error("pricing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("pricing service answered with status {0}")]
    Status(u16),
    #[error("pricing payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] InvalidPricingConfig),
    #[error("pricing source unavailable: {0}")]
    Unavailable(String),
}

/// Remote store holding the active pricing row.
#[async_trait]
pub trait PricingSource: Send + Sync {
    /// Raw payload of the active configuration; `Ok(None)` when nothing is active.
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError>;
}

#[async_trait]
impl<T> PricingSource for Box<T>
where
    T: PricingSource + ?Sized,
{
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError> {
        (**self).fetch().await
    }
}

#[async_trait]
impl<T> PricingSource for Arc<T>
where
    T: PricingSource + ?Sized,
{
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError> {
        (**self).fetch().await
    }
}

/// GETs the pricing endpoint and hands back its JSON body.
#[derive(Debug, Clone)]
pub struct HttpPricingSource {
    http: Client,
    endpoint: Url,
}

impl HttpPricingSource {
    pub fn new(endpoint: Url) -> Result<Self, PricingFetchError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl PricingSource for HttpPricingSource {
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError> {
        let response = self.http.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(PricingFetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

/// Used when no endpoint is configured; every resolution takes the defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredPricingSource;

#[async_trait]
impl PricingSource for UnconfiguredPricingSource {
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError> {
        Ok(None)
    }
}

/// Picks the source matching the configured endpoint.
pub fn source_from_config(
    config: &PricingSourceConfig,
) -> Result<Box<dyn PricingSource>, PricingFetchError> {
    match &config.endpoint {
        Some(endpoint) => Ok(Box::new(HttpPricingSource::new(endpoint.clone())?)),
        None => Ok(Box::new(UnconfiguredPricingSource)),
    }
}

/// Resolves the effective pricing snapshot. Never fails: any problem with the
/// source downgrades to the fallback snapshot.
pub struct PricingConfigResolver<S> {
    source: S,
    fallback: Arc<PricingConfig>,
}

impl<S> PricingConfigResolver<S>
where
    S: PricingSource,
{
    pub fn new(source: S) -> Self {
        Self::with_fallback(source, Arc::new(PricingConfig::standard()))
    }

    pub fn with_fallback(source: S, fallback: Arc<PricingConfig>) -> Self {
        Self { source, fallback }
    }

    pub fn fallback(&self) -> &PricingConfig {
        &self.fallback
    }

    pub async fn resolve(&self) -> ResolvedPricing {
        match self.fetch_snapshot().await {
            Ok(Some(pricing)) => {
                info!(base_price = pricing.base_price, "resolved live pricing snapshot");
                ResolvedPricing {
                    pricing,
                    source: ConfigSource::Database,
                    advisory: None,
                }
            }
            Ok(None) => {
                debug!("pricing source has no active snapshot; using defaults");
                self.fallback_snapshot(None)
            }
            Err(err) => {
                warn!(error = %err, "pricing fetch failed; using defaults");
                self.fallback_snapshot(Some(err.to_string()))
            }
        }
    }

    fn fallback_snapshot(&self, advisory: Option<String>) -> ResolvedPricing {
        ResolvedPricing {
            pricing: PricingConfig::clone(&self.fallback),
            source: ConfigSource::Config,
            advisory,
        }
    }

    async fn fetch_snapshot(&self) -> Result<Option<PricingConfig>, PricingFetchError> {
        let Some(payload) = self.source.fetch().await? else {
            return Ok(None);
        };
        let Some(payload) = unwrap_payload(payload) else {
            return Ok(None);
        };

        let pricing: PricingConfig = serde_json::from_value(payload)?;
        pricing.validate()?;
        Ok(Some(pricing))
    }
}

// Accepts both a bare snapshot and the `{ "pricing": {...}, "source": ... }` envelope.
fn unwrap_payload(payload: Value) -> Option<Value> {
    let payload = match payload {
        Value::Object(mut map) if map.contains_key("pricing") => map.remove("pricing")?,
        other => other,
    };

    let empty = match &payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(raw) => raw.trim().is_empty(),
        _ => false,
    };
    (!empty).then_some(payload)
}
