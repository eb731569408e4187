//! Reports a vote to the collector with a plain GET, the one request shape
//! that crosses origins without a preflight. Only the outcome matters; the
//! response body is never read.

use crate::error::BeaconError;
use crate::models::field::{FieldSet, FieldValue};
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use std::time::Duration;

pub const VOTE_KEY: &str = "v";
pub const IDENTITY_KEY: &str = "p";

#[async_trait]
pub trait Beacon: Send + Sync {
    async fn send(&self, vote: bool, fields: FieldSet, identity: &str) -> Result<(), BeaconError>;
}

/// Adds the reserved vote and identity keys, overriding respondent fields of
/// the same name.
pub fn with_reserved_fields(mut fields: FieldSet, vote: bool, identity: &str) -> FieldSet {
    fields.set(VOTE_KEY, vote);
    fields.set(IDENTITY_KEY, identity);
    fields
}

/// `url?k=urlencode(json(value))&...`
pub fn build_url(base_url: &str, fields: &FieldSet) -> Result<String, BeaconError> {
    let mut components = Vec::with_capacity(fields.len());
    for (key, value) in fields.iter() {
        let json = encode_value(value).map_err(|source| BeaconError::Encode {
            field: key.to_owned(),
            source,
        })?;
        components.push(format!(
            "{}={}",
            urlencoding::encode(key),
            urlencoding::encode(&json)
        ));
    }
    Ok(format!("{}?{}", base_url, components.join("&")))
}

/// JSON text for one value. Whole numbers are written without a fraction
/// (`0`, not `0.0`), matching how browsers stringify them.
fn encode_value(value: &FieldValue) -> Result<String, serde_json::Error> {
    match value {
        FieldValue::Number(n)
            if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 =>
        {
            serde_json::to_string(&serde_json::Number::from(*n as i64))
        }
        other => serde_json::to_string(other),
    }
}

#[derive(Debug, Clone)]
pub struct HttpBeacon {
    client: Client,
    base_url: String,
}

impl HttpBeacon {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Beacon for HttpBeacon {
    async fn send(&self, vote: bool, fields: FieldSet, identity: &str) -> Result<(), BeaconError> {
        let fields = with_reserved_fields(fields, vote, identity);
        let url = build_url(&self.base_url, &fields)?;
        debug!("Sending feedback beacon: {}", url);

        let resp = self.client.get(&url).send().await?;
        if resp.status().is_success() {
            info!("Feedback for {} delivered", identity);
            Ok(())
        } else {
            error!("Collector rejected feedback for {}: {}", identity, resp.status());
            Err(BeaconError::Status(resp.status()))
        }
    }
}
