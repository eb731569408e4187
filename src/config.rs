use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_COLLECTOR_URL: &str = "http://deluge.us-east-1.elasticbeanstalk.com/";
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60 * 60 * 24 * 30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Host-supplied settings for one widget.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    #[serde(rename = "collectorUrl")]
    pub collector_url: String,
    #[serde(rename = "cooldownSecs", with = "secs")]
    pub cooldown: Duration,
    #[serde(rename = "requestTimeoutSecs", with = "secs")]
    pub request_timeout: Duration,
    /// Where durable vote memory lives; `None` keeps votes for the session only.
    #[serde(rename = "storagePath")]
    pub storage_path: Option<PathBuf>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            collector_url: DEFAULT_COLLECTOR_URL.to_owned(),
            cooldown: DEFAULT_COOLDOWN,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_path: None,
        }
    }
}

impl WidgetConfig {
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_collector_url(mut self, url: impl Into<String>) -> Self {
        self.collector_url = url.into();
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_thirty_day_cooldown() {
        let config = WidgetConfig::default();
        assert_eq!(config.cooldown, Duration::from_secs(2_592_000));
        assert_eq!(config.collector_url, DEFAULT_COLLECTOR_URL);
        assert_eq!(config.storage_path, None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WidgetConfig::from_json(
            r#"{"collectorUrl": "http://localhost:8080/", "cooldownSecs": 60}"#,
        )
        .unwrap();
        assert_eq!(config.collector_url, "http://localhost:8080/");
        assert_eq!(config.cooldown, Duration::from_secs(60));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn builders_override_fields() {
        let config = WidgetConfig::default()
            .with_storage_path("/tmp/votes.json")
            .with_request_timeout(Duration::from_secs(2));
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/votes.json")));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }
}
