//! Configuration management for the noticeboard service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use noticeboard_core::{NotifierConfig, StoreConfig};
use serde::{Deserialize, Serialize};

use crate::server::DocumentKeys;

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The bucket and topic identifiers keep their original deployment
/// environment names (`BUCKET_NAME`, `TOPIC_ARN`) as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port")]
    pub port: u16,

    // Object store
    /// Base URL of the object store gateway.
    ///
    /// Environment variable: `STORAGE_URL`
    #[serde(default = "default_storage_url")]
    pub storage_url: String,
    /// Bucket holding the list documents.
    ///
    /// Environment variable: `BUCKET_NAME`
    #[serde(default = "default_bucket", alias = "bucket_name", alias = "BUCKET_NAME")]
    pub bucket: String,
    /// Storage key for the event list document.
    ///
    /// Environment variable: `EVENTS_KEY`
    #[serde(default = "default_events_key")]
    pub events_key: String,
    /// Storage key for the subscriber list document.
    ///
    /// Environment variable: `SUBSCRIBERS_KEY`
    #[serde(default = "default_subscribers_key")]
    pub subscribers_key: String,

    // Notifier
    /// Base URL of the notification gateway.
    ///
    /// Environment variable: `NOTIFIER_URL`
    #[serde(default = "default_notifier_url")]
    pub notifier_url: String,
    /// Topic identifier for publishes and subscriptions.
    ///
    /// Environment variable: `TOPIC_ARN`
    #[serde(default = "default_topic", alias = "topic_arn", alias = "TOPIC_ARN")]
    pub topic: String,

    // Outbound HTTP
    /// Timeout in seconds for store and notifier requests.
    ///
    /// Environment variable: `HTTP_TIMEOUT`
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Convert to the core crate's object store configuration.
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            base_url: self.storage_url.clone(),
            bucket: self.bucket.clone(),
            timeout: Duration::from_secs(self.http_timeout),
            ..StoreConfig::default()
        }
    }

    /// Convert to the core crate's notifier configuration.
    pub fn to_notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            base_url: self.notifier_url.clone(),
            topic: self.topic.clone(),
            timeout: Duration::from_secs(self.http_timeout),
            ..NotifierConfig::default()
        }
    }

    /// The fixed storage keys of the two list documents.
    pub fn document_keys(&self) -> DocumentKeys {
        DocumentKeys { events: self.events_key.clone(), subscribers: self.subscribers_key.clone() }
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.bucket.is_empty() {
            anyhow::bail!("bucket must not be empty");
        }

        if self.topic.is_empty() {
            anyhow::bail!("topic must not be empty");
        }

        if self.events_key.is_empty() || self.subscribers_key.is_empty() {
            anyhow::bail!("document keys must not be empty");
        }

        if self.events_key == self.subscribers_key {
            anyhow::bail!("events_key and subscribers_key must differ");
        }

        if self.http_timeout == 0 {
            anyhow::bail!("http_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage_url: default_storage_url(),
            bucket: default_bucket(),
            events_key: default_events_key(),
            subscribers_key: default_subscribers_key(),
            notifier_url: default_notifier_url(),
            topic: default_topic(),
            http_timeout: default_http_timeout(),
            rust_log: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage_url() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_bucket() -> String {
    "noticeboard".to_string()
}

fn default_events_key() -> String {
    "events.json".to_string()
}

fn default_subscribers_key() -> String {
    "subscribers.json".to_string()
}

fn default_notifier_url() -> String {
    "http://127.0.0.1:9100".to_string()
}

fn default_topic() -> String {
    "announcements".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
