//! Configuration for the Submission Subsystem
//!
//! Loaded from TOML, then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LG_CHANNEL` | `network.channel` |
//! | `LG_CHAINCODE_ID` | `network.chaincode_id` |
//! | `LG_PEERS` | `network.peers` (`name=url,name=url`) |
//! | `LG_ORDERER` | `network.orderer` (`name=url`) |
//! | `LG_IDENTITY` | `identity.label` |
//! | `LG_MSP_ID` | `identity.msp_id` |
//! | `LG_COMMIT_TIMEOUT_MS` | `submission.commit_timeout_ms` |
//! | `LG_REQUEST_TIMEOUT_MS` | `submission.request_timeout_ms` |

use serde::{Deserialize, Serialize};
use shared_types::{OrdererEndpoint, PeerEndpoint};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level gateway configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub network: NetworkConfig,
    pub identity: IdentityConfig,
    pub submission: SubmissionConfig,
}

/// Where proposals and transactions are sent
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Channel name
    pub channel: String,
    /// Deployed contract identifier
    pub chaincode_id: String,
    /// Endorsing peers; every one must endorse
    pub peers: Vec<PeerEndpoint>,
    /// Ordering node
    pub orderer: OrdererEndpoint,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            channel: "mychannel".to_string(),
            chaincode_id: "test-app".to_string(),
            peers: vec![PeerEndpoint::new("peer0", "grpc://localhost:7051")],
            orderer: OrdererEndpoint::new("orderer0", "grpc://localhost:7050"),
        }
    }
}

/// Which enrolled identity signs proposals
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Enrollment label
    pub label: String,
    /// Membership service provider id
    pub msp_id: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            label: "user1".to_string(),
            msp_id: "Org1MSP".to_string(),
        }
    }
}

/// Timing and admission limits for the write path
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Commit wait, measured from subscription
    pub commit_timeout_ms: u64,
    /// Bound on each individual peer or orderer call
    pub request_timeout_ms: u64,
    /// Write submissions allowed in flight at once
    pub max_in_flight: usize,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            commit_timeout_ms: 3_000,
            request_timeout_ms: 45_000,
            max_in_flight: 256,
        }
    }
}

impl SubmissionConfig {
    #[must_use]
    pub fn commit_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_timeout_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Reject limits a running service cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.commit_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "commit_timeout_ms must be positive".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be positive".into(),
            ));
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::Invalid("max_in_flight must be positive".into()));
        }
        if self.max_in_flight > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Invalid(format!(
                "max_in_flight must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }
}

impl GatewayConfig {
    /// Parse from a TOML document. Missing sections take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Read a TOML file, apply environment overrides, and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut config = Self::from_toml_str(&text)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(channel) = lookup("LG_CHANNEL") {
            self.network.channel = channel;
        }
        if let Some(chaincode) = lookup("LG_CHAINCODE_ID") {
            self.network.chaincode_id = chaincode;
        }
        if let Some(peers) = lookup("LG_PEERS") {
            self.network.peers = parse_endpoint_list("LG_PEERS", &peers)?
                .into_iter()
                .map(|(name, url)| PeerEndpoint::new(name, url))
                .collect();
        }
        if let Some(orderer) = lookup("LG_ORDERER") {
            let (name, url) = parse_endpoint("LG_ORDERER", &orderer)?;
            self.network.orderer = OrdererEndpoint::new(name, url);
        }
        if let Some(label) = lookup("LG_IDENTITY") {
            self.identity.label = label;
        }
        if let Some(msp_id) = lookup("LG_MSP_ID") {
            self.identity.msp_id = msp_id;
        }
        if let Some(ms) = lookup("LG_COMMIT_TIMEOUT_MS") {
            self.submission.commit_timeout_ms = parse_millis("LG_COMMIT_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = lookup("LG_REQUEST_TIMEOUT_MS") {
            self.submission.request_timeout_ms = parse_millis("LG_REQUEST_TIMEOUT_MS", &ms)?;
        }
        Ok(())
    }

    /// Reject configurations the gateway cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.channel.trim().is_empty() {
            return Err(ConfigError::Invalid("channel must not be empty".into()));
        }
        if self.network.chaincode_id.trim().is_empty() {
            return Err(ConfigError::Invalid("chaincode_id must not be empty".into()));
        }
        if self.network.peers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one endorsing peer is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for peer in &self.network.peers {
            if !seen.insert(peer.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate peer name {}",
                    peer.name
                )));
            }
        }

        self.submission.validate()
    }
}

fn parse_endpoint(var: &'static str, raw: &str) -> Result<(String, String), ConfigError> {
    let (name, url) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidEnv {
            var,
            reason: format!("expected name=url, got {raw:?}"),
        })?;
    let (name, url) = (name.trim(), url.trim());
    if name.is_empty() || url.is_empty() {
        return Err(ConfigError::InvalidEnv {
            var,
            reason: format!("expected name=url, got {raw:?}"),
        });
    }
    Ok((name.to_string(), url.to_string()))
}

fn parse_endpoint_list(
    var: &'static str,
    raw: &str,
) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| parse_endpoint(var, entry))
        .collect()
}

fn parse_millis(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e| ConfigError::InvalidEnv {
        var,
        reason: format!("{e}"),
    })
}
