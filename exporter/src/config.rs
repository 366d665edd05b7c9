//! Top-level configuration for the exporter.
//!
//! This module aggregates configuration for:
//!
//! - the IRI node client (node URL + request timeout),
//! - the ZeroMQ feed listener (endpoint + reconnect delay),
//! - the metrics HTTP front door (listen address + telemetry path),
//! - the policy applied to peers that disappear from the neighbor list.
//!
//! Binaries construct an [`ExporterConfig`] from defaults and override
//! individual fields from command-line flags.

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the IRI HTTP API client.
#[derive(Clone, Debug)]
pub struct NodeClientConfig {
    /// Base URL of the IRI node, e.g. `"http://localhost:14265"`.
    pub base_url: String,
    /// Request timeout for each API command.
    pub timeout: Duration,
}

impl Default for NodeClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:14265".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration for the ZeroMQ feed listener.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// ZeroMQ endpoint published by the node.
    pub endpoint: String,
    /// Delay before reconnecting after the socket fails.
    pub reconnect_delay: Duration,
    /// Longest silence tolerated before the publisher is considered gone.
    /// IRI emits `rstat` and `tx` continuously, so a quiet socket means a
    /// lost connection.
    pub idle_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: "tcp://localhost:5556".to_string(),
            reconnect_delay: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

/// Configuration for the metrics HTTP front door.
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Path under which metrics are exposed.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        // Safe to unwrap: this is a fixed, valid address literal.
        let addr: SocketAddr = "0.0.0.0:9187"
            .parse()
            .expect("hard-coded metrics listen address should parse");
        Self {
            listen_addr: addr,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Checks that the telemetry path can be routed next to the landing page.
    pub fn validate(&self) -> Result<(), String> {
        if !self.path.starts_with('/') {
            return Err(format!("telemetry path {:?} must start with '/'", self.path));
        }
        if self.path == "/" {
            return Err("telemetry path must not be '/', it serves the landing page".to_string());
        }
        // The router would treat these as captures or wildcards.
        if self.path.contains(['{', '}']) {
            return Err(format!("telemetry path {:?} must not contain braces", self.path));
        }
        if let Some(segment) = self
            .path
            .split('/')
            .find(|s| s.starts_with(':') || s.starts_with('*'))
        {
            return Err(format!(
                "telemetry path segment {segment:?} must not start with ':' or '*'"
            ));
        }
        Ok(())
    }
}

/// What happens to per-peer series when a peer disappears from a
/// successful neighbor fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StalePeerPolicy {
    /// Keep exposing the peer's last observed values until restart.
    #[default]
    Retain,
    /// Remove the peer's series from every per-peer family.
    Prune,
}

/// Top-level configuration for the exporter.
#[derive(Clone, Debug, Default)]
pub struct ExporterConfig {
    pub node: NodeClientConfig,
    pub feed: FeedConfig,
    pub metrics: MetricsConfig,
    pub stale_peers: StalePeerPolicy,
}
