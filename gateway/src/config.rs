//! Command-line configuration for the gateway.
//!
//! Flag names follow the conventions of other Prometheus exporters
//! (`--web.listen-address`, `--web.telemetry-path`). Parsed flags are turned
//! into an [`ExporterConfig`] for the library.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use iri_exporter::{ExporterConfig, StalePeerPolicy};

/// Prometheus exporter for IOTA IRI nodes.
#[derive(Debug, Parser)]
#[command(name = "iota-iri-exporter", version, about)]
pub struct Cli {
    /// Address to listen on for web interface and telemetry.
    #[arg(long = "web.listen-address", default_value = "0.0.0.0:9187", value_parser = parse_listen_address)]
    pub listen_address: SocketAddr,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", default_value = "/metrics")]
    pub telemetry_path: String,

    /// URI of the IOTA IRI node to scrape.
    #[arg(long = "web.iri-path", default_value = "http://localhost:14265")]
    pub iri_path: String,

    /// ZeroMQ endpoint of the IOTA IRI node.
    #[arg(long = "web.zmq-path", default_value = "tcp://localhost:5556")]
    pub zmq_path: String,

    /// Seconds of ZeroMQ silence before the feed is treated as disconnected.
    #[arg(long = "zmq.idle-timeout-secs", default_value_t = 60)]
    pub zmq_idle_timeout_secs: u64,

    /// Timeout for each IRI API call, in seconds.
    #[arg(long = "iri.timeout-secs", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Drop per-neighbor series once a neighbor is no longer reported.
    #[arg(long = "neighbors.prune-stale")]
    pub prune_stale: bool,
}

impl Cli {
    /// Builds and validates the library configuration.
    pub fn into_config(self) -> Result<ExporterConfig, String> {
        let mut cfg = ExporterConfig::default();

        cfg.metrics.listen_addr = self.listen_address;
        cfg.metrics.path = self.telemetry_path;
        cfg.node.base_url = self.iri_path;
        cfg.node.timeout = Duration::from_secs(self.timeout_secs);
        cfg.feed.endpoint = self.zmq_path;
        cfg.feed.idle_timeout = Duration::from_secs(self.zmq_idle_timeout_secs);
        cfg.stale_peers = if self.prune_stale {
            StalePeerPolicy::Prune
        } else {
            StalePeerPolicy::Retain
        };

        cfg.metrics.validate()?;
        Ok(cfg)
    }
}

/// Parses a listen address, accepting the `:port` shorthand for all
/// interfaces.
fn parse_listen_address(s: &str) -> Result<SocketAddr, String> {
    let full = match s.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => s.to_string(),
    };
    full.parse()
        .map_err(|e| format!("invalid listen address {s:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let cfg = Cli::parse_from(["iota-iri-exporter"])
            .into_config()
            .expect("defaults are valid");
        let lib = ExporterConfig::default();

        assert_eq!(cfg.metrics.listen_addr, lib.metrics.listen_addr);
        assert_eq!(cfg.metrics.path, lib.metrics.path);
        assert_eq!(cfg.node.base_url, lib.node.base_url);
        assert_eq!(cfg.node.timeout, lib.node.timeout);
        assert_eq!(cfg.feed.endpoint, lib.feed.endpoint);
        assert_eq!(cfg.feed.idle_timeout, lib.feed.idle_timeout);
        assert_eq!(cfg.stale_peers, StalePeerPolicy::Retain);
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = Cli::parse_from([
            "iota-iri-exporter",
            "--web.listen-address",
            ":9999",
            "--web.telemetry-path",
            "/iri",
            "--web.iri-path",
            "http://node.example:14265",
            "--web.zmq-path",
            "tcp://node.example:5556",
            "--iri.timeout-secs",
            "3",
            "--zmq.idle-timeout-secs",
            "15",
            "--neighbors.prune-stale",
        ])
        .into_config()
        .expect("valid flags");

        assert_eq!(cfg.metrics.listen_addr, "0.0.0.0:9999".parse().unwrap());
        assert_eq!(cfg.metrics.path, "/iri");
        assert_eq!(cfg.node.base_url, "http://node.example:14265");
        assert_eq!(cfg.node.timeout, Duration::from_secs(3));
        assert_eq!(cfg.feed.endpoint, "tcp://node.example:5556");
        assert_eq!(cfg.feed.idle_timeout, Duration::from_secs(15));
        assert_eq!(cfg.stale_peers, StalePeerPolicy::Prune);
    }

    #[test]
    fn landing_page_path_is_rejected_as_telemetry_path() {
        let err = Cli::parse_from(["iota-iri-exporter", "--web.telemetry-path", "/"])
            .into_config()
            .expect_err("'/' is reserved");
        assert!(err.contains("landing page"));
    }

    #[test]
    fn capture_like_telemetry_paths_are_rejected() {
        for path in ["/:metrics", "/*metrics", "/{metrics}"] {
            let result = Cli::parse_from(["iota-iri-exporter", "--web.telemetry-path", path])
                .into_config();
            assert!(result.is_err(), "{path} should be rejected");
        }
    }

    #[test]
    fn listen_address_parsing() {
        assert_eq!(
            parse_listen_address(":9187").unwrap(),
            "0.0.0.0:9187".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_listen_address("127.0.0.1:8080").unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert!(parse_listen_address("localhost").is_err());
    }
}
