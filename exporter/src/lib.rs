//! IOTA IRI exporter library crate.
//!
//! This crate provides the pieces a Prometheus exporter for an IRI node is
//! assembled from:
//!
//! - domain snapshots of what the node reports (`types`),
//! - the IRI HTTP API client (`node_client`),
//! - the ZeroMQ event feed listener (`feed`),
//! - the metric aggregate, scraper and registry (`metrics`),
//! - and a top-level configuration (`config`).
//!
//! The `iri-gateway` binary wires these into an HTTP server.

pub mod config;
pub mod feed;
pub mod metrics;
pub mod node_client;
pub mod types;

// Re-export top-level configuration types.
pub use config::{ExporterConfig, FeedConfig, MetricsConfig, NodeClientConfig, StalePeerPolicy};

// Re-export upstream interfaces and their production implementations.
pub use feed::{FeedError, FeedSource, FeedStats, ZmqFeed};
pub use node_client::{ClientError, HttpNodeClient, NodeClient};

// Re-export the metric aggregate and registry.
pub use metrics::{CONTENT_TYPE, IriExporter, MetricsRegistry, ScrapeOutcome, Scraper};

// Re-export domain types at the crate root for convenience.
pub use types::*;
