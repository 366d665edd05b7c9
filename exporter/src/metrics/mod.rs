//! Metrics published by the exporter.
//!
//! - [`exporter::IriExporter`] owns every metric object and implements the
//!   Prometheus `Collector` contract, scraping on each collect.
//! - [`scrape::Scraper`] performs the three independent upstream fetches.
//! - [`registry::MetricsRegistry`] wraps the Prometheus registry and renders
//!   the text exposition format.
//!
//! Typical usage:
//!
//! ```ignore
//! use std::sync::Arc;
//! use iri_exporter::{IriExporter, MetricsRegistry, StalePeerPolicy};
//!
//! let exporter = IriExporter::new(client, feed, StalePeerPolicy::Retain)?;
//! let registry = Arc::new(MetricsRegistry::new(exporter)?);
//!
//! // From a blocking context, per scrape request:
//! let body = registry.gather_text();
//! ```

pub mod exporter;
pub mod registry;
pub mod scrape;

pub use exporter::{IriExporter, NeighborMetrics, NodeInfoMetrics, PEER_LABEL, ZmqMetrics};
pub use registry::{CONTENT_TYPE, MetricsRegistry};
pub use scrape::{ScrapeOutcome, Scraper, TimedSnapshot};
