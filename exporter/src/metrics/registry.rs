//! Prometheus registry holding the exporter.
//!
//! [`MetricsRegistry`] owns a private `prometheus::Registry` (never the
//! process-global default one) with the [`IriExporter`] registered as its
//! only collector. Gathering it runs one scrape.

use prometheus::{Encoder, Registry, TextEncoder};

use crate::metrics::exporter::IriExporter;

/// Content type of [`MetricsRegistry::gather_text`] output.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Wrapper around a Prometheus registry and the exporter's metrics.
///
/// This is the handle the HTTP front door holds. It is cheap to clone; all
/// clones share the same underlying metric objects.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    pub exporter: IriExporter,
}

impl MetricsRegistry {
    /// Creates a fresh registry and registers `exporter` into it.
    ///
    /// Fails if the exporter's descriptors collide, which would indicate a
    /// duplicated metric name.
    pub fn new(exporter: IriExporter) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        registry.register(Box::new(exporter.clone()))?;
        Ok(Self { registry, exporter })
    }

    /// Scrapes the node and encodes all metrics in the Prometheus text
    /// format.
    ///
    /// This blocks on the node's HTTP API; call it from a blocking context.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "failed to encode Prometheus metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::StalePeerPolicy;
    use crate::feed::FeedStats;
    use crate::node_client::{ClientError, NodeClient};
    use crate::types::{NeighborStat, NodeSnapshot};

    struct StaticNode;

    impl NodeClient for StaticNode {
        fn node_info(&self) -> Result<NodeSnapshot, ClientError> {
            Ok(NodeSnapshot {
                free_memory: Some(1000),
                total_memory: Some(2000),
                latest_milestone_index: Some(42),
                ..Default::default()
            })
        }

        fn neighbors(&self) -> Result<Vec<NeighborStat>, ClientError> {
            Ok(vec![NeighborStat {
                id: "/8.8.8.8:14265".to_string(),
                all_transactions: 7,
                ..Default::default()
            }])
        }
    }

    struct DeadNode;

    impl NodeClient for DeadNode {
        fn node_info(&self) -> Result<NodeSnapshot, ClientError> {
            Err(ClientError::Transport("connection refused".to_string()))
        }

        fn neighbors(&self) -> Result<Vec<NeighborStat>, ClientError> {
            Err(ClientError::Transport("connection refused".to_string()))
        }
    }

    fn registry_for(node: Arc<dyn NodeClient>) -> MetricsRegistry {
        let exporter = IriExporter::new(node, Arc::new(FeedStats::new()), StalePeerPolicy::Retain)
            .expect("exporter");
        MetricsRegistry::new(exporter).expect("registry")
    }

    #[test]
    fn gather_text_renders_scraped_values() {
        let registry = registry_for(Arc::new(StaticNode));
        let text = registry.gather_text();

        assert!(text.contains("iota_node_info_free_memory 1000"));
        assert!(text.contains("iota_node_info_total_memory 2000"));
        assert!(text.contains("iota_node_info_latest_milestone 42"));
        assert!(text.contains("iota_node_info_scrapes_total 1"));
        assert!(text.contains(r#"iota_neighbors_all_transactions{id="/8.8.8.8:14265"} 7"#));
        assert!(text.contains(r#"iota_neighbors_active{id="/8.8.8.8:14265"} 1"#));
        assert!(text.contains("# HELP iota_zmq_seen_tx_count"));
    }

    #[test]
    fn gather_text_succeeds_with_every_upstream_down() {
        let registry = registry_for(Arc::new(DeadNode));

        let first = registry.gather_text();
        let second = registry.gather_text();

        assert!(first.contains("iota_node_info_scrapes_total 1"));
        assert!(second.contains("iota_node_info_scrapes_total 2"));
        assert!(second.contains("iota_node_info_free_memory 0"));
        // No peers were ever seen, so no per-peer samples exist.
        assert!(!second.contains("iota_neighbors_active{"));
    }

    #[test]
    fn exporter_cannot_be_registered_twice() {
        let registry = registry_for(Arc::new(DeadNode));
        let err = registry
            .registry
            .register(Box::new(registry.exporter.clone()))
            .expect_err("duplicate registration must fail");
        assert!(matches!(err, prometheus::Error::AlreadyReg));
    }
}
