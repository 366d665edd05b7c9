//! The exporter's metric aggregate.
//!
//! [`IriExporter`] owns every metric the process publishes. All of them are
//! created once in [`IriExporter::new`] and live until process exit; only
//! the label values of the per-peer families change over time.
//!
//! The exporter is itself a Prometheus [`Collector`]: gathering the registry
//! it lives in runs one scrape and then reports the current values.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, IntCounter, IntGauge, IntGaugeVec, Opts};

use crate::config::StalePeerPolicy;
use crate::feed::FeedSource;
use crate::metrics::scrape::{ScrapeOutcome, Scraper, TimedSnapshot};
use crate::node_client::NodeClient;
use crate::types::neighbor::count_active;
use crate::types::{NeighborStat, ZmqStat};

/// Label carrying the peer identifier on per-peer families.
pub const PEER_LABEL: &str = "id";

fn int_gauge(name: &str, help: &str) -> Result<IntGauge, prometheus::Error> {
    IntGauge::with_opts(Opts::new(name, help))
}

fn peer_gauge(name: &str, help: &str) -> Result<IntGaugeVec, prometheus::Error> {
    IntGaugeVec::new(Opts::new(name, help), &[PEER_LABEL])
}

fn to_gauge(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Metrics fed by `getNodeInfo`, plus the scrape counter.
#[derive(Clone)]
pub struct NodeInfoMetrics {
    /// Wall-clock time of the `getNodeInfo` call, in seconds.
    pub duration: Gauge,
    pub available_processors: IntGauge,
    pub free_memory: IntGauge,
    pub max_memory: IntGauge,
    pub total_memory: IntGauge,
    pub latest_milestone: IntGauge,
    pub latest_subtangle_milestone: IntGauge,
    pub total_neighbors: IntGauge,
    pub total_tips: IntGauge,
    pub total_transactions_queued: IntGauge,
    /// Scrape attempts, successful or not.
    pub scrapes_total: IntCounter,
}

impl NodeInfoMetrics {
    fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            duration: Gauge::with_opts(Opts::new(
                "iota_node_info_duration",
                "Response time of getting Node Info.",
            ))?,
            available_processors: int_gauge(
                "iota_node_info_available_processors",
                "Number of cores available in this Node.",
            )?,
            free_memory: int_gauge(
                "iota_node_info_free_memory",
                "Free Memory in this IRI instance.",
            )?,
            max_memory: int_gauge(
                "iota_node_info_max_memory",
                "Max Memory in this IRI instance.",
            )?,
            total_memory: int_gauge(
                "iota_node_info_total_memory",
                "Total Memory in this IRI instance.",
            )?,
            latest_milestone: int_gauge(
                "iota_node_info_latest_milestone",
                "Tangle milestone at the interval.",
            )?,
            latest_subtangle_milestone: int_gauge(
                "iota_node_info_latest_subtangle_milestone",
                "Subtangle milestone at the interval.",
            )?,
            total_neighbors: int_gauge(
                "iota_node_info_total_neighbors",
                "Total neighbors at the interval.",
            )?,
            total_tips: int_gauge("iota_node_info_total_tips", "Total tips at the interval.")?,
            total_transactions_queued: int_gauge(
                "iota_node_info_total_transactions_queued",
                "Total open txs at the interval.",
            )?,
            scrapes_total: IntCounter::with_opts(Opts::new(
                "iota_node_info_scrapes_total",
                "Total number of scrapes.",
            ))?,
        })
    }

    fn collectors(&self) -> [&dyn Collector; 11] {
        [
            &self.duration,
            &self.available_processors,
            &self.free_memory,
            &self.max_memory,
            &self.total_memory,
            &self.latest_milestone,
            &self.latest_subtangle_milestone,
            &self.total_neighbors,
            &self.total_tips,
            &self.total_transactions_queued,
            &self.scrapes_total,
        ]
    }

    fn record(&self, timed: &TimedSnapshot) {
        self.duration.set(timed.elapsed.as_secs_f64());

        let s = &timed.snapshot;
        let fields = [
            (&self.available_processors, s.available_processors),
            (&self.free_memory, s.free_memory),
            (&self.max_memory, s.max_memory),
            (&self.total_memory, s.total_memory),
            (&self.latest_milestone, s.latest_milestone_index),
            (&self.latest_subtangle_milestone, s.latest_subtangle_milestone_index),
            (&self.total_neighbors, s.neighbors),
            (&self.total_tips, s.tips),
            (&self.total_transactions_queued, s.transactions_queued),
        ];
        for (gauge, value) in fields {
            if let Some(v) = value {
                gauge.set(v);
            }
        }
    }
}

/// Metrics fed by `getNeighbors`.
#[derive(Clone)]
pub struct NeighborMetrics {
    pub total_neighbors: IntGauge,
    pub active_neighbors: IntGauge,
    pub new_transactions: IntGaugeVec,
    pub random_transactions: IntGaugeVec,
    pub all_transactions: IntGaugeVec,
    pub invalid_transactions: IntGaugeVec,
    pub sent_transactions: IntGaugeVec,
    pub active: IntGaugeVec,
    policy: StalePeerPolicy,
    /// Peers that currently have series in the per-peer families.
    known_peers: Arc<Mutex<HashSet<String>>>,
}

impl NeighborMetrics {
    fn new(policy: StalePeerPolicy) -> Result<Self, prometheus::Error> {
        Ok(Self {
            total_neighbors: int_gauge(
                "iota_neighbors_info_total_neighbors",
                "Total number of neighbors as received in the getNeighbors ws call.",
            )?,
            active_neighbors: int_gauge(
                "iota_neighbors_info_active_neighbors",
                "Total number of neighbors that are active.",
            )?,
            new_transactions: peer_gauge(
                "iota_neighbors_new_transactions",
                "Number of New Transactions for a specific Neighbor.",
            )?,
            random_transactions: peer_gauge(
                "iota_neighbors_random_transactions",
                "Number of Random Transactions for a specific Neighbor.",
            )?,
            all_transactions: peer_gauge(
                "iota_neighbors_all_transactions",
                "Number of All Transaction Types for a specific Neighbor.",
            )?,
            invalid_transactions: peer_gauge(
                "iota_neighbors_invalid_transactions",
                "Number of Invalid Transactions for a specific Neighbor.",
            )?,
            sent_transactions: peer_gauge(
                "iota_neighbors_sent_transactions",
                "Number of Sent Transactions for a specific Neighbor.",
            )?,
            active: peer_gauge(
                "iota_neighbors_active",
                "Report if the Neighbor Active based on incoming transactions.",
            )?,
            policy,
            known_peers: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    fn families(&self) -> [&IntGaugeVec; 6] {
        [
            &self.new_transactions,
            &self.random_transactions,
            &self.all_transactions,
            &self.invalid_transactions,
            &self.sent_transactions,
            &self.active,
        ]
    }

    fn collectors(&self) -> [&dyn Collector; 8] {
        [
            &self.total_neighbors,
            &self.active_neighbors,
            &self.new_transactions,
            &self.random_transactions,
            &self.all_transactions,
            &self.invalid_transactions,
            &self.sent_transactions,
            &self.active,
        ]
    }

    /// Identifiers of peers currently exposed, sorted.
    pub fn known_peers(&self) -> Vec<String> {
        let known = self.known_peers.lock().unwrap_or_else(|e| e.into_inner());
        let mut peers: Vec<String> = known.iter().cloned().collect();
        peers.sort();
        peers
    }

    fn record(&self, neighbors: &[NeighborStat]) {
        // Held for the whole update so a concurrent scrape cannot prune a
        // peer this one is writing.
        let mut known = self.known_peers.lock().unwrap_or_else(|e| e.into_inner());

        self.total_neighbors.set(to_gauge(neighbors.len()));
        self.active_neighbors.set(to_gauge(count_active(neighbors)));

        for n in neighbors {
            let id = [n.id.as_str()];
            self.new_transactions.with_label_values(&id).set(n.new_transactions);
            self.random_transactions
                .with_label_values(&id)
                .set(n.random_transactions);
            self.all_transactions.with_label_values(&id).set(n.all_transactions);
            self.invalid_transactions
                .with_label_values(&id)
                .set(n.invalid_transactions);
            self.sent_transactions.with_label_values(&id).set(n.sent_transactions);
            self.active.with_label_values(&id).set(i64::from(n.is_active()));
        }

        let current: HashSet<&str> = neighbors.iter().map(|n| n.id.as_str()).collect();

        if self.policy == StalePeerPolicy::Prune {
            let stale: Vec<String> = known
                .iter()
                .filter(|p| !current.contains(p.as_str()))
                .cloned()
                .collect();
            for peer in &stale {
                for family in self.families() {
                    // A family may never have seen this peer; nothing to undo.
                    let _ = family.remove_label_values(&[peer.as_str()]);
                }
                known.remove(peer);
                tracing::debug!(peer = %peer, "pruned vanished neighbor");
            }
        }

        known.extend(current.into_iter().map(str::to_string));
    }
}

/// Metrics fed by the ZeroMQ event stream.
#[derive(Clone)]
pub struct ZmqMetrics {
    pub seen_tx_count: IntGauge,
    pub txs_with_value_count: IntGauge,
    pub confirmed_tx_count: IntGauge,
    pub to_process: IntGauge,
    pub to_broadcast: IntGauge,
    pub to_request: IntGauge,
    pub to_reply: IntGauge,
    pub total_transactions: IntGauge,
}

impl ZmqMetrics {
    fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            seen_tx_count: int_gauge(
                "iota_zmq_seen_tx_count",
                "Count of transactions seen by zeroMQ.",
            )?,
            txs_with_value_count: int_gauge(
                "iota_zmq_txs_with_value_count",
                "Count of transactions seen by zeroMQ that have a non-zero value.",
            )?,
            confirmed_tx_count: int_gauge(
                "iota_zmq_confirmed_tx_count",
                "Count of transactions confirmed by zeroMQ.",
            )?,
            to_process: int_gauge("iota_zmq_to_process", "toProcess from RSTAT output of ZMQ.")?,
            to_broadcast: int_gauge(
                "iota_zmq_to_broadcast",
                "toBroadcast from RSTAT output of ZMQ.",
            )?,
            to_request: int_gauge("iota_zmq_to_request", "toRequest from RSTAT output of ZMQ.")?,
            to_reply: int_gauge("iota_zmq_to_reply", "toReply from RSTAT output of ZMQ.")?,
            total_transactions: int_gauge(
                "iota_zmq_total_transactions",
                "totalTransactions from RSTAT output of ZMQ.",
            )?,
        })
    }

    fn collectors(&self) -> [&dyn Collector; 8] {
        [
            &self.seen_tx_count,
            &self.txs_with_value_count,
            &self.confirmed_tx_count,
            &self.to_process,
            &self.to_broadcast,
            &self.to_request,
            &self.to_reply,
            &self.total_transactions,
        ]
    }

    fn record(&self, stat: &ZmqStat) {
        self.seen_tx_count.set(stat.seen_tx);
        self.txs_with_value_count.set(stat.txs_with_value);
        self.confirmed_tx_count.set(stat.confirmed_tx);
        self.to_process.set(stat.to_process);
        self.to_broadcast.set(stat.to_broadcast);
        self.to_request.set(stat.to_request);
        self.to_reply.set(stat.to_reply);
        self.total_transactions.set(stat.total_transactions);
    }
}

/// Every metric published by the exporter, plus the scraper that feeds them.
#[derive(Clone)]
pub struct IriExporter {
    scraper: Scraper,
    pub node: NodeInfoMetrics,
    pub neighbors: NeighborMetrics,
    pub zmq: ZmqMetrics,
}

impl IriExporter {
    /// Creates all metric objects. Nothing is fetched until the first
    /// [`Collector::collect`] call.
    pub fn new(
        client: Arc<dyn NodeClient>,
        feed: Arc<dyn FeedSource>,
        stale_peers: StalePeerPolicy,
    ) -> Result<Self, prometheus::Error> {
        Ok(Self {
            scraper: Scraper::new(client, feed),
            node: NodeInfoMetrics::new()?,
            neighbors: NeighborMetrics::new(stale_peers)?,
            zmq: ZmqMetrics::new()?,
        })
    }

    fn collectors(&self) -> Vec<&dyn Collector> {
        let mut all: Vec<&dyn Collector> = Vec::with_capacity(27);
        all.extend(self.node.collectors());
        all.extend(self.neighbors.collectors());
        all.extend(self.zmq.collectors());
        all
    }

    /// Runs one scrape and applies it.
    pub fn scrape(&self) {
        let outcome = self.scraper.scrape();
        self.apply(outcome);
    }

    /// Updates the metrics backed by successful fetches and logs the rest.
    ///
    /// The scrape counter is incremented unconditionally.
    pub fn apply(&self, outcome: ScrapeOutcome) {
        self.node.scrapes_total.inc();

        match outcome.node_info {
            Ok(timed) => self.node.record(&timed),
            Err(e) => tracing::warn!(error = %e, "getNodeInfo failed, keeping previous values"),
        }

        match outcome.neighbors {
            Ok(neighbors) => self.neighbors.record(&neighbors),
            Err(e) => tracing::warn!(error = %e, "getNeighbors failed, keeping previous values"),
        }

        match outcome.feed {
            Ok(stat) => self.zmq.record(&stat),
            Err(e) => tracing::warn!(error = %e, "zmq feed unavailable, keeping previous values"),
        }
    }
}

impl Collector for IriExporter {
    fn desc(&self) -> Vec<&Desc> {
        self.collectors()
            .into_iter()
            .flat_map(|c| c.desc())
            .collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.scrape();
        self.collectors()
            .into_iter()
            .flat_map(|c| c.collect())
            .collect()
    }
}
