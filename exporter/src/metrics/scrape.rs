//! One scrape of the node: three independent fetches.
//!
//! Each fetch produces its own `Result`. Nothing here short-circuits, so a
//! dead HTTP API never prevents the feed sample (and vice versa).

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::feed::{FeedError, FeedSource};
use crate::node_client::{ClientError, NodeClient};
use crate::types::{NeighborStat, NodeSnapshot, ZmqStat};

/// A node-info snapshot together with the time the call took.
#[derive(Clone, Debug)]
pub struct TimedSnapshot {
    pub snapshot: NodeSnapshot,
    pub elapsed: Duration,
}

/// Results of the three fetches performed by one scrape.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub node_info: Result<TimedSnapshot, ClientError>,
    pub neighbors: Result<Vec<NeighborStat>, ClientError>,
    pub feed: Result<ZmqStat, FeedError>,
}

/// Fetches everything the exporter publishes from its upstreams.
#[derive(Clone)]
pub struct Scraper {
    client: Arc<dyn NodeClient>,
    feed: Arc<dyn FeedSource>,
}

impl Scraper {
    pub fn new(client: Arc<dyn NodeClient>, feed: Arc<dyn FeedSource>) -> Self {
        Self { client, feed }
    }

    /// Runs the node-info fetch, the neighbor fetch and the feed sample in
    /// sequence, independently of each other's success.
    pub fn scrape(&self) -> ScrapeOutcome {
        let start = Instant::now();
        let node_info = self.client.node_info().map(|snapshot| TimedSnapshot {
            snapshot,
            elapsed: start.elapsed(),
        });
        let neighbors = self.client.neighbors();
        let feed = self.feed.sample();

        ScrapeOutcome {
            node_info,
            neighbors,
            feed,
        }
    }
}
