//! ZeroMQ subscriber for the IRI event feed.
//!
//! IRI publishes one text frame per event, space separated, topic first:
//!
//! ```text
//! tx <hash> <address> <value> <obsoleteTag> <timestamp> ...
//! sn <milestoneIndex> <hash> ...
//! rstat <toProcess> <toBroadcast> <toRequest> <toReply> <totalTransactions>
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use tokio::task::JoinHandle;
use zeromq::{Socket, SocketRecv, SubSocket};

use crate::config::FeedConfig;
use crate::feed::{FeedError, FeedSource};
use crate::types::ZmqStat;

const TOPICS: [&str; 3] = ["tx", "sn", "rstat"];

/// Counters maintained by the feed listener.
///
/// All fields are atomics so the listener task and concurrent scrapes can
/// touch them without a lock.
#[derive(Debug, Default)]
pub struct FeedStats {
    ever_connected: AtomicBool,
    connected: AtomicBool,
    seen_tx: AtomicU64,
    txs_with_value: AtomicU64,
    confirmed_tx: AtomicU64,
    to_process: AtomicI64,
    to_broadcast: AtomicI64,
    to_request: AtomicI64,
    to_reply: AtomicI64,
    total_transactions: AtomicI64,
}

impl FeedStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one feed message into the counters.
    ///
    /// Returns `false` for topics the exporter does not track and for
    /// messages too short to carry the expected fields.
    pub fn apply(&self, message: &str) -> bool {
        let mut fields = message.split_whitespace();
        match fields.next() {
            Some("tx") => {
                self.seen_tx.fetch_add(1, Ordering::Relaxed);
                // hash, address, then value
                let value = fields.nth(2).and_then(|v| v.parse::<i64>().ok());
                if matches!(value, Some(v) if v != 0) {
                    self.txs_with_value.fetch_add(1, Ordering::Relaxed);
                }
                true
            }
            Some("sn") => {
                self.confirmed_tx.fetch_add(1, Ordering::Relaxed);
                true
            }
            Some("rstat") => {
                let values: Vec<i64> = fields.filter_map(|v| v.parse().ok()).collect();
                let [process, broadcast, request, reply, total, ..] = values.as_slice() else {
                    return false;
                };
                self.to_process.store(*process, Ordering::Relaxed);
                self.to_broadcast.store(*broadcast, Ordering::Relaxed);
                self.to_request.store(*request, Ordering::Relaxed);
                self.to_reply.store(*reply, Ordering::Relaxed);
                self.total_transactions.store(*total, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    pub fn set_connected(&self, connected: bool) {
        if connected {
            self.ever_connected.store(true, Ordering::Relaxed);
        }
        self.connected.store(connected, Ordering::Relaxed);
    }

    /// Reads all counters without checking connection state.
    pub fn snapshot(&self) -> ZmqStat {
        let count = |c: &AtomicU64| i64::try_from(c.load(Ordering::Relaxed)).unwrap_or(i64::MAX);
        ZmqStat {
            seen_tx: count(&self.seen_tx),
            txs_with_value: count(&self.txs_with_value),
            confirmed_tx: count(&self.confirmed_tx),
            to_process: self.to_process.load(Ordering::Relaxed),
            to_broadcast: self.to_broadcast.load(Ordering::Relaxed),
            to_request: self.to_request.load(Ordering::Relaxed),
            to_reply: self.to_reply.load(Ordering::Relaxed),
            total_transactions: self.total_transactions.load(Ordering::Relaxed),
        }
    }
}

impl FeedSource for FeedStats {
    fn sample(&self) -> Result<ZmqStat, FeedError> {
        if !self.ever_connected.load(Ordering::Relaxed) {
            return Err(FeedError::NotReady);
        }
        if !self.connected.load(Ordering::Relaxed) {
            return Err(FeedError::Disconnected);
        }
        Ok(self.snapshot())
    }
}

/// Handle to a running ZeroMQ feed listener.
pub struct ZmqFeed {
    stats: Arc<FeedStats>,
}

impl ZmqFeed {
    /// Spawns the listener onto the current Tokio runtime.
    ///
    /// The listener reconnects after `cfg.reconnect_delay` whenever the
    /// socket fails or stays silent for longer than `cfg.idle_timeout`, for
    /// as long as the returned task is alive.
    pub fn spawn(cfg: FeedConfig) -> (Self, JoinHandle<()>) {
        let stats = Arc::new(FeedStats::new());
        let task = tokio::spawn(run_listener(cfg, stats.clone()));
        (Self { stats }, task)
    }
}

impl FeedSource for ZmqFeed {
    fn sample(&self) -> Result<ZmqStat, FeedError> {
        self.stats.sample()
    }
}

async fn run_listener(cfg: FeedConfig, stats: Arc<FeedStats>) {
    loop {
        if let Err(e) = listen(&cfg, &stats).await {
            tracing::warn!(endpoint = %cfg.endpoint, error = %e, "zmq feed interrupted");
        }
        stats.set_connected(false);
        tokio::time::sleep(cfg.reconnect_delay).await;
    }
}

async fn listen(cfg: &FeedConfig, stats: &FeedStats) -> Result<(), FeedError> {
    let endpoint = cfg.endpoint.as_str();
    let mut socket = SubSocket::new();
    socket
        .connect(endpoint)
        .await
        .map_err(|e| FeedError::Socket(format!("connect to {endpoint} failed: {e}")))?;
    for topic in TOPICS {
        socket
            .subscribe(topic)
            .await
            .map_err(|e| FeedError::Socket(format!("subscribe to {topic} failed: {e}")))?;
    }

    stats.set_connected(true);
    tracing::info!(endpoint, "zmq feed connected");

    loop {
        // A SUB socket does not report a vanished publisher; silence does.
        let msg = tokio::time::timeout(cfg.idle_timeout, socket.recv())
            .await
            .map_err(|_| FeedError::Disconnected)?
            .map_err(|e| FeedError::Socket(format!("recv failed: {e}")))?;
        for frame in msg.into_vec() {
            let text = String::from_utf8_lossy(&frame);
            if !stats.apply(&text) {
                tracing::trace!(message = %text, "ignoring zmq message");
            }
        }
    }
}
