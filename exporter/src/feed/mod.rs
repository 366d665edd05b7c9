//! Streaming feed sampled at scrape time.
//!
//! The node pushes transaction and queue statistics over ZeroMQ. A listener
//! keeps running totals in [`FeedStats`]; the scraper only ever reads them
//! through the [`FeedSource`] trait.

use std::fmt;

use crate::types::ZmqStat;

pub mod zmq;

pub use zmq::{FeedStats, ZmqFeed};

/// Errors returned when the feed cannot be sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The listener has not connected to the node yet.
    NotReady,
    /// The listener lost its connection and is waiting to reconnect.
    Disconnected,
    /// Socket-level failure inside the listener.
    Socket(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::NotReady => write!(f, "feed has not connected yet"),
            FeedError::Disconnected => write!(f, "feed is disconnected"),
            FeedError::Socket(msg) => write!(f, "feed socket error: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Read-only access to the latest feed counters.
pub trait FeedSource: Send + Sync {
    fn sample(&self) -> Result<ZmqStat, FeedError>;
}
