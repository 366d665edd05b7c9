//! Clients for the IRI node's HTTP API.
//!
//! The [`NodeClient`] trait abstracts over the node so the scraper can be
//! driven by a canned implementation in tests. [`HttpNodeClient`] is the
//! production implementation that speaks the IRI JSON command protocol.

use std::fmt;

use crate::types::{NeighborStat, NodeSnapshot};

pub mod http;

pub use http::HttpNodeClient;

/// Errors that can occur while querying the node.
#[derive(Debug)]
pub enum ClientError {
    /// Transport-level error (connection refused, timeout, ...).
    Transport(String),
    /// The node answered with a non-success HTTP status.
    Service(String),
    /// The node returned a malformed or unexpected response body.
    Protocol(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "transport error: {msg}"),
            ClientError::Service(msg) => write!(f, "node error: {msg}"),
            ClientError::Protocol(msg) => write!(f, "protocol error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// Abstract view of an IRI node's status API.
///
/// Calls are blocking; the exporter only invokes them from a blocking
/// context (see the gateway's metrics route).
pub trait NodeClient: Send + Sync {
    /// Issues `getNodeInfo`.
    fn node_info(&self) -> Result<NodeSnapshot, ClientError>;

    /// Issues `getNeighbors`.
    fn neighbors(&self) -> Result<Vec<NeighborStat>, ClientError>;
}
