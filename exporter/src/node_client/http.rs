//! HTTP-based IRI node client.
//!
//! IRI exposes a single JSON endpoint that dispatches on a `command` field:
//!
//! ```json
//! POST /
//! X-IOTA-API-Version: 1
//! { "command": "getNodeInfo" }
//! ```
//!
//! Only the numeric fields the exporter maps onto metrics are decoded; any
//! other fields in the response are ignored.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::node_client::{ClientError, NodeClient};
use crate::types::{NeighborStat, NodeSnapshot};

/// Header carrying the IRI API version; the node rejects requests without it.
const API_VERSION_HEADER: &str = "X-IOTA-API-Version";
const API_VERSION: &str = "1";

/// Blocking HTTP client for an IRI node.
///
/// This client is `Send + Sync` and is shared by all concurrent scrapes.
/// It must not be constructed or used on an async worker thread; callers
/// run it inside `spawn_blocking` or a plain OS thread.
pub struct HttpNodeClient {
    base_url: String,
    client: Client,
}

impl HttpNodeClient {
    /// Constructs a client for the node at `base_url`, e.g.
    /// `"http://localhost:14265"`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn command<T: DeserializeOwned>(&self, command: &'static str) -> Result<T, ClientError> {
        let url = self.base_url.trim_end_matches('/');

        let resp = self
            .client
            .post(url)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&CommandRequest { command })
            .send()
            .map_err(|e| ClientError::Transport(format!("{command} to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Service(format!(
                "{command} returned HTTP status {status}"
            )));
        }

        resp.json::<T>()
            .map_err(|e| ClientError::Protocol(format!("failed to parse {command} response: {e}")))
    }
}

#[derive(Debug, Serialize)]
struct CommandRequest {
    command: &'static str,
}

/// Wire shape of the `getNodeInfo` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeInfoResponse {
    jre_available_processors: Option<i64>,
    jre_free_memory: Option<i64>,
    jre_max_memory: Option<i64>,
    jre_total_memory: Option<i64>,
    latest_milestone_index: Option<i64>,
    latest_solid_subtangle_milestone_index: Option<i64>,
    neighbors: Option<i64>,
    tips: Option<i64>,
    transactions_to_request: Option<i64>,
}

impl From<NodeInfoResponse> for NodeSnapshot {
    fn from(r: NodeInfoResponse) -> Self {
        NodeSnapshot {
            available_processors: r.jre_available_processors,
            free_memory: r.jre_free_memory,
            max_memory: r.jre_max_memory,
            total_memory: r.jre_total_memory,
            latest_milestone_index: r.latest_milestone_index,
            latest_subtangle_milestone_index: r.latest_solid_subtangle_milestone_index,
            neighbors: r.neighbors,
            tips: r.tips,
            transactions_queued: r.transactions_to_request,
        }
    }
}

/// Wire shape of the `getNeighbors` response.
#[derive(Debug, Deserialize)]
struct NeighborsResponse {
    neighbors: Vec<NeighborEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NeighborEntry {
    address: String,
    #[serde(default)]
    number_of_new_transactions: i64,
    #[serde(default)]
    number_of_random_transaction_requests: i64,
    #[serde(default)]
    number_of_all_transactions: i64,
    #[serde(default)]
    number_of_invalid_transactions: i64,
    #[serde(default)]
    number_of_sent_transactions: i64,
}

impl From<NeighborEntry> for NeighborStat {
    fn from(n: NeighborEntry) -> Self {
        NeighborStat {
            id: n.address,
            new_transactions: n.number_of_new_transactions,
            random_transactions: n.number_of_random_transaction_requests,
            all_transactions: n.number_of_all_transactions,
            invalid_transactions: n.number_of_invalid_transactions,
            sent_transactions: n.number_of_sent_transactions,
        }
    }
}

impl NodeClient for HttpNodeClient {
    fn node_info(&self) -> Result<NodeSnapshot, ClientError> {
        self.command::<NodeInfoResponse>("getNodeInfo")
            .map(NodeSnapshot::from)
    }

    fn neighbors(&self) -> Result<Vec<NeighborStat>, ClientError> {
        let body = self.command::<NeighborsResponse>("getNeighbors")?;
        Ok(body.neighbors.into_iter().map(NeighborStat::from).collect())
    }
}
