//! Domain types produced by a single scrape.
//!
//! These are the exporter-side views of what the IRI node reports. They are
//! deliberately decoupled from the JSON wire shapes used by
//! [`crate::node_client::HttpNodeClient`] so that the metric mapping in
//! [`crate::metrics`] never depends on serde field names.

pub mod neighbor;
pub mod node;
pub mod zmq;

pub use neighbor::NeighborStat;
pub use node::NodeSnapshot;
pub use zmq::ZmqStat;
