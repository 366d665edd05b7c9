/// Snapshot of the node-level statistics returned by `getNodeInfo`.
///
/// Every field is optional: a field the node did not report leaves the
/// corresponding gauge untouched instead of resetting it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeSnapshot {
    /// Number of cores available to the node's JVM.
    pub available_processors: Option<i64>,
    /// Free JVM memory, in bytes.
    pub free_memory: Option<i64>,
    /// Maximum JVM memory, in bytes.
    pub max_memory: Option<i64>,
    /// Total JVM memory, in bytes.
    pub total_memory: Option<i64>,
    /// Index of the latest milestone seen by the node.
    pub latest_milestone_index: Option<i64>,
    /// Index of the latest solid subtangle milestone.
    pub latest_subtangle_milestone_index: Option<i64>,
    /// Number of neighbors as reported by `getNodeInfo`.
    pub neighbors: Option<i64>,
    /// Number of tips.
    pub tips: Option<i64>,
    /// Transactions queued for request (`transactionsToRequest`).
    pub transactions_queued: Option<i64>,
}
