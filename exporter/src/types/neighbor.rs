/// Per-peer transaction statistics returned by `getNeighbors`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborStat {
    /// Opaque peer identifier, used as the `id` label value.
    pub id: String,
    pub new_transactions: i64,
    pub random_transactions: i64,
    pub all_transactions: i64,
    pub invalid_transactions: i64,
    pub sent_transactions: i64,
}

impl NeighborStat {
    /// Returns `true` if the peer reported any transaction traffic.
    pub fn is_active(&self) -> bool {
        self.all_transactions != 0
    }
}

/// Counts the active peers in a neighbor list.
pub fn count_active(neighbors: &[NeighborStat]) -> usize {
    neighbors.iter().filter(|n| n.is_active()).count()
}
