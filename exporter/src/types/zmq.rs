/// Values sampled from the node's ZeroMQ feed at scrape time.
///
/// The first three fields are running totals maintained by the feed
/// listener; the `rstat` fields are the most recent point-in-time values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZmqStat {
    /// Number of `tx` messages seen.
    pub seen_tx: i64,
    /// Number of `tx` messages carrying a nonzero value.
    pub txs_with_value: i64,
    /// Number of `sn` (confirmed transaction) messages seen.
    pub confirmed_tx: i64,
    pub to_process: i64,
    pub to_broadcast: i64,
    pub to_request: i64,
    pub to_reply: i64,
    pub total_transactions: i64,
}
