//! Records delivered by a broker subscription

use chrono::{DateTime, Local};

/// A single message read from a topic
///
/// The payload is kept as raw bytes; whether it is text is only decided when
/// a consumption job renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Topic the record was published to
    pub topic: String,
    /// Per-topic monotonic offset, starting at 1
    pub offset: u64,
    /// Time the broker accepted the record
    pub timestamp: DateTime<Local>,
    /// Message payload
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(topic: impl Into<String>, offset: u64, value: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            offset,
            timestamp: Local::now(),
            value,
        }
    }
}

/// Snapshot of the cluster as seen by the admin side of a broker client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterTopology {
    /// `host:port` of every broker in the cluster
    pub brokers: Vec<String>,
    /// All topic names
    pub topics: Vec<String>,
    /// `(group id, protocol type)` pairs
    pub consumer_groups: Vec<(String, String)>,
}
