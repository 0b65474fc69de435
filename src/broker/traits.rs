//! Traits at the seam between the console core and a broker client

use super::{BrokerResult, ClusterTopology, Record};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// An already-subscribed stream of records for one topic
#[async_trait]
pub trait MessageStream: Send {
    /// Topic this stream is subscribed to
    fn topic(&self) -> &str;

    /// Wait at most `timeout` for the next record
    ///
    /// Returns `Ok(None)` when the wait elapsed with nothing to deliver. Records
    /// come back in the order the topic holds them.
    async fn poll(&mut self, timeout: Duration) -> BrokerResult<Option<Record>>;
}

/// Produce side of a broker client
#[async_trait]
pub trait Producer: Send + Sync {
    /// Append `value` to `topic`, returning the offset it was stored at
    async fn send(&self, topic: &str, value: Vec<u8>) -> BrokerResult<u64>;
}

/// Connection to a cluster: subscribing, producing and topology listing
#[async_trait]
pub trait Broker: Send + Sync {
    /// Subscribe to `topic` as a member of consumer group `group`
    async fn subscribe(&self, topic: &str, group: &str) -> BrokerResult<Box<dyn MessageStream>>;

    /// Handle for sending records
    fn producer(&self) -> Arc<dyn Producer>;

    /// Brokers, topics and consumer groups currently known to the cluster
    async fn topology(&self) -> BrokerResult<ClusterTopology>;
}
