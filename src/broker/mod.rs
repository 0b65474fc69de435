//! Broker client boundary
//!
//! The console only talks to a broker through the traits in this module:
//! a bounded-wait [`MessageStream`] for consuming, a [`Producer`] for sending
//! and [`Broker`] for subscribing and listing the cluster topology.
//!
//! [`MemoryBroker`] is the backend shipped with the console. It keeps topics
//! in process memory, which makes the job machinery fully exercisable without
//! a running cluster.
//!
//! ```rust,no_run
//! use topicsh::broker::{connect, Broker};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let broker = connect("localhost:9092", &[])?;
//! let mut stream = broker.subscribe("orders", "topicsh-console").await?;
//! broker.producer().send("orders", b"hello".to_vec()).await?;
//!
//! if let Some(record) = stream.poll(Duration::from_millis(500)).await? {
//!     println!("{} bytes at offset {}", record.value.len(), record.offset);
//! }
//! # Ok(())
//! # }
//! ```

mod bootstrap;
mod error;
mod memory;
mod message;
mod traits;

pub use bootstrap::{connect, parse_bootstrap_servers};
pub use error::{BrokerError, BrokerResult};
pub use memory::{validate_topic_name, MemoryBroker, MemoryStream, DEFAULT_MAX_RECORDS_PER_TOPIC};
pub use message::{ClusterTopology, Record};
pub use traits::{Broker, MessageStream, Producer};

#[cfg(test)]
mod tests;
