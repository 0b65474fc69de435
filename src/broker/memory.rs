//! In-process broker backend
//!
//! Every topic is an append-only log with offsets starting at 1. Each
//! subscription keeps its own read position and starts at the head of the log,
//! so it only sees records published after it subscribed. Waiting readers are
//! woken through a per-topic `Notify` when new records land.

use super::{
    Broker, BrokerError, BrokerResult, ClusterTopology, MessageStream, Producer, Record,
};
use crate::core::sync::handle_mutex_poison;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Notify;

/// Records kept per topic before the oldest are evicted
pub const DEFAULT_MAX_RECORDS_PER_TOPIC: usize = 10_000;

/// Longest topic name accepted, matching common broker limits
const MAX_TOPIC_NAME_LEN: usize = 249;

/// Protocol type reported for console subscriptions in topology listings
const CONSUMER_PROTOCOL: &str = "consumer";

fn poisoned(message: String) -> BrokerError {
    BrokerError::OperationFailed { message }
}

/// Check a topic name against the characters brokers accept
pub fn validate_topic_name(topic: &str) -> BrokerResult<()> {
    let invalid = |reason: &str| BrokerError::InvalidTopic {
        topic: topic.to_string(),
        reason: reason.to_string(),
    };

    if topic.is_empty() {
        return Err(invalid("name is empty"));
    }
    if topic == "." || topic == ".." {
        return Err(invalid("name cannot be '.' or '..'"));
    }
    if topic.len() > MAX_TOPIC_NAME_LEN {
        return Err(invalid("name is longer than 249 characters"));
    }
    if let Some(c) = topic
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(invalid(&format!("character {:?} is not allowed", c)));
    }
    Ok(())
}

#[derive(Debug)]
struct TopicState {
    next_offset: u64,
    records: VecDeque<Arc<Record>>,
}

#[derive(Debug)]
struct TopicLog {
    name: String,
    state: RwLock<TopicState>,
    notify: Notify,
    max_records: usize,
}

impl TopicLog {
    fn new(name: String, max_records: usize) -> Self {
        Self {
            name,
            state: RwLock::new(TopicState {
                next_offset: 1,
                records: VecDeque::new(),
            }),
            notify: Notify::new(),
            max_records,
        }
    }

    fn head_offset(&self) -> BrokerResult<u64> {
        let state = handle_mutex_poison(self.state.read(), poisoned)?;
        Ok(state.next_offset)
    }

    fn append(&self, value: Vec<u8>) -> BrokerResult<u64> {
        let offset = {
            let mut state = handle_mutex_poison(self.state.write(), poisoned)?;
            let offset = state.next_offset;
            state.next_offset += 1;
            state
                .records
                .push_back(Arc::new(Record::new(self.name.clone(), offset, value)));
            while state.records.len() > self.max_records {
                state.records.pop_front();
            }
            offset
        };
        self.notify.notify_waiters();
        Ok(offset)
    }

    /// First retained record at or after `position`
    fn read_from(&self, position: u64) -> BrokerResult<Option<Arc<Record>>> {
        let state = handle_mutex_poison(self.state.read(), poisoned)?;
        let Some(first) = state.records.front().map(|r| r.offset) else {
            return Ok(None);
        };
        let index = position.saturating_sub(first) as usize;
        Ok(state.records.get(index).cloned())
    }
}

#[derive(Debug, Clone)]
struct Subscription {
    topic: String,
    group: String,
}

#[derive(Debug)]
struct BrokerState {
    brokers: Vec<String>,
    topics: RwLock<BTreeMap<String, Arc<TopicLog>>>,
    subscriptions: RwLock<HashMap<u64, Subscription>>,
    next_subscription_id: AtomicU64,
    max_records_per_topic: usize,
    closed: AtomicBool,
}

impl BrokerState {
    fn topic_log(&self, topic: &str) -> BrokerResult<Arc<TopicLog>> {
        validate_topic_name(topic)?;
        {
            let topics = handle_mutex_poison(self.topics.read(), poisoned)?;
            if let Some(existing) = topics.get(topic) {
                return Ok(Arc::clone(existing));
            }
        }
        let mut topics = handle_mutex_poison(self.topics.write(), poisoned)?;
        let created = topics.entry(topic.to_string()).or_insert_with(|| {
            log::info!("auto-creating topic '{}'", topic);
            Arc::new(TopicLog::new(topic.to_string(), self.max_records_per_topic))
        });
        Ok(Arc::clone(created))
    }

    fn ensure_open(&self, topic: &str) -> BrokerResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BrokerError::Disconnected {
                topic: topic.to_string(),
            });
        }
        Ok(())
    }
}

/// Broker that keeps every topic in process memory
///
/// Cheap to clone; clones share the same topics and subscriptions.
#[derive(Debug, Clone)]
pub struct MemoryBroker {
    state: Arc<BrokerState>,
}

impl MemoryBroker {
    /// Create a broker advertising `brokers` as its cluster members
    pub fn new(brokers: Vec<String>) -> Self {
        Self::with_capacity(brokers, DEFAULT_MAX_RECORDS_PER_TOPIC)
    }

    pub fn with_capacity(brokers: Vec<String>, max_records_per_topic: usize) -> Self {
        Self {
            state: Arc::new(BrokerState {
                brokers,
                topics: RwLock::new(BTreeMap::new()),
                subscriptions: RwLock::new(HashMap::new()),
                next_subscription_id: AtomicU64::new(1),
                max_records_per_topic: max_records_per_topic.max(1),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Create `topic` up front so it shows in topology listings
    pub fn create_topic(&self, topic: &str) -> BrokerResult<()> {
        self.state.topic_log(topic).map(|_| ())
    }

    /// Number of live subscriptions across all topics
    pub fn subscription_count(&self) -> usize {
        self.state
            .subscriptions
            .read()
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Next offset `topic` will assign, or `None` if the topic does not exist
    pub fn head_offset(&self, topic: &str) -> BrokerResult<Option<u64>> {
        let topics = handle_mutex_poison(self.state.topics.read(), poisoned)?;
        match topics.get(topic) {
            Some(topic_log) => topic_log.head_offset().map(Some),
            None => Ok(None),
        }
    }

    /// Drop the connection: pending and future operations fail with `Disconnected`
    pub fn close(&self) {
        self.state.closed.store(true, Ordering::Release);
        if let Ok(topics) = self.state.topics.read() {
            for topic_log in topics.values() {
                topic_log.notify.notify_waiters();
            }
        }
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    async fn subscribe(&self, topic: &str, group: &str) -> BrokerResult<Box<dyn MessageStream>> {
        self.state.ensure_open(topic)?;
        let topic_log = self.state.topic_log(topic)?;
        let position = topic_log.head_offset()?;
        let id = self
            .state
            .next_subscription_id
            .fetch_add(1, Ordering::SeqCst);

        handle_mutex_poison(self.state.subscriptions.write(), poisoned)?.insert(
            id,
            Subscription {
                topic: topic.to_string(),
                group: group.to_string(),
            },
        );
        log::debug!(
            "subscription {} joined group '{}' on topic '{}' at offset {}",
            id,
            group,
            topic,
            position
        );

        Ok(Box::new(MemoryStream {
            id,
            log: topic_log,
            position,
            state: Arc::clone(&self.state),
        }))
    }

    fn producer(&self) -> Arc<dyn Producer> {
        Arc::new(MemoryProducer {
            state: Arc::clone(&self.state),
        })
    }

    async fn topology(&self) -> BrokerResult<ClusterTopology> {
        let topics = handle_mutex_poison(self.state.topics.read(), poisoned)?
            .keys()
            .cloned()
            .collect();

        let mut consumer_groups: Vec<(String, String)> =
            handle_mutex_poison(self.state.subscriptions.read(), poisoned)?
                .values()
                .map(|sub| (sub.group.clone(), CONSUMER_PROTOCOL.to_string()))
                .collect();
        consumer_groups.sort();
        consumer_groups.dedup();

        Ok(ClusterTopology {
            brokers: self.state.brokers.clone(),
            topics,
            consumer_groups,
        })
    }
}

/// Subscription handle with an independent read position
pub struct MemoryStream {
    id: u64,
    log: Arc<TopicLog>,
    position: u64,
    state: Arc<BrokerState>,
}

#[async_trait]
impl MessageStream for MemoryStream {
    fn topic(&self) -> &str {
        &self.log.name
    }

    async fn poll(&mut self, timeout: Duration) -> BrokerResult<Option<Record>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            // Register interest before checking so a publish in between is not missed
            let notified = self.log.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            self.state.ensure_open(&self.log.name)?;
            if let Some(record) = self.log.read_from(self.position)? {
                self.position = record.offset + 1;
                return Ok(Some(record.as_ref().clone()));
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(None);
            }
        }
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        if let Ok(mut subs) = self.state.subscriptions.write() {
            if let Some(sub) = subs.remove(&self.id) {
                log::debug!(
                    "subscription {} of group '{}' left topic '{}'",
                    self.id,
                    sub.group,
                    sub.topic
                );
            }
        }
    }
}

struct MemoryProducer {
    state: Arc<BrokerState>,
}

#[async_trait]
impl Producer for MemoryProducer {
    async fn send(&self, topic: &str, value: Vec<u8>) -> BrokerResult<u64> {
        self.state.ensure_open(topic)?;
        self.state.topic_log(topic)?.append(value)
    }
}
