//! In-process broker behaviour

use crate::broker::{Broker, BrokerError, MemoryBroker, MessageStream};
use std::time::Duration;
use tokio::time::{timeout, Instant};

const WAIT: Duration = Duration::from_millis(100);

fn broker() -> MemoryBroker {
    MemoryBroker::new(vec!["localhost:9092".to_string()])
}

#[tokio::test]
async fn test_subscriber_starts_at_head() {
    let broker = broker();
    let producer = broker.producer();
    producer.send("orders", b"before".to_vec()).await.unwrap();

    let mut stream = broker.subscribe("orders", "g").await.unwrap();
    assert!(stream.poll(WAIT).await.unwrap().is_none());

    producer.send("orders", b"after".to_vec()).await.unwrap();
    let record = stream.poll(WAIT).await.unwrap().unwrap();
    assert_eq!(record.value, b"after");
    assert_eq!(record.offset, 2);
    assert_eq!(record.topic, "orders");
}

#[tokio::test]
async fn test_records_arrive_in_order_per_subscriber() {
    let broker = broker();
    let mut first = broker.subscribe("orders", "a").await.unwrap();
    let mut second = broker.subscribe("orders", "b").await.unwrap();

    let producer = broker.producer();
    for i in 0..5 {
        producer
            .send("orders", format!("m{}", i).into_bytes())
            .await
            .unwrap();
    }

    for stream in [&mut first, &mut second] {
        let mut seen = Vec::new();
        while let Some(record) = stream.poll(WAIT).await.unwrap() {
            seen.push(String::from_utf8(record.value).unwrap());
        }
        assert_eq!(seen, vec!["m0", "m1", "m2", "m3", "m4"]);
    }
}

#[tokio::test]
async fn test_topics_are_isolated() {
    let broker = broker();
    let mut orders = broker.subscribe("orders", "g").await.unwrap();
    broker.producer().send("audit", b"x".to_vec()).await.unwrap();

    assert!(orders.poll(WAIT).await.unwrap().is_none());
}

#[tokio::test]
async fn test_poll_returns_none_after_bounded_wait() {
    let broker = broker();
    let mut stream = broker.subscribe("idle", "g").await.unwrap();

    let started = Instant::now();
    let result = stream.poll(Duration::from_millis(50)).await.unwrap();

    assert!(result.is_none());
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_poll_wakes_on_publish() {
    let broker = broker();
    let mut stream = broker.subscribe("orders", "g").await.unwrap();

    let producer = broker.producer();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        producer.send("orders", b"late".to_vec()).await.unwrap();
    });

    let record = timeout(Duration::from_secs(2), stream.poll(Duration::from_secs(5)))
        .await
        .expect("poll should wake before its own timeout")
        .unwrap()
        .unwrap();
    assert_eq!(record.value, b"late");
}

#[tokio::test]
async fn test_retention_evicts_oldest() {
    let broker = MemoryBroker::with_capacity(vec!["localhost:9092".to_string()], 2);
    let mut stream = broker.subscribe("orders", "g").await.unwrap();
    let producer = broker.producer();
    for value in ["a", "b", "c"] {
        producer.send("orders", value.as_bytes().to_vec()).await.unwrap();
    }

    let record = stream.poll(WAIT).await.unwrap().unwrap();
    assert_eq!(record.value, b"b");
    assert_eq!(record.offset, 2);
    assert_eq!(broker.head_offset("orders").unwrap(), Some(4));
}

#[tokio::test]
async fn test_invalid_topic_is_rejected() {
    let broker = broker();
    let err = broker.subscribe("bad topic", "g").await.err().unwrap();
    assert!(matches!(err, BrokerError::InvalidTopic { .. }));

    let err = broker.producer().send("", b"x".to_vec()).await.unwrap_err();
    assert!(matches!(err, BrokerError::InvalidTopic { .. }));
}

#[tokio::test]
async fn test_consumer_groups_track_live_subscriptions() {
    let broker = broker();
    let stream = broker.subscribe("orders", "console-1").await.unwrap();
    let _other = broker.subscribe("audit", "console-1").await.unwrap();
    assert_eq!(broker.subscription_count(), 2);

    let topology = broker.topology().await.unwrap();
    assert_eq!(
        topology.consumer_groups,
        vec![("console-1".to_string(), "consumer".to_string())]
    );

    drop(stream);
    assert_eq!(broker.subscription_count(), 1);
}

#[tokio::test]
async fn test_close_disconnects_waiting_stream() {
    let broker = broker();
    let mut stream = broker.subscribe("orders", "g").await.unwrap();

    let closer = broker.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        closer.close();
    });

    let err = timeout(Duration::from_secs(2), stream.poll(Duration::from_secs(5)))
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, BrokerError::Disconnected { .. }));
    assert_eq!(stream.topic(), "orders");
}
