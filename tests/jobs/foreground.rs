//! The foreground job blocks the console until an interrupt stops it

use crate::common::{eventually, Fixture, DEADLINE};
use topicsh::jobs::api::{ConsumeOutcome, InterruptOutcome};

#[tokio::test]
async fn test_interrupt_stops_foreground_job() {
    let mut fx = Fixture::new();
    let control = fx.control.clone();
    let output = fx.output.clone();
    let broker = fx.broker.clone();

    let interrupter = tokio::spawn(async move {
        assert!(eventually(|| control.is_active()).await);
        broker
            .create_topic("x")
            .expect("topic");
        assert_eq!(control.interrupt(), InterruptOutcome::StopRequested);
    });

    let outcome = tokio::time::timeout(DEADLINE, fx.jobs.start_consume("x", false))
        .await
        .expect("foreground job did not stop")
        .unwrap();
    interrupter.await.unwrap();

    match outcome {
        ConsumeOutcome::Foreground(summary) => assert_eq!(summary.topic, "x"),
        other => panic!("expected a foreground summary, got {:?}", other),
    }
    assert!(output.contains("job consuming x exiting"));
    assert!(!fx.control.is_active());
    assert!(!fx.control.stop_requested());
}

#[tokio::test]
async fn test_interrupt_without_foreground_job_means_exit() {
    let fx = Fixture::new();
    assert_eq!(fx.control.interrupt(), InterruptOutcome::Exit);
}

#[tokio::test]
async fn test_background_jobs_survive_foreground_interrupt() {
    let mut fx = Fixture::new();
    fx.jobs.start_consume("bg", true).await.unwrap();

    let control = fx.control.clone();
    tokio::spawn(async move {
        if eventually(|| control.is_active()).await {
            control.interrupt();
        }
    });
    tokio::time::timeout(DEADLINE, fx.jobs.start_consume("fg", false))
        .await
        .expect("foreground job did not stop")
        .unwrap();

    fx.publish("bg", b"still here").await;
    let output = fx.output.clone();
    assert!(eventually(|| output.contains("[bg]: still here")).await);
    assert!(!output.contains("job consuming bg exiting"));
    assert_eq!(fx.jobs.list_jobs().len(), 1);
    fx.jobs.shutdown();
}
