//! Background jobs run next to the console until killed

use crate::common::{eventually, Fixture};
use topicsh::jobs::api::{ConsumeOutcome, JobError, JobId};

#[tokio::test]
async fn test_register_list_kill_scenario() {
    let mut fx = Fixture::new();

    let a = fx.jobs.start_consume("a", true).await.unwrap();
    let b = fx.jobs.start_consume("b", true).await.unwrap();
    assert_eq!(a, ConsumeOutcome::Background(JobId(1)));
    assert_eq!(b, ConsumeOutcome::Background(JobId(2)));

    let listed: Vec<(JobId, String)> = fx
        .jobs
        .list_jobs()
        .into_iter()
        .map(|info| (info.id, info.descriptor.topic().to_string()))
        .collect();
    assert_eq!(listed, vec![(JobId(1), "a".to_string()), (JobId(2), "b".to_string())]);

    fx.jobs.kill_job(JobId(1)).unwrap();
    let remaining: Vec<JobId> = fx.jobs.list_jobs().iter().map(|info| info.id).collect();
    assert_eq!(remaining, vec![JobId(2)]);

    assert!(matches!(
        fx.jobs.kill_job(JobId(1)),
        Err(JobError::NotFound { id: JobId(1) })
    ));
    assert!(eventually(|| fx.output.contains("job consuming a exiting")).await);
    assert!(!fx.output.contains("job consuming b exiting"));

    fx.jobs.shutdown();
}

#[tokio::test]
async fn test_background_jobs_print_their_own_topics() {
    let mut fx = Fixture::new();
    fx.jobs.start_consume("orders", true).await.unwrap();
    fx.jobs.start_consume("payments", true).await.unwrap();

    fx.publish("orders", b"o-1").await;
    fx.publish("payments", &[0xff, 0xfe]).await;
    fx.publish("orders", b"o-2").await;

    let output = fx.output.clone();
    assert!(eventually(|| output.contains("[orders]: o-2")).await);
    assert!(eventually(|| output.contains("[payments]: b\"\\xff\\xfe\"")).await);

    let orders: Vec<String> = output
        .lines()
        .into_iter()
        .filter(|line| line.starts_with("[orders]"))
        .collect();
    assert_eq!(orders, vec!["[orders]: o-1", "[orders]: o-2"]);

    assert_eq!(fx.jobs.shutdown(), 2);
}

#[tokio::test]
async fn test_ids_are_not_reused_after_kill() {
    let mut fx = Fixture::new();
    fx.jobs.start_consume("a", true).await.unwrap();
    fx.jobs.start_consume("b", true).await.unwrap();
    fx.jobs.kill_job(JobId(1)).unwrap();

    let next = fx.jobs.start_consume("c", true).await.unwrap();
    assert_eq!(next, ConsumeOutcome::Background(JobId(3)));
    fx.jobs.shutdown();
}

#[tokio::test]
async fn test_killed_job_releases_its_subscription() {
    let mut fx = Fixture::new();
    fx.jobs.start_consume("orders", true).await.unwrap();
    assert_eq!(fx.broker.subscription_count(), 1);

    fx.jobs.kill_job(JobId(1)).unwrap();
    let broker = fx.broker.clone();
    assert!(eventually(|| broker.subscription_count() == 0).await);
}
