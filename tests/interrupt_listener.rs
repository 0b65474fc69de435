//! The interrupt listener owns SIGINT as soon as it is spawned
//!
//! Kept in its own test binary: it raises a real SIGINT in this process.

#![cfg(unix)]

use std::time::Duration;
use topicsh::jobs::api::{spawn_listener, ForegroundControl};

#[tokio::test]
async fn test_interrupt_raised_before_listener_runs_is_delivered() {
    let control = ForegroundControl::new();
    let guard = control.acquire().unwrap();

    let _listener = spawn_listener(control.clone()).unwrap();
    // no await in between: the listener task has not been polled yet
    assert_eq!(unsafe { libc::raise(libc::SIGINT) }, 0);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !guard.stop_requested() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(guard.stop_requested());
    drop(guard);
    assert!(!control.is_active());
}
