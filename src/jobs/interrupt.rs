//! Interrupt listener
//!
//! Translates Ctrl-C into either a stop request for the foreground job or a
//! clean exit of the whole console. The decision itself lives in
//! [`ForegroundControl::interrupt`]; this task only waits for the signal and
//! acts on the outcome, keeping message rendering off the signal path.

use super::{ForegroundControl, InterruptOutcome};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Spawn the task that waits for interrupts for the rest of the process
///
/// The handler is registered before this returns, so an interrupt that
/// arrives before the task first runs is still routed through it.
pub fn spawn_listener(control: Arc<ForegroundControl>) -> std::io::Result<JoinHandle<()>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        // Default SIGPIPE so `topicsh | head` ends quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        let mut interrupts = signal(SignalKind::interrupt())?;
        Ok(tokio::spawn(async move {
            while interrupts.recv().await.is_some() {
                handle_interrupt(&control);
            }
            log::warn!("Interrupt stream closed");
        }))
    }

    #[cfg(not(unix))]
    {
        Ok(tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::warn!("Cannot listen for interrupts: {}", e);
                    break;
                }
                handle_interrupt(&control);
            }
        }))
    }
}

fn handle_interrupt(control: &ForegroundControl) {
    match control.interrupt() {
        InterruptOutcome::StopRequested => {
            log::debug!("interrupt delivered to the foreground job");
            eprintln!("stopping foreground job");
        }
        InterruptOutcome::Exit => {
            log::info!("interrupt with no foreground job, exiting");
            std::process::exit(0);
        }
    }
}
