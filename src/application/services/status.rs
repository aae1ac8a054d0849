//! Periodic presence status rotation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::application::errors::BotError;

/// Capability for pushing a presence status line to the platform
#[async_trait]
pub trait Presence: Send + Sync {
    async fn set_status(&self, text: &str) -> Result<(), BotError>;
}

/// Rotates the bot's status line on a fixed interval, on its own task,
/// independent of message dispatch. Runs a bounded number of rounds and
/// honors an explicit stop signal between ticks; a failed update is logged
/// and the rotation continues.
pub struct StatusRotator {
    statuses: Vec<String>,
    period: Duration,
    rounds: u64,
}

/// Stop signal plus join handle for a running rotator
pub struct StatusHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl StatusHandle {
    /// Signal the rotator to stop and wait for it to wind down
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.task.await;
    }

    /// Wait for the rotator to finish its rounds naturally
    pub async fn join(self) {
        let StatusHandle { stop, task } = self;
        let _ = task.await;
        drop(stop);
    }
}

impl StatusRotator {
    pub fn new(statuses: Vec<String>, period: Duration, rounds: u64) -> Self {
        Self {
            statuses,
            period,
            rounds,
        }
    }

    pub fn spawn<P: Presence + 'static>(self, presence: Arc<P>) -> StatusHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            if self.statuses.is_empty() {
                return;
            }

            let mut interval = tokio::time::interval(self.period);

            for _ in 0..self.rounds {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {}
                }

                let Some(status) = self.statuses.choose(&mut rand::thread_rng()) else {
                    break;
                };

                if let Err(err) = presence.set_status(status).await {
                    tracing::warn!("failed to set status: {}", err);
                    continue;
                }

                tracing::debug!("set status to {}", status);
            }
        });

        StatusHandle {
            stop: stop_tx,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingPresence {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Presence for RecordingPresence {
        async fn set_status(&self, text: &str) -> Result<(), BotError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn rotator_runs_exactly_its_rounds() {
        let presence = Arc::new(RecordingPresence::default());
        let rotator = StatusRotator::new(
            vec!["Meow!".to_string(), "Playing with catnips!".to_string()],
            Duration::from_millis(1),
            3,
        );

        rotator.spawn(Arc::clone(&presence)).join().await;

        let seen = presence.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen
            .iter()
            .all(|status| status == "Meow!" || status == "Playing with catnips!"));
    }

    #[tokio::test]
    async fn stop_signal_halts_the_rotation() {
        let presence = Arc::new(RecordingPresence::default());
        let rotator = StatusRotator::new(
            vec!["Meow!".to_string()],
            Duration::from_millis(50),
            10_000,
        );

        let handle = rotator.spawn(Arc::clone(&presence));
        handle.shutdown().await;

        // at most the immediate first tick ran before the stop landed
        assert!(presence.seen.lock().unwrap().len() <= 1);
    }

    #[tokio::test]
    async fn empty_status_list_finishes_immediately() {
        let presence = Arc::new(RecordingPresence::default());
        let rotator = StatusRotator::new(Vec::new(), Duration::from_millis(1), 100);

        rotator.spawn(Arc::clone(&presence)).join().await;

        assert!(presence.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_updates_do_not_end_the_rotation() {
        struct FailingPresence {
            calls: Mutex<u32>,
        }

        #[async_trait]
        impl Presence for FailingPresence {
            async fn set_status(&self, _text: &str) -> Result<(), BotError> {
                *self.calls.lock().unwrap() += 1;
                Err(BotError::Network("down".to_string()))
            }
        }

        let presence = Arc::new(FailingPresence {
            calls: Mutex::new(0),
        });
        let rotator = StatusRotator::new(vec!["Meow!".to_string()], Duration::from_millis(1), 3);

        rotator.spawn(Arc::clone(&presence)).join().await;

        assert_eq!(*presence.calls.lock().unwrap(), 3);
    }
}
