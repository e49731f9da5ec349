use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Period of the countdown tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A running countdown tick task.
///
/// Every `period` the task sends its generation on the channel. Dropping the
/// handle aborts the task.
#[derive(Debug)]
pub struct TickHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Spawn the tick task on the current tokio runtime.
    #[must_use]
    pub fn spawn(generation: u64, period: Duration, sink: UnboundedSender<u64>) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick resolves immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if sink.send(generation).is_err() {
                    break;
                }
            }
        });
        Self { generation, task }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
