//! Runs transition deadlines on tokio.
//!
//! The driver sleeps until the grid's next transition deadline, ticks the
//! grid, and goes back to sleep. When nothing is pending it blocks on the
//! wakeup channel, which the grid signals whenever a data source update
//! may have scheduled new deadlines.

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::grid::Grid;
use crate::identity::{RowData, RowKey};

/// Sender half of the wakeup channel.
#[derive(Debug, Clone)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Non-blocking. A full or closed channel is ignored.
    pub fn send(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Receiver half of the wakeup channel.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

pub fn channel() -> (WakeupSender, WakeupReceiver) {
    // Signals only wake the driver, they don't need to queue up.
    let (tx, rx) = mpsc::channel(16);
    (WakeupSender { tx }, WakeupReceiver { rx })
}

/// Background task firing a grid's transition deadlines.
///
/// Dropping the driver stops it. [`Grid::teardown`] stops it too.
#[derive(Debug)]
pub struct TransitionDriver {
    task: JoinHandle<()>,
}

impl TransitionDriver {
    /// Spawn a driver for `grid` on the current tokio runtime.
    pub fn spawn<T: RowData, K: RowKey>(grid: &Grid<T, K>) -> Self {
        let (tx, mut rx) = channel();
        grid.install_wakeup(tx);
        let grid = grid.clone();

        let task = tokio::spawn(async move {
            debug!("transition driver started for {}", grid.id());
            loop {
                match grid.next_transition_deadline() {
                    Some(deadline) => {
                        tokio::select! {
                            _ = sleep_until(deadline) => {
                                grid.tick_at(Instant::now());
                            }
                            wake = rx.recv() => {
                                if wake.is_none() {
                                    break;
                                }
                            }
                        }
                    }
                    None => {
                        if rx.recv().await.is_none() {
                            break;
                        }
                    }
                }
            }
            debug!("transition driver for {} stopped", grid.id());
        });

        Self { task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for TransitionDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}
