//! Input debouncing for backend search
//!
//! Values pushed in quick succession collapse into the last one, emitted once
//! the input has been quiet for the configured delay. Must be created inside a
//! tokio runtime.

use std::time::Duration;
use tokio::sync::mpsc;

/// Default quiet period before a backend search fires
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debouncing task; settled values arrive on the returned receiver
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (in_tx, mut in_rx) = mpsc::unbounded_channel::<T>();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(mut latest) = in_rx.recv().await {
                loop {
                    tokio::select! {
                        next = in_rx.recv() => match next {
                            Some(value) => latest = value,
                            // all senders gone: flush what we have
                            None => break,
                        },
                        _ = tokio::time::sleep(delay) => break,
                    }
                }
                if out_tx.send(latest).is_err() {
                    break;
                }
            }
        });

        (Self { tx: in_tx }, out_rx)
    }

    /// Queue a value, restarting the quiet period. `false` once the task is gone.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}
