use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::KeyValueStore;

/// Message for asynchronous preference writes
struct WriteMessage {
    key: &'static str,
    value: String,
}

/// Fire-and-forget writer in front of a [`KeyValueStore`]
///
/// Writes are queued on a channel and applied in order by a background task,
/// so state changes never wait on storage.
#[derive(Clone)]
pub struct StoreWriter {
    write_tx: mpsc::UnboundedSender<WriteMessage>,
}

/// Handle for gracefully shutting down the store writer
pub struct StoreWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl StoreWriterHandle {
    /// Signals the writer to stop and waits until every queued write is applied
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Store writer shutdown signal sent");
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Store writer task failed");
        }
    }
}

impl StoreWriter {
    /// Spawns the background write task for `store`
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> (Self, StoreWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            Self::writer_task(store, write_rx, shutdown_rx).await;
        });

        (Self { write_tx }, StoreWriterHandle { shutdown_tx, task })
    }

    async fn writer_task(
        store: Arc<dyn KeyValueStore>,
        mut write_rx: mpsc::UnboundedReceiver<WriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(store = store.name(), "Store writer task started");

        loop {
            tokio::select! {
                biased;

                Some(msg) = write_rx.recv() => {
                    Self::apply(store.as_ref(), msg).await;
                }
                // A dropped handle closes this channel; the writer then runs
                // until every StoreWriter is gone
                Some(()) = shutdown_rx.recv() => {
                    let mut flushed = 0;
                    while let Ok(msg) = write_rx.try_recv() {
                        Self::apply(store.as_ref(), msg).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Store writer task stopped");
                    break;
                }
                else => break,
            }
        }
    }

    async fn apply(store: &dyn KeyValueStore, msg: WriteMessage) {
        if let Err(e) = store.set(msg.key, &msg.value).await {
            tracing::error!(error = %e, key = msg.key, "Failed to persist preference");
        }
    }

    /// Queues a write without waiting for it to complete
    pub fn set_in_background(&self, key: &'static str, value: String) {
        let msg = WriteMessage { key, value };
        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, key, "Failed to queue preference write");
        }
    }

    /// Serializes `value` as JSON and queues the write
    pub fn set_json_in_background<T: serde::Serialize>(&self, key: &'static str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.set_in_background(key, json),
            Err(e) => tracing::error!(error = %e, key, "Preference serialization error"),
        }
    }
}
