//! CoordinatorHandle - client interface to a running Coordinator

use eyre::{Result, eyre};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::messages::{ControlRequest, CoordinatorSnapshot};

/// Handle for observers and the fleet supervisor
///
/// Cloneable; it never touches coordinator state directly.
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<ControlRequest>,
}

impl CoordinatorHandle {
    pub(crate) fn new(tx: mpsc::Sender<ControlRequest>) -> Self {
        debug!("CoordinatorHandle::new: called");
        Self { tx }
    }

    /// Get a snapshot of packages, positions, activity and metrics
    pub async fn snapshot(&self) -> Result<CoordinatorSnapshot> {
        debug!("CoordinatorHandle::snapshot: called");
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(ControlRequest::Snapshot { reply_tx })
            .await
            .map_err(|_| eyre!("Coordinator channel closed"))?;

        debug!("CoordinatorHandle::snapshot: waiting for reply");
        reply_rx.await.map_err(|_| eyre!("Coordinator shutdown before reply"))
    }

    /// Ask the coordinator to stop its dispatch loop
    pub async fn shutdown(&self) -> Result<()> {
        debug!("CoordinatorHandle::shutdown: called");
        self.tx
            .send(ControlRequest::Shutdown)
            .await
            .map_err(|_| eyre!("Coordinator channel closed"))?;

        debug!("CoordinatorHandle::shutdown: sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_fails_when_coordinator_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let handle = CoordinatorHandle::new(tx);
        let err = handle.snapshot().await.unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[tokio::test]
    async fn test_shutdown_sends_request() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = CoordinatorHandle::new(tx);

        handle.shutdown().await.unwrap();
        assert!(matches!(rx.recv().await, Some(ControlRequest::Shutdown)));
    }
}
