//! Fleet supervisor: one coordinator plus N units on a shared switchboard

use eyre::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::coordinator::{Coordinator, CoordinatorHandle, CoordinatorSnapshot};
use crate::dice::dice_from_seed;
use crate::domain::AgentId;
use crate::transport::Switchboard;
use crate::unit::UnitAgent;

struct UnitTask {
    id: AgentId,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

/// A running fleet
///
/// Must be launched from within a tokio runtime.
pub struct Fleet {
    switchboard: Switchboard,
    coordinator: CoordinatorHandle,
    coordinator_task: JoinHandle<()>,
    units: Vec<UnitTask>,
}

impl Fleet {
    /// Spawn the coordinator and every unit
    pub fn launch(config: &Config) -> Result<Self> {
        config.validate().context("Invalid fleet configuration")?;

        let switchboard = Switchboard::new();
        let coordinator_id = AgentId::new(config.coordinator.address.clone());
        let transport = switchboard
            .register(coordinator_id.clone(), config.coordinator.channel_buffer)
            .context("Failed to register coordinator")?;

        let seed = config.fleet.seed;
        let coordinator = Coordinator::new(config.coordinator.clone(), Box::new(transport), dice_from_seed(seed));
        let handle = coordinator.handle();
        let coordinator_task = tokio::spawn(coordinator.run());

        let mut units = Vec::with_capacity(config.fleet.units);
        for index in 1..=config.fleet.units {
            let id = AgentId::unit(&config.fleet.unit_prefix, index);
            let transport = switchboard
                .register(id.clone(), config.unit.channel_buffer)
                .context(format!("Failed to register {}", id))?;
            let unit_seed = seed.map(|s| s.wrapping_add(index as u64));
            let agent = UnitAgent::new(
                config.unit.clone(),
                coordinator_id.clone(),
                Box::new(transport),
                dice_from_seed(unit_seed),
            );

            let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
            let task = tokio::spawn(agent.run(shutdown_rx));
            units.push(UnitTask { id, shutdown_tx, task });
        }

        info!(
            coordinator = %coordinator_id,
            units = units.len(),
            seed = ?seed,
            "Fleet launched"
        );

        Ok(Self {
            switchboard,
            coordinator: handle,
            coordinator_task,
            units,
        })
    }

    pub fn coordinator(&self) -> &CoordinatorHandle {
        &self.coordinator
    }

    pub fn unit_ids(&self) -> Vec<AgentId> {
        self.units.iter().map(|u| u.id.clone()).collect()
    }

    /// Addresses currently reachable on the switchboard
    pub fn addresses(&self) -> Vec<AgentId> {
        self.switchboard.addresses()
    }

    /// Stop every unit, take a final snapshot, then stop the coordinator
    pub async fn shutdown(self) -> Result<CoordinatorSnapshot> {
        info!("Fleet shutting down");

        for unit in &self.units {
            let _ = unit.shutdown_tx.send(()).await;
        }
        for unit in self.units {
            if let Err(e) = unit.task.await {
                warn!(unit = %unit.id, error = %e, "Unit task failed");
            }
        }

        let snapshot = self.coordinator.snapshot().await.context("Failed to take final snapshot")?;
        self.coordinator.shutdown().await?;
        if let Err(e) = self.coordinator_task.await {
            warn!(error = %e, "Coordinator task failed");
        }

        info!(live_packages = snapshot.packages.len(), "Fleet stopped");
        Ok(snapshot)
    }
}
