//! Unit driver: performs FSM effects over a transport

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::UnitConfig;
use super::error::UnitError;
use super::fsm::{Effect, UnitEvent, UnitState, transition};
use crate::dice::Dice;
use crate::domain::AgentId;
use crate::protocol::{Directive, Location, UnitReport};
use crate::transport::Transport;

/// Fraction of a trip completed after `step` of `steps`, rounded to two decimals
pub fn progress(step: u32, steps: u32) -> f64 {
    if steps == 0 {
        return 1.0;
    }
    let fraction = step as f64 / steps as f64;
    ((fraction * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

/// A transport unit talking to one coordinator
pub struct UnitAgent {
    config: UnitConfig,
    coordinator: AgentId,
    transport: Box<dyn Transport>,
    dice: Box<dyn Dice>,
    state: UnitState,
}

impl UnitAgent {
    pub fn new(config: UnitConfig, coordinator: AgentId, transport: Box<dyn Transport>, dice: Box<dyn Dice>) -> Self {
        Self {
            config,
            coordinator,
            transport,
            dice,
            state: UnitState::default(),
        }
    }

    pub fn id(&self) -> &AgentId {
        self.transport.address()
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    /// Perform the current state's effect and advance the machine
    pub async fn step(&mut self) -> Result<UnitState, UnitError> {
        let event = match self.state.entry_effect() {
            Effect::RequestTask => self.request_task().await?,
            Effect::Move { destination, may_drop } => self.travel(destination, may_drop).await,
            Effect::Report(report) => self.report(report).await,
        };

        let (next, _) = transition(self.state, event)?;
        if next != self.state {
            info!(unit = %self.id(), from = %self.state, to = %next, %event, "Unit state changed");
        }
        self.state = next;
        Ok(next)
    }

    async fn request_task(&mut self) -> Result<UnitEvent, UnitError> {
        if let Err(e) = self
            .transport
            .send(&self.coordinator, UnitReport::WaitingForTask.encode())
            .await
        {
            warn!(unit = %self.id(), error = %e, "Failed to request task");
        }

        let Some(envelope) = self.transport.recv_timeout(self.config.receive_timeout()).await? else {
            debug!(unit = %self.id(), "No task received");
            return Ok(UnitEvent::NoReply);
        };

        if envelope.sender != self.coordinator {
            warn!(unit = %self.id(), sender = %envelope.sender, "Ignoring message from unknown sender");
            return Ok(UnitEvent::NoReply);
        }

        match Directive::decode(&envelope.body) {
            Ok(directive) => Ok(UnitEvent::Directive(directive)),
            Err(e) => {
                warn!(unit = %self.id(), error = %e, "Ignoring undecodable directive");
                Ok(UnitEvent::NoReply)
            }
        }
    }

    async fn travel(&mut self, destination: Location, may_drop: bool) -> UnitEvent {
        let steps = self.config.movement_steps;
        for step in 1..=steps {
            if may_drop && self.dice.roll() < self.config.drop_probability {
                warn!(unit = %self.id(), step, steps, "Package dropped in transit");
                return UnitEvent::Dropped;
            }

            let report = UnitReport::Moving {
                destination,
                distance: progress(step, steps),
            };
            if let Err(e) = self.transport.send(&self.coordinator, report.encode()).await {
                warn!(unit = %self.id(), error = %e, "Failed to report progress");
            }
            tokio::time::sleep(self.config.step_interval()).await;
        }
        UnitEvent::Arrived
    }

    async fn report(&mut self, report: UnitReport) -> UnitEvent {
        if let Err(e) = self.transport.send(&self.coordinator, report.encode()).await {
            warn!(unit = %self.id(), action = report.action(), error = %e, "Failed to send report");
        }
        UnitEvent::Reported
    }

    /// Step until shutdown is signalled or the transport goes away
    pub async fn run(mut self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(unit = %self.id(), coordinator = %self.coordinator, "Unit started");

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(unit = %self.id(), "Shutdown signal received");
                    break;
                }
                result = self.step() => match result {
                    Ok(_) => {}
                    Err(UnitError::Fsm(e)) => {
                        warn!(unit = %self.id(), error = %e, "Resetting unit to WAIT_TASK");
                        self.state = UnitState::WaitTask;
                    }
                    Err(UnitError::Transport(e)) => {
                        warn!(unit = %self.id(), error = %e, "Unit transport failed");
                        break;
                    }
                },
            }
        }

        info!(unit = %self.id(), state = %self.state, "Unit stopped");
    }
}
