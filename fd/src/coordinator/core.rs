//! Main Coordinator task implementation

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::activity::{ActivityEntry, ActivityLog};
use super::arrival::{Arrival, ArrivalGenerator};
use super::assignment::{Assignment, assign, reconcile};
use super::config::CoordinatorConfig;
use super::handle::CoordinatorHandle;
use super::messages::{ControlRequest, CoordinatorMetrics, CoordinatorSnapshot, DispatchOutcome, UnitProgress};
use super::registry::PackageRegistry;
use crate::dice::Dice;
use crate::domain::{AgentId, PackageId, PackageStatus};
use crate::protocol::{Directive, UnitReport};
use crate::transport::{Envelope, Transport};

/// The Coordinator owns the package registry and arbitrates assignments
///
/// All state lives in this struct and is only mutated from its own task.
pub struct Coordinator {
    config: CoordinatorConfig,
    transport: Box<dyn Transport>,
    dice: Box<dyn Dice>,
    registry: PackageRegistry,
    arrivals: ArrivalGenerator,
    positions: BTreeMap<AgentId, UnitProgress>,
    activity: ActivityLog,
    metrics: CoordinatorMetrics,
    started: Instant,
    control_tx: mpsc::Sender<ControlRequest>,
    control_rx: mpsc::Receiver<ControlRequest>,
}

impl Coordinator {
    /// Create a new Coordinator listening on `transport`
    pub fn new(config: CoordinatorConfig, transport: Box<dyn Transport>, dice: Box<dyn Dice>) -> Self {
        let (control_tx, control_rx) = mpsc::channel(16);
        Self {
            registry: PackageRegistry::new(config.capacity),
            arrivals: ArrivalGenerator::new(config.arrival_threshold),
            activity: ActivityLog::new(config.activity_capacity),
            config,
            transport,
            dice,
            positions: BTreeMap::new(),
            metrics: CoordinatorMetrics::default(),
            started: Instant::now(),
            control_tx,
            control_rx,
        }
    }

    /// Get a handle for snapshots and shutdown
    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle::new(self.control_tx.clone())
    }

    pub fn address(&self) -> &AgentId {
        self.transport.address()
    }

    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    /// Admit one package outside the arrival timer
    pub fn admit_package(&mut self) -> Option<PackageId> {
        let admitted = self.registry.admit();
        match &admitted {
            Some(id) => {
                info!(package = %id, live = self.registry.len(), "Package admitted");
                self.metrics.packages_created += 1;
            }
            None => self.metrics.arrivals_refused += 1,
        }
        admitted
    }

    pub fn metrics(&self) -> &CoordinatorMetrics {
        &self.metrics
    }

    /// Run one arrival tick
    pub fn arrival_tick(&mut self) -> Arrival {
        let arrival = self.arrivals.tick(&mut self.registry, self.dice.as_mut());
        match arrival {
            Arrival::Admitted(_) => self.metrics.packages_created += 1,
            Arrival::Refused => self.metrics.arrivals_refused += 1,
            Arrival::None => {}
        }
        arrival
    }

    /// Run one dispatch tick: wait up to the receive timeout for one message and handle it
    pub async fn dispatch_tick(&mut self) -> DispatchOutcome {
        match self.transport.recv_timeout(self.config.receive_timeout()).await {
            Ok(Some(envelope)) => self.dispatch(envelope).await,
            Ok(None) => self.idle(),
            Err(e) => {
                warn!(error = %e, "Coordinator mailbox closed");
                DispatchOutcome::Closed
            }
        }
    }

    fn idle(&mut self) -> DispatchOutcome {
        debug!(
            timeout_ms = self.config.receive_timeout_ms,
            "No message received within receive timeout"
        );
        self.metrics.receive_timeouts += 1;
        DispatchOutcome::Idle
    }

    /// Handle one inbound envelope
    pub async fn dispatch(&mut self, envelope: Envelope) -> DispatchOutcome {
        self.metrics.messages_received += 1;
        self.activity.record(ActivityEntry {
            elapsed: self.started.elapsed(),
            sender: envelope.sender.clone(),
            body: envelope.body.clone(),
        });

        let report = match UnitReport::decode(&envelope.body) {
            Ok(report) => report,
            Err(e) => {
                warn!(sender = %envelope.sender, error = %e, "Dropping undecodable message");
                self.metrics.decode_errors += 1;
                return DispatchOutcome::Rejected {
                    sender: envelope.sender,
                    reason: e.to_string(),
                };
            }
        };

        let unit = envelope.sender.clone();
        debug!(%unit, action = report.action(), "Dispatching report");

        match report {
            UnitReport::WaitingForTask => {
                let decision = assign(
                    &mut self.registry,
                    &unit,
                    self.config.diversion_probability,
                    self.dice.as_mut(),
                );
                if let Some(directive) = decision.directive() {
                    self.send_reply(&envelope, directive).await;
                }
                match decision {
                    Assignment::Assigned(package) => {
                        info!(%unit, %package, "Package assigned");
                        self.metrics.assignments += 1;
                        DispatchOutcome::Assigned { unit, package }
                    }
                    Assignment::Diverted => {
                        info!(%unit, "Unit diverted to inspection");
                        self.metrics.diversions += 1;
                        DispatchOutcome::Diverted { unit }
                    }
                    Assignment::Unavailable => {
                        debug!(%unit, "No unassigned package, request left unanswered");
                        self.metrics.unanswered_requests += 1;
                        DispatchOutcome::Unanswered { unit }
                    }
                }
            }

            UnitReport::Moving { destination, distance } => {
                let progress = UnitProgress { destination, distance };
                self.positions.insert(unit.clone(), progress);
                DispatchOutcome::Progress { unit, progress }
            }

            UnitReport::PackageDelivered => self.complete(&envelope, PackageStatus::Delivered).await,
            UnitReport::PackageDropped => self.complete(&envelope, PackageStatus::Dropped).await,
            UnitReport::PackageInspected => self.complete(&envelope, PackageStatus::Inspected).await,
        }
    }

    /// Send the unit back to the warehouse and drop everything it owned
    async fn complete(&mut self, envelope: &Envelope, outcome: PackageStatus) -> DispatchOutcome {
        let unit = envelope.sender.clone();
        self.send_reply(envelope, Directive::GoToWarehouse).await;

        let removed = reconcile(&mut self.registry, &unit, outcome);
        match outcome {
            PackageStatus::Delivered => self.metrics.delivered += 1,
            PackageStatus::Dropped => self.metrics.dropped += 1,
            PackageStatus::Inspected => self.metrics.inspected += 1,
            PackageStatus::Unshipped | PackageStatus::Moving => {
                warn!(%unit, %outcome, "Completion with non-terminal status not counted");
            }
        }
        info!(%unit, %outcome, removed = removed.len(), "Unit reported terminal outcome");
        DispatchOutcome::Reconciled { unit, removed }
    }

    async fn send_reply(&mut self, original: &Envelope, directive: Directive) {
        if let Err(e) = self.transport.reply(original, directive.encode()).await {
            warn!(unit = %original.sender, %directive, error = %e, "Failed to deliver reply");
            self.metrics.replies_failed += 1;
        }
    }

    /// Copy of the current state for readers outside the actor
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            taken_at: Utc::now(),
            packages: self.registry.packages().to_vec(),
            capacity: self.registry.capacity(),
            positions: self.positions.clone(),
            activity: self.activity.lines(),
            metrics: self.metrics.clone(),
        }
    }

    /// Run the Coordinator task
    ///
    /// Arrivals and dispatch each follow their own interval. A dispatch tick
    /// opens a receive window of at most `receive-timeout-ms` and handles at
    /// most one message. Consumes the Coordinator and runs until shutdown is
    /// requested or the mailbox closes.
    pub async fn run(mut self) {
        let mut arrival_interval = tokio::time::interval(self.config.arrival_tick());
        arrival_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut dispatch_interval = tokio::time::interval(self.config.tick());
        dispatch_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let receive_timeout = self.config.receive_timeout();
        let window = tokio::time::sleep(receive_timeout);
        tokio::pin!(window);
        let mut receiving = false;

        info!(address = %self.address(), capacity = self.registry.capacity(), "Coordinator started");

        loop {
            tokio::select! {
                request = self.control_rx.recv() => match request {
                    Some(ControlRequest::Snapshot { reply_tx }) => {
                        let _ = reply_tx.send(self.snapshot());
                    }
                    Some(ControlRequest::Shutdown) | None => {
                        info!("Coordinator shutting down");
                        break;
                    }
                },

                _ = arrival_interval.tick() => {
                    self.arrival_tick();
                }

                _ = dispatch_interval.tick(), if !receiving => {
                    window.as_mut().reset(tokio::time::Instant::now() + receive_timeout);
                    receiving = true;
                }

                envelope = self.transport.recv(), if receiving => {
                    receiving = false;
                    match envelope {
                        Some(envelope) => {
                            self.dispatch(envelope).await;
                        }
                        None => {
                            warn!("Coordinator mailbox closed");
                            break;
                        }
                    }
                }

                _ = &mut window, if receiving => {
                    receiving = false;
                    self.idle();
                }
            }
        }

        info!(
            live_packages = self.registry.len(),
            delivered = self.metrics.delivered,
            "Coordinator stopped"
        );
    }
}
