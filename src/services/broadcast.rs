//! Broadcast engine
//!
//! One loop per process delivers the active advertisement to every tracked
//! group, prunes groups that refuse delivery, then sleeps for the configured
//! interval. The engine is either idle or running:
//!
//! * [`BroadcastEngine::start`] spawns the loop unless one is already running.
//! * [`BroadcastEngine::stop`] signals the loop and waits for it to exit. A
//!   cycle in progress is always finished; the sleep is cut short. Until the
//!   loop has exited the engine reports [`EngineState::Stopping`] and refuses
//!   to start a second loop.
//!
//! Starting without an active advertisement is allowed. Each cycle checks
//! again and sends nothing until an advertisement is selected.

use std::sync::Arc;
use std::time::Duration;
use teloxide::types::ChatId;
use tokio::sync::{watch, Mutex};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, warn};
use crate::config::BroadcastConfig;
use crate::database::RecordStore;
use crate::services::delivery::{AdPayload, DeliveryAdapter};
use crate::services::images::ImageStorage;
use crate::utils::errors::{AdRelayError, Result};
use crate::utils::logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new loop was spawned. `has_active` tells whether there is anything
    /// to send right now.
    Started { has_active: bool },
    AlreadyRunning,
    /// The previous loop is still finishing its cycle
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

/// What one cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Advertisement sent during the cycle, `None` when nothing was active
    pub advertisement_id: Option<i64>,
    pub delivered: Vec<i64>,
    pub pruned: Vec<i64>,
}

/// Everything a cycle needs; cloned into the loop task
#[derive(Clone)]
struct Broadcaster {
    store: Arc<dyn RecordStore>,
    delivery: Arc<dyn DeliveryAdapter>,
    images: ImageStorage,
    interval: Duration,
    group_delay: Duration,
}

struct RunningLoop {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

enum Control {
    Idle,
    Running(RunningLoop),
    /// Stop was requested; the handle tracks the loop until it exits
    Stopping(AbortHandle),
}

impl Control {
    fn state(&self) -> EngineState {
        match self {
            Control::Running(running) if !running.handle.is_finished() => EngineState::Running,
            Control::Stopping(handle) if !handle.is_finished() => EngineState::Stopping,
            _ => EngineState::Idle,
        }
    }
}

#[derive(Clone)]
pub struct BroadcastEngine {
    broadcaster: Broadcaster,
    control: Arc<Mutex<Control>>,
}

impl BroadcastEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        delivery: Arc<dyn DeliveryAdapter>,
        images: ImageStorage,
        config: &BroadcastConfig,
    ) -> Self {
        Self {
            broadcaster: Broadcaster {
                store,
                delivery,
                images,
                interval: config.interval(),
                group_delay: config.group_delay(),
            },
            control: Arc::new(Mutex::new(Control::Idle)),
        }
    }

    /// Move from idle to running. A second call while running does nothing.
    pub async fn start(&self) -> Result<StartOutcome> {
        let mut control = self.control.lock().await;

        match control.state() {
            EngineState::Running => {
                debug!("Broadcast start requested while already running");
                return Ok(StartOutcome::AlreadyRunning);
            }
            EngineState::Stopping => {
                debug!("Broadcast start requested while the previous loop is stopping");
                return Ok(StartOutcome::Stopping);
            }
            EngineState::Idle => {}
        }

        let has_active = self.broadcaster.store.find_active_advertisement().await?.is_some();

        let (stop_tx, stop_rx) = watch::channel(false);
        let broadcaster = self.broadcaster.clone();
        let handle = tokio::spawn(async move { broadcaster.run(stop_rx).await });
        *control = Control::Running(RunningLoop { stop_tx, handle });

        info!(
            interval_secs = self.broadcaster.interval.as_secs(),
            has_active = has_active,
            "Broadcast started"
        );
        Ok(StartOutcome::Started { has_active })
    }

    /// Move from running to idle, waiting for the current cycle to finish.
    ///
    /// The engine lock is released while waiting, so status queries answer
    /// [`EngineState::Stopping`] in the meantime.
    pub async fn stop(&self) -> StopOutcome {
        let running = {
            let mut control = self.control.lock().await;
            match std::mem::replace(&mut *control, Control::Idle) {
                Control::Running(running) => {
                    *control = Control::Stopping(running.handle.abort_handle());
                    running
                }
                other => {
                    *control = other;
                    return StopOutcome::NotRunning;
                }
            }
        };

        let _ = running.stop_tx.send(true);
        if let Err(e) = running.handle.await {
            error!(error = %e, "Broadcast loop ended abnormally");
        }

        let mut control = self.control.lock().await;
        if matches!(*control, Control::Stopping(_)) {
            *control = Control::Idle;
        }

        info!("Broadcast stopped");
        StopOutcome::Stopped
    }

    pub async fn state(&self) -> EngineState {
        self.control.lock().await.state()
    }

    pub async fn is_running(&self) -> bool {
        self.state().await == EngineState::Running
    }

    /// Run a single cycle on the calling task
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        self.broadcaster.run_cycle().await
    }
}

impl Broadcaster {
    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        info!("Broadcast loop started");
        let mut waiting_for_active = false;

        loop {
            match self.run_cycle().await {
                Ok(report) if report.advertisement_id.is_none() => {
                    if !waiting_for_active {
                        warn!("No active advertisement, nothing to send until one is selected");
                        waiting_for_active = true;
                    }
                }
                Ok(report) => {
                    waiting_for_active = false;
                    logging::log_broadcast_cycle(report.advertisement_id, report.delivered.len(), report.pruned.len());
                }
                Err(e) => {
                    error!(error = %e, recoverable = e.is_recoverable(), "Broadcast cycle aborted, retrying after the interval");
                }
            }

            if *stop_rx.borrow() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            if *stop_rx.borrow() {
                break;
            }
        }

        info!("Broadcast loop exited");
    }

    async fn run_cycle(&self) -> Result<CycleReport> {
        let Some(advertisement) = self.store.find_active_advertisement().await? else {
            return Ok(CycleReport::default());
        };

        let groups = self.store.list_groups().await?;
        let payload = AdPayload::load(self.store.as_ref(), &self.images, &advertisement).await?;

        let mut report = CycleReport {
            advertisement_id: Some(advertisement.id),
            ..CycleReport::default()
        };

        for (index, group) in groups.iter().enumerate() {
            if index > 0 && !self.group_delay.is_zero() {
                tokio::time::sleep(self.group_delay).await;
            }

            match payload.deliver(self.delivery.as_ref(), ChatId(group.chat_id)).await {
                Ok(()) => report.delivered.push(group.chat_id),
                Err(unreachable) => {
                    warn!(chat_id = group.chat_id, title = %group.title, reason = %unreachable.reason, "Pruning unreachable group");
                    self.prune(group.chat_id).await;
                    report.pruned.push(group.chat_id);
                }
            }
        }

        Ok(report)
    }

    /// Forget a group. Failures are logged so the rest of the cycle proceeds.
    async fn prune(&self, chat_id: i64) {
        match self.store.delete_group(chat_id).await {
            Ok(()) => logging::log_group_event(chat_id, "pruned", None),
            Err(AdRelayError::GroupNotFound { .. }) => {
                debug!(chat_id = chat_id, "Group already removed");
            }
            Err(e) => {
                error!(chat_id = chat_id, error = %e, "Failed to prune group");
            }
        }
    }
}
