use super::{DashboardSnapshot, Orchestrator};
use crate::error::{AppError, Result};
use crate::filter::Filter;
use crate::source::ReadingSource;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

type FetchResult = (u64, Result<Vec<Value>>);

/// Requests the refresh loop accepts from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(Filter),
    ClearSelection,
    Refresh,
}

/// Cheap, cloneable access to a running dashboard.
#[derive(Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<DashboardSnapshot>,
}

impl DashboardHandle {
    pub async fn select(&self, filter: Filter) -> Result<()> {
        self.send(Command::Select(filter)).await
    }

    pub async fn clear_selection(&self) -> Result<()> {
        self.send(Command::ClearSelection).await
    }

    pub async fn refresh(&self) -> Result<()> {
        self.send(Command::Refresh).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| AppError::Internal("dashboard refresh loop is not running".to_string()))
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.clone()
    }
}

/// The refresh loop. A single task owns the orchestrator; fetches run in
/// spawned tasks and report back tagged with their sequence number.
pub struct Dashboard<S: ReadingSource> {
    orchestrator: Orchestrator,
    source: Arc<S>,
    period: Duration,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<DashboardSnapshot>,
}

impl<S: ReadingSource> Dashboard<S> {
    pub fn new(orchestrator: Orchestrator, source: S, period: Duration) -> (Self, DashboardHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (snapshot_tx, snapshot_rx) = watch::channel(orchestrator.snapshot());

        let dashboard = Self {
            orchestrator,
            source: Arc::new(source),
            period,
            commands: command_rx,
            snapshots: snapshot_tx,
        };
        let handle = DashboardHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };

        (dashboard, handle)
    }

    /// Runs until every `DashboardHandle` has been dropped. The first tick
    /// fires immediately and performs the initial load.
    pub async fn run(self) {
        let Dashboard {
            mut orchestrator,
            source,
            period,
            mut commands,
            snapshots,
        } = self;

        info!(
            "Dashboard refresh loop started (interval: {}s)",
            period.as_secs()
        );

        let (done_tx, mut done_rx) = mpsc::channel::<FetchResult>(8);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Sequence of the fetch the timer is waiting on
        let mut in_flight: Option<u64> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(seq) = in_flight {
                        debug!("Refresh {} still in flight; skipping tick", seq);
                        continue;
                    }
                    in_flight = Some(start_fetch(&mut orchestrator, &source, &done_tx));
                }
                command = commands.recv() => {
                    match command {
                        Some(Command::Select(filter)) => {
                            orchestrator.select(filter);
                        }
                        Some(Command::ClearSelection) => {
                            orchestrator.clear_selection();
                        }
                        Some(Command::Refresh) => {
                            info!("Explicit refresh requested");
                            in_flight = Some(start_fetch(&mut orchestrator, &source, &done_tx));
                        }
                        None => {
                            info!("All dashboard handles dropped; stopping refresh loop");
                            break;
                        }
                    }
                }
                Some((seq, result)) = done_rx.recv() => {
                    orchestrator.complete_refresh(seq, result);
                    if in_flight == Some(seq) {
                        in_flight = None;
                    }
                }
            }

            snapshots.send_replace(orchestrator.snapshot());
        }
    }
}

fn start_fetch<S: ReadingSource>(
    orchestrator: &mut Orchestrator,
    source: &Arc<S>,
    done: &mpsc::Sender<FetchResult>,
) -> u64 {
    let seq = orchestrator.begin_refresh();
    let source = Arc::clone(source);
    let done = done.clone();

    tokio::spawn(async move {
        let result = source.fetch().await;
        if done.send((seq, result)).await.is_err() {
            debug!("Refresh loop gone; dropping result of fetch {}", seq);
        }
    });

    seq
}
