//! PancakeSwap new-token monitor loop.
//!
//! `PcsMonitor` owns the local token database and drives the whole control flow:
//!
//! - `initiate` — load the local database, or rebuild it from a full snapshot when it
//!   is missing or older than the staleness threshold. A rebuild treats every listed
//!   token as already known.
//! - `poll_once` — fetch one snapshot and, if the server has refreshed since the last
//!   recorded update, notify users about unknown tokens and persist the database.
//! - `run` — `initiate` followed by `poll_once` forever, sleeping between cycles.
//!
//! Remote failures never escalate: they are logged and retried after a short pause.
//! Local database failures (corrupt file, failed write) end the loop with an error.
//! Notification failures are logged and otherwise ignored.

use crate::clock::Clock;
use crate::fetcher::SnapshotSource;
use crate::model::local_state::{LocalState, StateStore};
use log::{debug, error, info, warn};
use pcs_common::api::{API_UPDATE_INTERVAL, FETCH_RETRY_DELAY, MIN_NAP, REFRESH_RETRY_DELAY};
use pcs_common::format::{database_updated_message, new_token_message, timestamp_to_string};
use pcs_common::{MonitorError, Notifier, Result, Snapshot, TokenInfo};
use std::time::Duration;
use strum::Display;

/// Where the monitor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MonitorPhase {
    /// Constructed, nothing loaded yet.
    Uninitialized,
    /// Rebuilding the local database from a full snapshot.
    Bootstrapping,
    /// Local database is current; polling for the next server refresh.
    WaitingForUpdate,
    /// Handling a server refresh.
    ProcessingUpdate,
}

/// Outcome of a single `poll_once` cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// The listing API could not be reached or answered with an error.
    FetchFailed,
    /// The server has not refreshed since the last recorded update.
    NoUpdate {
        /// How long to wait before polling again.
        nap: Duration,
    },
    /// The server refreshed; the database was persisted.
    Updated {
        /// Addresses reported as new in this cycle, in snapshot order.
        new_tokens: Vec<String>,
    },
}

impl Cycle {
    /// Pause before the next poll.
    pub fn pause(&self) -> Duration {
        match self {
            Cycle::FetchFailed => FETCH_RETRY_DELAY,
            Cycle::NoUpdate { nap } => *nap,
            Cycle::Updated { .. } => Duration::ZERO,
        }
    }
}

/// Time to wait for the next server refresh, given the server time of the
/// current snapshot. Clamped to `MIN_NAP` when the expected refresh is overdue.
pub fn nap_until_next_update(now_ms: i64, updated_at: i64) -> Duration {
    let interval_ms = API_UPDATE_INTERVAL.as_millis() as i64;
    let remaining_ms = interval_ms.saturating_sub(now_ms.saturating_sub(updated_at));
    if remaining_ms < 0 {
        MIN_NAP
    } else {
        Duration::from_millis(remaining_ms as u64)
    }
}

/// Polls the listing API and reports newly listed tokens.
pub struct PcsMonitor<S, N, C> {
    source: S,
    notifier: N,
    clock: C,
    store: StateStore,
    state: LocalState,
    phase: MonitorPhase,
}

impl<S, N, C> PcsMonitor<S, N, C>
where
    S: SnapshotSource,
    N: Notifier,
    C: Clock,
{
    /// Wire a monitor from its collaborators. Nothing is loaded until `initiate`.
    pub fn new(source: S, notifier: N, clock: C, store: StateStore) -> Self {
        Self {
            source,
            notifier,
            clock,
            store,
            state: LocalState::default(),
            phase: MonitorPhase::Uninitialized,
        }
    }

    /// Current in-memory database.
    pub fn state(&self) -> &LocalState {
        &self.state
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    /// Run until shutdown or a fatal local error.
    pub fn run(&mut self) -> Result<()> {
        match self.initiate() {
            Err(MonitorError::Interrupted) => {
                info!("Shutdown requested during initiation, stopping PancakeSwap Monitor.");
                return Ok(());
            }
            other => other?,
        }

        loop {
            let cycle = self.poll_once()?;
            if !self.clock.sleep(cycle.pause()) {
                info!("Shutdown requested, stopping PancakeSwap Monitor.");
                return Ok(());
            }
        }
    }

    /// Load the local database, rebuilding it when missing or stale.
    ///
    /// A corrupt database file is fatal.
    pub fn initiate(&mut self) -> Result<()> {
        info!("PancakeSwap Monitor initiating.");
        match self.store.load() {
            Ok(loaded) => {
                let now = self.clock.now_millis();
                if loaded.is_stale(now) {
                    info!(
                        "Local database is out of date. Database time: {}.",
                        timestamp_to_string(loaded.saved_time)
                    );
                    self.force_refresh()?;
                } else {
                    info!(
                        "Local database loaded. Database time: {}. Known tokens: {}.",
                        timestamp_to_string(loaded.saved_time),
                        loaded.known_tokens.len()
                    );
                    self.state = loaded;
                }
            }
            Err(MonitorError::NotFound(path)) => {
                info!("Local database {} does not exist.", path.display());
                self.force_refresh()?;
            }
            Err(e) => return Err(e),
        }
        self.set_phase(MonitorPhase::WaitingForUpdate);
        info!("PancakeSwap Monitor initiated.");
        Ok(())
    }

    /// Rebuild the local database from a full snapshot, retrying until the
    /// listing API answers. Every listed token becomes known; none is reported.
    pub fn force_refresh(&mut self) -> Result<()> {
        self.set_phase(MonitorPhase::Bootstrapping);
        info!("Updating local database from a full snapshot.");
        let snapshot = loop {
            match self.request_snapshot()? {
                Some(snapshot) => break snapshot,
                None => {
                    if !self.clock.sleep(REFRESH_RETRY_DELAY) {
                        return Err(MonitorError::Interrupted);
                    }
                }
            }
        };

        self.state = LocalState::new(snapshot.updated_at, snapshot.token_ids());
        self.persist()
    }

    /// Fetch one snapshot and process it if the server refreshed.
    pub fn poll_once(&mut self) -> Result<Cycle> {
        let Some(snapshot) = self.request_snapshot()? else {
            return Ok(Cycle::FetchFailed);
        };

        if snapshot.updated_at <= self.state.saved_time {
            let now = self.clock.now_millis();
            let nap = nap_until_next_update(now, snapshot.updated_at);
            if nap != MIN_NAP {
                info!(
                    "Taking a nap of {}min {}s while waiting for the next server update.",
                    nap.as_secs() / 60,
                    nap.as_secs() % 60
                );
            }
            return Ok(Cycle::NoUpdate { nap });
        }

        info!(
            "Server updated. Server time: {}.",
            timestamp_to_string(snapshot.updated_at)
        );
        self.set_phase(MonitorPhase::ProcessingUpdate);
        let new_tokens = self.process_update(&snapshot)?;
        self.set_phase(MonitorPhase::WaitingForUpdate);
        Ok(Cycle::Updated { new_tokens })
    }

    fn process_update(&mut self, snapshot: &Snapshot) -> Result<Vec<String>> {
        self.state.saved_time = snapshot.updated_at;

        let mut found = Vec::new();
        for (address, metadata) in snapshot.new_tokens(&self.state.known_tokens) {
            let message = new_token_message(address, &TokenInfo::from_metadata(metadata));
            if let Err(e) = self.notifier.notify_users(&message) {
                warn!("Failed to notify users about {}: {}", address, e);
            }
            info!("New token found: {} {}", address, metadata);
            found.push(address.clone());
        }

        if found.is_empty() {
            info!("No new token found.");
        } else {
            self.state.known_tokens.extend(found.iter().cloned());
        }

        self.persist()?;
        Ok(found)
    }

    /// `Ok(None)` for failures worth retrying; anything else is propagated.
    fn request_snapshot(&self) -> Result<Option<Snapshot>> {
        match self.source.fetch_snapshot() {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(MonitorError::ServerStatus { code, body }) => {
                error!("PancakeSwap server responded with status code {}.", code);
                error!("Full response: {}", body);
                Ok(None)
            }
            Err(e) if e.is_retryable() => {
                error!("Failed to fetch PancakeSwap token list: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.state)?;
        let message = database_updated_message(self.state.saved_time);
        info!("{}", message);
        if let Err(e) = self.notifier.notify_admin(&message) {
            warn!("Failed to notify admin: {}", e);
        }
        Ok(())
    }

    fn set_phase(&mut self, phase: MonitorPhase) {
        if self.phase != phase {
            debug!("Monitor phase: {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }
}
