//! Cached backend health state with periodic refresh.
//!
//! One [`HealthStatus`] cell per service, initialized to `Unknown` at
//! startup and mutated only inside [`HealthService::check`]. Concurrent
//! checks are serialized by an in-flight guard: a check in progress is never
//! restarted. The guard is released on drop, so a caller abandoning a
//! `check()` future mid-probe (e.g., under `tokio::time::timeout`) neither
//! wedges the guard nor leaves the cell stuck in `Checking`.
//! [`HealthService::snapshot`] is the read-only accessor for status
//! rendering and never mutates.
//!
//! The probe is `GET /api/version`, distinguishing "backend alive" from the
//! caller-facing model listing (which has its own empty-list failure mode).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::services::ollama_service::OllamaService;

/// Default interval between periodic health probes.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Coarse backend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// No probe has completed yet.
    Unknown,
    /// A probe is currently in flight.
    Checking,
    /// Last probe succeeded.
    Ok,
    /// Last probe failed.
    Error,
}

/// A serializable health snapshot for the configured backend.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Coarse state of the backend.
    pub state: HealthState,
    /// Backend version from the last successful probe.
    pub version: Option<String>,
    /// Error message from the last failed probe.
    pub error: Option<String>,
    /// When the last probe completed (successfully or not).
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl HealthStatus {
    fn unknown() -> Self {
        Self {
            state: HealthState::Unknown,
            version: None,
            error: None,
            last_checked_at: None,
        }
    }
}

/// Owns the health state cell for one backend service.
///
/// Wrap in an `Arc` and share between the status renderer and the periodic
/// refresh task.
pub struct HealthService {
    svc: Arc<OllamaService>,
    status: RwLock<HealthStatus>,
    in_flight: AtomicBool,
    interval: Duration,
}

/// Releases the in-flight flag when a probe ends, whichever way it ends.
///
/// While `restore` is set, dropping the guard means the probe future was
/// abandoned before completing: the prior status is put back so readers do
/// not observe a permanent `Checking`. [`finish`](InFlightGuard::finish)
/// records the real outcome instead.
struct InFlightGuard<'a> {
    owner: &'a HealthService,
    restore: Option<HealthStatus>,
}

impl InFlightGuard<'_> {
    fn finish(mut self, status: HealthStatus) {
        self.restore = None;
        *self.owner.write_cell() = status;
        // Drop clears the flag after the outcome is visible.
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Some(prior) = self.restore.take() {
            *self.owner.write_cell() = prior;
        }
        self.owner.in_flight.store(false, Ordering::SeqCst);
    }
}

impl HealthService {
    /// Creates a health service over `svc`, probing every `interval`
    /// (default [`DEFAULT_CHECK_INTERVAL`]).
    pub fn new(svc: Arc<OllamaService>, interval: Option<Duration>) -> Self {
        Self {
            svc,
            status: RwLock::new(HealthStatus::unknown()),
            in_flight: AtomicBool::new(false),
            interval: interval.unwrap_or(DEFAULT_CHECK_INTERVAL),
        }
    }

    /// Current status without triggering a probe.
    pub fn snapshot(&self) -> HealthStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_cell(&self) -> RwLockWriteGuard<'_, HealthStatus> {
        self.status.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one probe and records the outcome.
    ///
    /// Resilient by design: failures are folded into the returned
    /// [`HealthStatus`], never raised. If a probe is already running, the
    /// current snapshot is returned instead of starting another one.
    pub async fn check(&self) -> HealthStatus {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("health probe already in flight, returning snapshot");
            return self.snapshot();
        }

        let prior = {
            let mut cell = self.write_cell();
            let prior = cell.clone();
            cell.state = HealthState::Checking;
            prior
        };
        let guard = InFlightGuard {
            owner: self,
            restore: Some(prior),
        };

        let outcome = self.svc.fetch_version().await;
        let now = Utc::now();
        let status = match outcome {
            Ok(version) => {
                info!(%version, "backend health probe succeeded");
                HealthStatus {
                    state: HealthState::Ok,
                    version: Some(version),
                    error: None,
                    last_checked_at: Some(now),
                }
            }
            Err(err) => {
                warn!(error = %err, "backend health probe failed");
                HealthStatus {
                    state: HealthState::Error,
                    version: None,
                    error: Some(err.to_string()),
                    last_checked_at: Some(now),
                }
            }
        };

        guard.finish(status.clone());
        status
    }

    /// Spawns a background task probing on a fixed interval until `shutdown`
    /// fires. The first probe runs immediately.
    pub fn spawn_periodic(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(this.interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        debug!("health refresh task shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let _ = this.check().await;
                    }
                }
            }
        })
    }
}
