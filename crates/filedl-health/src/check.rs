//! Health check runner and status aggregation.
//!
//! # Design
//! - One background task polls every registered check on a fixed interval; the first
//!   poll happens immediately.
//! - A critical check only turns the aggregate CRITICAL once it has stayed critical for
//!   longer than the critical timeout; until then it reports WARNING.
//! - Checks that have never completed count as WARNING.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::Checker;
use crate::error::{HealthError, HealthResult};
use crate::model::{CheckState, HealthReport, Status, VersionInfo};

/// Default polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
/// Default time a check may stay critical before the service reports CRITICAL.
pub const DEFAULT_CRITICAL_TIMEOUT: Duration = Duration::from_secs(90);

struct RegisteredCheck {
    name: String,
    checker: Arc<dyn Checker>,
    state: Mutex<TrackedState>,
}

struct TrackedState {
    view: CheckState,
    critical_since: Option<Instant>,
}

struct Inner {
    version: VersionInfo,
    start_time: DateTime<Utc>,
    started: Instant,
    interval: Duration,
    critical_timeout: Duration,
    checks: Vec<RegisteredCheck>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Collects checks and timing before the health check is built.
pub struct HealthCheckBuilder {
    version: VersionInfo,
    interval: Duration,
    critical_timeout: Duration,
    checks: Vec<(String, Arc<dyn Checker>)>,
}

impl HealthCheckBuilder {
    /// Polling interval between check rounds.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Time a check may remain critical before the aggregate becomes CRITICAL.
    #[must_use]
    pub fn critical_timeout(mut self, timeout: Duration) -> Self {
        self.critical_timeout = timeout;
        self
    }

    /// Register a named check.
    #[must_use]
    pub fn check(mut self, name: impl Into<String>, checker: Arc<dyn Checker>) -> Self {
        self.checks.push((name.into(), checker));
        self
    }

    /// Finish construction.
    ///
    /// # Errors
    ///
    /// Returns an error when two checks share a name or the interval is zero.
    pub fn build(self) -> HealthResult<HealthCheck> {
        if self.interval.is_zero() {
            return Err(HealthError::ZeroInterval);
        }
        let mut seen = HashSet::new();
        let mut checks = Vec::with_capacity(self.checks.len());
        for (name, checker) in self.checks {
            if !seen.insert(name.clone()) {
                return Err(HealthError::DuplicateCheck { name });
            }
            checks.push(RegisteredCheck {
                state: Mutex::new(TrackedState {
                    view: CheckState::pending(&name),
                    critical_since: None,
                }),
                name,
                checker,
            });
        }
        Ok(HealthCheck {
            inner: Arc::new(Inner {
                version: self.version,
                start_time: Utc::now(),
                started: Instant::now(),
                interval: self.interval,
                critical_timeout: self.critical_timeout,
                checks,
                ticker: Mutex::new(None),
            }),
        })
    }
}

/// Shared handle to the service's dependency checks.
#[derive(Clone)]
pub struct HealthCheck {
    inner: Arc<Inner>,
}

impl HealthCheck {
    /// Start assembling a health check for the given build.
    #[must_use]
    pub fn builder(version: VersionInfo) -> HealthCheckBuilder {
        HealthCheckBuilder {
            version,
            interval: DEFAULT_INTERVAL,
            critical_timeout: DEFAULT_CRITICAL_TIMEOUT,
            checks: Vec::new(),
        }
    }

    /// Spawn the polling task. Calling it again while running has no effect.
    pub fn start(&self) {
        let mut ticker = lock(&self.inner.ticker);
        if ticker.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        let handle = self.clone();
        let period = self.inner.interval;
        info!(
            interval_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            checks = self.inner.checks.len(),
            "starting health checks"
        );
        *ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                handle.poll_once().await;
            }
        }));
    }

    /// Stop the polling task.
    pub fn stop(&self) {
        if let Some(task) = lock(&self.inner.ticker).take() {
            task.abort();
            info!("health checks stopped");
        }
    }

    /// Run every check once and record the outcomes.
    pub async fn poll_once(&self) {
        let probes = self.inner.checks.iter().map(|check| async move {
            let outcome = check.checker.check().await;
            (check, outcome)
        });
        for (check, outcome) in join_all(probes).await {
            if outcome.status == Status::Ok {
                debug!(check = %check.name, "health check ok");
            } else {
                warn!(
                    check = %check.name,
                    status = outcome.status.as_str(),
                    status_code = ?outcome.status_code,
                    message = %outcome.message,
                    "health check failing"
                );
            }
            let mut tracked = lock(&check.state);
            if outcome.status == Status::Critical {
                tracked.critical_since.get_or_insert_with(Instant::now);
            } else {
                tracked.critical_since = None;
            }
            tracked.view.record(outcome, Utc::now());
        }
    }

    /// Aggregate status across all checks.
    #[must_use]
    pub fn status(&self) -> Status {
        let now = Instant::now();
        self.inner
            .checks
            .iter()
            .map(|check| {
                let tracked = lock(&check.state);
                match tracked.view.status {
                    None | Some(Status::Warning) => Status::Warning,
                    Some(Status::Ok) => Status::Ok,
                    Some(Status::Critical) => {
                        let critical_for = tracked
                            .critical_since
                            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
                        if critical_for >= self.inner.critical_timeout {
                            Status::Critical
                        } else {
                            Status::Warning
                        }
                    }
                }
            })
            .fold(Status::Ok, worst)
    }

    /// Snapshot report for `/health`.
    #[must_use]
    pub fn report(&self) -> HealthReport {
        let checks = self
            .inner
            .checks
            .iter()
            .map(|check| lock(&check.state).view.clone())
            .collect();
        HealthReport {
            status: self.status(),
            version: self.inner.version.clone(),
            uptime: u64::try_from(self.inner.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            start_time: self.inner.start_time,
            checks,
        }
    }
}

const fn worst(left: Status, right: Status) -> Status {
    match (left, right) {
        (Status::Critical, _) | (_, Status::Critical) => Status::Critical,
        (Status::Warning, _) | (_, Status::Warning) => Status::Warning,
        (Status::Ok, Status::Ok) => Status::Ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CheckOutcome;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FixedChecker {
        code: Option<u16>,
        calls: AtomicUsize,
    }

    impl FixedChecker {
        fn new(code: Option<u16>) -> Arc<Self> {
            Arc::new(Self {
                code,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Checker for FixedChecker {
        async fn check(&self) -> CheckOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.code.map_or_else(
                || CheckOutcome::unreachable("fixed"),
                |code| CheckOutcome::from_response("fixed", code),
            )
        }
    }

    fn version() -> VersionInfo {
        VersionInfo::new("0", "abc123", "1.0.0", "1.91")
    }

    #[tokio::test]
    async fn all_ok_reports_ok() -> HealthResult<()> {
        let health = HealthCheck::builder(version())
            .check("renderer", FixedChecker::new(Some(200)))
            .check("router", FixedChecker::new(Some(200)))
            .build()?;
        assert_eq!(health.status(), Status::Warning, "unchecked counts as warning");

        health.poll_once().await;
        let report = health.report();
        assert_eq!(report.status, Status::Ok);
        assert_eq!(report.checks.len(), 2);
        assert!(report.checks.iter().all(|c| c.last_success.is_some()));
        Ok(())
    }

    #[tokio::test]
    async fn no_checks_reports_ok() -> HealthResult<()> {
        let health = HealthCheck::builder(version()).build()?;
        assert_eq!(health.status(), Status::Ok);
        Ok(())
    }

    #[tokio::test]
    async fn degraded_dependency_reports_warning() -> HealthResult<()> {
        let health = HealthCheck::builder(version())
            .check("renderer", FixedChecker::new(Some(429)))
            .check("router", FixedChecker::new(Some(200)))
            .build()?;
        health.poll_once().await;
        assert_eq!(health.status(), Status::Warning);
        Ok(())
    }

    #[tokio::test]
    async fn critical_within_timeout_reports_warning() -> HealthResult<()> {
        let health = HealthCheck::builder(version())
            .critical_timeout(Duration::from_secs(3600))
            .check("renderer", FixedChecker::new(None))
            .build()?;
        health.poll_once().await;
        assert_eq!(health.status(), Status::Warning);
        Ok(())
    }

    #[tokio::test]
    async fn critical_past_timeout_reports_critical() -> HealthResult<()> {
        let health = HealthCheck::builder(version())
            .critical_timeout(Duration::ZERO)
            .check("renderer", FixedChecker::new(Some(503)))
            .check("router", FixedChecker::new(Some(200)))
            .build()?;
        health.poll_once().await;
        let report = health.report();
        assert_eq!(report.status, Status::Critical);
        assert_eq!(report.status.http_status(), 500);
        Ok(())
    }

    struct ToggleChecker {
        healthy: AtomicBool,
    }

    #[async_trait]
    impl Checker for ToggleChecker {
        async fn check(&self) -> CheckOutcome {
            if self.healthy.load(Ordering::SeqCst) {
                CheckOutcome::from_response("toggle", 200)
            } else {
                CheckOutcome::unreachable("toggle")
            }
        }
    }

    #[tokio::test]
    async fn recovery_clears_critical() -> HealthResult<()> {
        let toggle = Arc::new(ToggleChecker {
            healthy: AtomicBool::new(false),
        });
        let health = HealthCheck::builder(version())
            .critical_timeout(Duration::ZERO)
            .check("renderer", toggle.clone())
            .build()?;
        health.poll_once().await;
        assert_eq!(health.status(), Status::Critical);

        toggle.healthy.store(true, Ordering::SeqCst);
        health.poll_once().await;
        assert_eq!(health.status(), Status::Ok);
        let report = health.report();
        assert!(report.checks[0].last_failure.is_some());
        assert!(report.checks[0].last_success.is_some());
        Ok(())
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = HealthCheck::builder(version())
            .check("renderer", FixedChecker::new(Some(200)))
            .check("renderer", FixedChecker::new(Some(200)))
            .build();
        assert!(matches!(result, Err(HealthError::DuplicateCheck { name }) if name == "renderer"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let result = HealthCheck::builder(version())
            .interval(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(HealthError::ZeroInterval)));
    }

    #[tokio::test]
    async fn start_polls_immediately_and_stop_halts() -> HealthResult<()> {
        let checker = FixedChecker::new(Some(200));
        let health = HealthCheck::builder(version())
            .interval(Duration::from_secs(3600))
            .check("renderer", checker.clone())
            .build()?;
        health.start();
        health.start();
        for _ in 0..50 {
            if health.status() == Status::Ok {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(checker.calls.load(Ordering::SeqCst), 1);
        health.stop();
        assert_eq!(health.status(), Status::Ok);
        Ok(())
    }

    #[test]
    fn report_serialises_expected_fields() -> anyhow::Result<()> {
        let health = HealthCheck::builder(version())
            .check("renderer", FixedChecker::new(Some(200)))
            .build()?;
        let value = serde_json::to_value(health.report())?;
        assert_eq!(value["status"], "WARNING");
        assert_eq!(value["version"]["git_commit"], "abc123");
        assert_eq!(value["version"]["language"], "rust");
        assert_eq!(value["checks"][0]["name"], "renderer");
        assert!(value["checks"][0]["last_checked"].is_null());
        assert!(value.get("uptime").is_some());
        assert!(value.get("start_time").is_some());
        Ok(())
    }
}
