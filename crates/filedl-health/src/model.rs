//! Health status values and the serialised report.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health of a single check or of the whole service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Fully functional.
    Ok,
    /// Degraded but at least partially functioning.
    Warning,
    /// Unavailable or non-functioning.
    Critical,
}

impl Status {
    /// HTTP status used when serving a report with this status.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Warning => 429,
            Self::Critical => 500,
        }
    }

    /// Status implied by an upstream `/health` response code.
    #[must_use]
    pub const fn from_http_status(code: u16) -> Self {
        match code {
            200 => Self::Ok,
            429 => Self::Warning,
            _ => Self::Critical,
        }
    }

    /// Upper-case label used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Result of probing a dependency once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Observed status.
    pub status: Status,
    /// Status code returned by the dependency, when it answered.
    pub status_code: Option<u16>,
    /// Human-readable detail.
    pub message: String,
}

impl CheckOutcome {
    /// Outcome derived from the dependency's HTTP answer.
    #[must_use]
    pub fn from_response(name: &str, status_code: u16) -> Self {
        let status = Status::from_http_status(status_code);
        Self {
            status,
            status_code: Some(status_code),
            message: status_message(name, status),
        }
    }

    /// Outcome for a dependency that could not be reached.
    #[must_use]
    pub fn unreachable(name: &str) -> Self {
        Self {
            status: Status::Critical,
            status_code: None,
            message: status_message(name, Status::Critical),
        }
    }
}

fn status_message(name: &str, status: Status) -> String {
    match status {
        Status::Ok => format!("{name} is ok"),
        Status::Warning => format!("{name} is degraded, but at least partially functioning"),
        Status::Critical => format!("{name} functionality is unavailable or non-functioning"),
    }
}

/// Last known state of a registered check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckState {
    /// Check name.
    pub name: String,
    /// Latest status; `None` until the first poll completes.
    pub status: Option<Status>,
    /// Latest upstream status code.
    pub status_code: Option<u16>,
    /// Latest detail message.
    pub message: String,
    /// When the check last ran.
    pub last_checked: Option<DateTime<Utc>>,
    /// When the check last reported OK.
    pub last_success: Option<DateTime<Utc>>,
    /// When the check last reported anything other than OK.
    pub last_failure: Option<DateTime<Utc>>,
}

impl CheckState {
    pub(crate) fn pending(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: None,
            status_code: None,
            message: String::new(),
            last_checked: None,
            last_success: None,
            last_failure: None,
        }
    }

    pub(crate) fn record(&mut self, outcome: CheckOutcome, at: DateTime<Utc>) {
        self.status = Some(outcome.status);
        self.status_code = outcome.status_code;
        self.message = outcome.message;
        self.last_checked = Some(at);
        if outcome.status == Status::Ok {
            self.last_success = Some(at);
        } else {
            self.last_failure = Some(at);
        }
    }
}

/// Build and runtime identification included in reports.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Build timestamp as recorded at compile time.
    pub build_time: String,
    /// Source revision.
    pub git_commit: String,
    /// Release version.
    pub version: String,
    /// Implementation language.
    pub language: &'static str,
    /// Language or toolchain version.
    pub language_version: String,
}

impl VersionInfo {
    /// Version info for a Rust build.
    #[must_use]
    pub fn new(
        build_time: impl Into<String>,
        git_commit: impl Into<String>,
        version: impl Into<String>,
        language_version: impl Into<String>,
    ) -> Self {
        Self {
            build_time: build_time.into(),
            git_commit: git_commit.into(),
            version: version.into(),
            language: "rust",
            language_version: language_version.into(),
        }
    }
}

/// Aggregate report served on `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Aggregate status.
    pub status: Status,
    /// Build identification.
    pub version: VersionInfo,
    /// Milliseconds since the health check was created.
    pub uptime: u64,
    /// When the health check was created.
    pub start_time: DateTime<Utc>,
    /// State of every registered check.
    pub checks: Vec<CheckState>,
}
