//! Tool server health status and timestamped health reports.

use super::HealthCheckOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health status of a tool server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpServerHealthStatus {
    /// Server is reachable and healthy.
    Healthy,
    /// Server is unreachable or unhealthy.
    Unhealthy,
}

impl McpServerHealthStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for McpServerHealthStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Timestamped result of a health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckReport {
    url: String,
    outcome: HealthCheckOutcome,
    checked_at: DateTime<Utc>,
}

impl HealthCheckReport {
    /// Creates a health report.
    #[must_use]
    pub fn new(url: impl Into<String>, outcome: HealthCheckOutcome, checked_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            outcome,
            checked_at,
        }
    }

    /// Returns the URL that was probed.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the probe outcome.
    #[must_use]
    pub const fn outcome(&self) -> &HealthCheckOutcome {
        &self.outcome
    }

    /// Returns when the probe finished.
    #[must_use]
    pub const fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    /// Returns the derived health status.
    #[must_use]
    pub const fn status(&self) -> McpServerHealthStatus {
        if self.outcome.success() {
            McpServerHealthStatus::Healthy
        } else {
            McpServerHealthStatus::Unhealthy
        }
    }

    /// Returns whether the probe succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.outcome.success()
    }

    /// Returns a user-facing summary.
    #[must_use]
    pub fn message(&self) -> String {
        self.outcome.message()
    }
}
