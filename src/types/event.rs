//! Event records handed to the event sink

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Severity of a recorded event, mirroring the alerting UI's log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Success,
    Warn,
    Threat,
}

impl Severity {
    pub fn is_threat(&self) -> bool {
        matches!(self, Severity::Threat)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
            Severity::Warn => "WARN",
            Severity::Threat => "THREAT",
        };
        write!(f, "{}", name)
    }
}

/// One timestamped log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub severity: Severity,
}

impl SecurityEvent {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            severity,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let time = self.timestamp.format("%H:%M:%S");
        let line = format!("[{}] {:7} {}", time, self.severity, self.message);
        match self.severity {
            Severity::Info => line,
            Severity::Success => line.as_str().green().to_string(),
            Severity::Warn => line.as_str().yellow().to_string(),
            Severity::Threat => line.as_str().red().bold().to_string(),
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "{} | severity={} | {}",
            self.timestamp.to_rfc3339(),
            self.severity,
            self.message
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
