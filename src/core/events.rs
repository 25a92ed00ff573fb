//! Event sink boundary: where verdict transitions and gate actions go
//!
//! Fire-and-forget; a sink must never block the tick loop.

use std::sync::Mutex;

use crate::types::{SecurityEvent, Severity};

/// Receives one record per verdict transition and per manual gate action
pub trait EventSink: Send + Sync {
    fn record(&self, message: &str, severity: Severity);
}

/// Prints events in the colored terminal format
#[derive(Debug, Default)]
pub struct TerminalSink {
    pub no_color: bool,
}

impl TerminalSink {
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }
}

impl EventSink for TerminalSink {
    fn record(&self, message: &str, severity: Severity) {
        let event = SecurityEvent::new(message, severity);
        if self.no_color {
            println!("{}", event.to_parseable_string());
        } else {
            println!("{}", event.to_terminal_string());
        }
    }
}

/// Captures events in memory; the test double for the sink boundary
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SecurityEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SecurityEvent> {
        self.events.lock().expect("sink poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("sink poisoned").len()
    }
}

impl EventSink for MemorySink {
    fn record(&self, message: &str, severity: Severity) {
        self.events
            .lock()
            .expect("sink poisoned")
            .push(SecurityEvent::new(message, severity));
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _message: &str, _severity: Severity) {}
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        sink.record("first", Severity::Info);
        sink.record("second", Severity::Threat);
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "first");
        assert_eq!(events[1].severity, Severity::Threat);
    }
}
