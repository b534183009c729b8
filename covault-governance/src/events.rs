//! Event sinks for the governance notification channel.
//!
//! The engine emits exactly one [`GovernanceEvent`] per state transition
//! into whichever sink it was constructed with. Consumers that need the
//! stream (the notification layer, tests) hold a cloned [`EventLog`]
//! handle and drain it out of band.

use std::sync::{Arc, Mutex};

use covault_types::GovernanceEvent;
use log::debug;

/// Receives the engine's structured notification events.
pub trait EventSink {
    fn emit(&mut self, event: GovernanceEvent);
}

/// Discards events. The transition is still logged at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, event: GovernanceEvent) {
        debug!("event (discarded): {:?}", event);
    }
}

/// Shared recording sink. Cloning shares the underlying log, so the
/// coordinator can own one handle while an observer keeps another.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<GovernanceEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event emitted so far.
    pub fn events(&self) -> Vec<GovernanceEvent> {
        self.events.lock().expect("event log lock poisoned").clone()
    }

    /// Number of events emitted so far.
    pub fn len(&self) -> usize {
        self.events.lock().expect("event log lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains the log, leaving it empty.
    pub fn take(&self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut *self.events.lock().expect("event log lock poisoned"))
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: GovernanceEvent) {
        debug!("event: {:?}", event);
        self.events
            .lock()
            .expect("event log lock poisoned")
            .push(event);
    }
}
