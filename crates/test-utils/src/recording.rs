use std::sync::{Arc, Mutex};

use makedag::exec::BuildSink;

/// Everything a [`BuildSink`] can be told, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Started(String),
    Finished(String),
    VendorError(String),
    ClosedOpenTags,
    KilledProcesses,
}

/// A sink that records every notification, so tests can assert on what the
/// executor told the outside world.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn vendor_errors(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::VendorError(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl BuildSink for RecordingSink {
    fn target_started(&self, name: &str, _description: Option<&str>, _dependencies: &str) {
        self.push(SinkEvent::Started(name.to_string()));
    }

    fn target_finished(&self, name: &str) {
        self.push(SinkEvent::Finished(name.to_string()));
    }

    fn vendor_error(&self, message: &str) {
        self.push(SinkEvent::VendorError(message.to_string()));
    }

    fn close_open_tags(&self) {
        self.push(SinkEvent::ClosedOpenTags);
    }

    fn kill_created_processes(&self) {
        self.push(SinkEvent::KilledProcesses);
    }
}
