//! Reports provisioning events as tracing records.

use presswright_core::{application::ports::Reporter, domain::Message};
use tracing::{error, info, warn};

/// Local-run reporter. Output goes wherever the subscriber sends it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for TracingReporter {
    fn info(&self, message: &Message) {
        info!(event = message.key(), "{message}");
    }

    fn warning(&self, message: &Message) {
        warn!(event = message.key(), "{message}");
    }

    fn error(&self, message: &Message) {
        error!(event = message.key(), "{message}");
    }
}
