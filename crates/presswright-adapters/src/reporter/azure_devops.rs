//! Azure Pipelines logging commands.
//!
//! Warnings and errors become `##vso[task.logissue ...]` lines so they show
//! up as issues on the build summary; informational events are plain lines.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use presswright_core::{application::ports::Reporter, domain::Message};

pub struct AzureDevOpsReporter {
    out: Arc<Mutex<dyn Write + Send>>,
}

impl AzureDevOpsReporter {
    /// Report to stdout, which the pipeline agent scans for commands.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    fn emit(&self, line: &str) {
        // A reporter has nowhere to report its own failures.
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }

    fn logissue(&self, kind: &str, message: &Message) {
        self.emit(&format!(
            "##vso[task.logissue type={kind}]{}",
            escape(&message.to_string())
        ));
    }
}

impl std::fmt::Debug for AzureDevOpsReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsReporter").finish_non_exhaustive()
    }
}

impl Reporter for AzureDevOpsReporter {
    fn info(&self, message: &Message) {
        self.emit(&message.to_string());
    }

    fn warning(&self, message: &Message) {
        self.logissue("warning", message);
    }

    fn error(&self, message: &Message) {
        self.logissue("error", message);
    }
}

/// Logging commands are line based; `%`, CR and LF must be escaped.
fn escape(text: &str) -> String {
    text.replace('%', "%AZP25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
