//! wp-cli adapters.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use presswright_core::{
    application::{ApplicationError, ports::WpCli},
    domain::{CommandOutput, WpCommand},
    error::PresswrightResult,
};
use tracing::{debug, instrument};

/// Runs wp-cli as a child process and waits for it.
#[derive(Debug, Clone)]
pub struct ProcessWpCli {
    program: PathBuf,
    working_dir: Option<PathBuf>,
}

impl ProcessWpCli {
    /// `program` is the wp-cli launcher: `wp`, a path to `wp-cli.phar`, ...
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn build(&self, command: &WpCommand) -> Command {
        let mut process = if self.program.extension().is_some_and(|ext| ext == "phar") {
            let mut php = Command::new("php");
            php.arg(&self.program);
            php
        } else {
            Command::new(&self.program)
        };
        process.args(command.to_args());
        if let Some(dir) = &self.working_dir {
            process.current_dir(dir);
        }
        process
    }
}

impl Default for ProcessWpCli {
    fn default() -> Self {
        Self::new("wp")
    }
}

impl WpCli for ProcessWpCli {
    #[instrument(skip_all, fields(program = %self.program.display(), command = command.name()))]
    fn run(&self, command: &WpCommand) -> PresswrightResult<CommandOutput> {
        let output = self
            .build(command)
            .output()
            .map_err(|e| ApplicationError::ExternalTool {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        debug!(status = ?output.status.code(), "wp-cli exited");
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

/// Fake wp-cli that records every command and answers from a script.
///
/// Commands without a scripted answer succeed with empty output.
#[derive(Debug, Clone, Default)]
pub struct RecordingWpCli {
    inner: Arc<Mutex<Recording>>,
}

#[derive(Debug, Default)]
struct Recording {
    commands: Vec<WpCommand>,
    scripted: VecDeque<(&'static str, CommandOutput)>,
}

impl RecordingWpCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next command named `name` (e.g. `"eval"`) with `output`.
    pub fn respond(&self, name: &'static str, output: CommandOutput) -> &Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.scripted.push_back((name, output));
        }
        self
    }

    /// Every command run so far, oldest first.
    pub fn commands(&self) -> Vec<WpCommand> {
        self.inner
            .lock()
            .map(|inner| inner.commands.clone())
            .unwrap_or_default()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands().iter().map(WpCommand::name).collect()
    }
}

impl WpCli for RecordingWpCli {
    fn run(&self, command: &WpCommand) -> PresswrightResult<CommandOutput> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.commands.push(command.clone());

        let name = command.name();
        let scripted = inner
            .scripted
            .iter()
            .position(|(n, _)| *n == name)
            .and_then(|i| inner.scripted.remove(i))
            .map(|(_, output)| output);
        Ok(scripted.unwrap_or_else(|| CommandOutput::ok("")))
    }
}
