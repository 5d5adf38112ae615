//! Single choke point for every wp-cli invocation.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Reporter, WpCli},
    },
    domain::{CommandOutput, DomainValidator as validator, FailurePolicy, Message, WpCommand},
    error::PresswrightResult,
};

/// Validates, runs and reports wp-cli commands under a [`FailurePolicy`].
#[derive(Clone)]
pub struct CommandExecutor {
    wp_cli: Arc<dyn WpCli>,
    reporter: Arc<dyn Reporter>,
    policy: FailurePolicy,
}

impl CommandExecutor {
    pub fn new(wp_cli: Arc<dyn WpCli>, reporter: Arc<dyn Reporter>, policy: FailurePolicy) -> Self {
        Self {
            wp_cli,
            reporter,
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    /// Run one command.
    ///
    /// Stderr output is reported as a warning and a non-zero exit as an
    /// error. Under [`FailurePolicy::Abort`] a non-zero exit also becomes
    /// [`ApplicationError::ExternalToolFailed`].
    #[instrument(skip_all, fields(command = command.name()))]
    pub fn execute(&self, command: WpCommand) -> PresswrightResult<CommandOutput> {
        validator::validate_command(&command)?;
        debug!(args = %command, "Running wp-cli");

        let output = self.wp_cli.run(&command)?;

        if !output.stdout.trim().is_empty() {
            debug!(stdout = %output.stdout.trim_end(), "wp-cli output");
        }

        let shown = command.to_string();
        if !output.stderr.trim().is_empty() {
            self.reporter.warning(&Message::CommandStderr {
                command: shown.clone(),
                stderr: output.stderr.clone(),
            });
        }

        if !output.success() {
            debug!(exit_code = ?output.exit_code, "wp-cli command failed");
            self.reporter.error(&Message::CommandFailed {
                command: shown.clone(),
                exit_code: output.exit_code,
            });
            if self.policy == FailurePolicy::Abort {
                return Err(ApplicationError::ExternalToolFailed {
                    command: shown,
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                }
                .into());
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::application::ports::{MockReporter, MockWpCli};
    use crate::domain::{DomainError, TransientDelete};
    use crate::error::PresswrightError;

    fn transient_delete() -> WpCommand {
        WpCommand::TransientDelete(TransientDelete {
            path: PathBuf::from("/site/wordpress"),
            all: true,
            debug: false,
        })
    }

    fn failing_cli() -> MockWpCli {
        let mut wp = MockWpCli::new();
        wp.expect_run().times(1).returning(|_| {
            Ok(CommandOutput {
                stdout: String::new(),
                stderr: "Error: Error establishing a database connection.".into(),
                exit_code: Some(1),
            })
        });
        wp
    }

    #[test]
    fn continue_policy_reports_and_returns_output() {
        let mut reporter = MockReporter::new();
        reporter.expect_warning().times(1).return_const(());
        reporter
            .expect_error()
            .withf(|m| matches!(m, Message::CommandFailed { exit_code: Some(1), .. }))
            .times(1)
            .return_const(());

        let executor = CommandExecutor::new(
            Arc::new(failing_cli()),
            Arc::new(reporter),
            FailurePolicy::Continue,
        );
        let output = executor.execute(transient_delete()).unwrap();
        assert!(!output.success());
    }

    #[test]
    fn abort_policy_turns_failure_into_error() {
        let mut reporter = MockReporter::new();
        reporter.expect_warning().return_const(());
        reporter.expect_error().return_const(());

        let executor = CommandExecutor::new(
            Arc::new(failing_cli()),
            Arc::new(reporter),
            FailurePolicy::Abort,
        );
        let err = executor.execute(transient_delete()).unwrap_err();
        assert!(matches!(
            err,
            PresswrightError::Application(ApplicationError::ExternalToolFailed {
                exit_code: Some(1),
                ..
            })
        ));
    }

    #[test]
    fn invalid_commands_never_reach_the_tool() {
        let mut wp = MockWpCli::new();
        wp.expect_run().never();
        let executor = CommandExecutor::new(
            Arc::new(wp),
            Arc::new(MockReporter::new()),
            FailurePolicy::Continue,
        );
        let err = executor
            .execute(WpCommand::Eval(crate::domain::Eval {
                path: PathBuf::from("/site/wordpress"),
                php_code: String::new(),
                skip_wordpress: false,
                debug: false,
            }))
            .unwrap_err();
        assert!(matches!(
            err,
            PresswrightError::Domain(DomainError::InvalidCommand { command: "eval", .. })
        ));
    }

    #[test]
    fn spawn_failure_is_fatal_under_any_policy() {
        let mut wp = MockWpCli::new();
        wp.expect_run().returning(|_| {
            Err(ApplicationError::ExternalTool {
                command: "wp".into(),
                reason: "No such file or directory".into(),
            }
            .into())
        });
        let executor = CommandExecutor::new(
            Arc::new(wp),
            Arc::new(MockReporter::new()),
            FailurePolicy::Continue,
        );
        assert!(executor.execute(transient_delete()).is_err());
    }
}
