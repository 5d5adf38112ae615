//! Database lifecycle through wp-cli.

use std::path::Path;

use tracing::instrument;

use crate::{
    application::services::executor::CommandExecutor,
    domain::{
        CommandOutput, DbAdmin, DbCreate, DbCreateUser, DbExport, DbGrant, DbReset,
        OptionUpdate, TransientDelete, WpCommand,
    },
    error::PresswrightResult,
};

/// A database account to create and the grant it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseUser {
    pub name: String,
    pub password: String,
    pub host: String,
    pub privileges: String,
    pub schema: String,
}

/// Thin wrappers over the `db`, `option` and `transient` commands. The
/// outcome of each call is whatever the executor's policy makes of it.
#[derive(Clone)]
pub struct DatabaseManager {
    executor: CommandExecutor,
}

impl DatabaseManager {
    pub fn new(executor: CommandExecutor) -> Self {
        Self { executor }
    }

    #[instrument(skip(self, admin, debug))]
    pub fn create(
        &self,
        wordpress_path: &Path,
        admin: Option<&DbAdmin>,
        debug: bool,
    ) -> PresswrightResult<CommandOutput> {
        self.executor.execute(WpCommand::DbCreate(DbCreate {
            path: wordpress_path.to_path_buf(),
            admin: admin.cloned(),
            debug,
        }))
    }

    /// Drop every table without asking.
    #[instrument(skip(self, debug))]
    pub fn reset(&self, wordpress_path: &Path, debug: bool) -> PresswrightResult<CommandOutput> {
        self.executor.execute(WpCommand::DbReset(DbReset {
            path: wordpress_path.to_path_buf(),
            yes: true,
            debug,
        }))
    }

    #[instrument(skip(self, debug))]
    pub fn export(
        &self,
        wordpress_path: &Path,
        dump_path: &Path,
        debug: bool,
    ) -> PresswrightResult<CommandOutput> {
        self.executor.execute(WpCommand::DbExport(DbExport {
            path: wordpress_path.to_path_buf(),
            dump_path: dump_path.to_path_buf(),
            debug,
        }))
    }

    #[instrument(skip(self, value, debug))]
    pub fn update_option(
        &self,
        name: &str,
        value: &str,
        autoload: Option<bool>,
        wordpress_path: &Path,
        debug: bool,
    ) -> PresswrightResult<CommandOutput> {
        self.executor.execute(WpCommand::OptionUpdate(OptionUpdate {
            path: wordpress_path.to_path_buf(),
            name: name.to_string(),
            value: value.to_string(),
            autoload,
            debug,
        }))
    }

    #[instrument(skip(self, debug))]
    pub fn delete_transient(
        &self,
        wordpress_path: &Path,
        all: bool,
        debug: bool,
    ) -> PresswrightResult<CommandOutput> {
        self.executor.execute(WpCommand::TransientDelete(TransientDelete {
            path: wordpress_path.to_path_buf(),
            all,
            debug,
        }))
    }

    /// `CREATE USER` followed by `GRANT`, both run with the admin account.
    #[instrument(skip(self, admin, user, debug), fields(user = %user.name, host = %user.host))]
    pub fn create_user_and_grant(
        &self,
        wordpress_path: &Path,
        admin: Option<&DbAdmin>,
        user: &DatabaseUser,
        debug: bool,
    ) -> PresswrightResult<()> {
        self.executor.execute(WpCommand::DbCreateUser(DbCreateUser {
            path: wordpress_path.to_path_buf(),
            admin: admin.cloned(),
            user_name: user.name.clone(),
            user_password: user.password.clone(),
            host: user.host.clone(),
            debug,
        }))?;
        self.executor.execute(WpCommand::DbGrant(DbGrant {
            path: wordpress_path.to_path_buf(),
            admin: admin.cloned(),
            privileges: user.privileges.clone(),
            schema: user.schema.clone(),
            user_name: user.name.clone(),
            host: user.host.clone(),
            debug,
        }))?;
        Ok(())
    }
}
