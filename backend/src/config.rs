//! Runtime configuration for the command-line tools.
//!
//! Provisioning settings load through OrthoConfig with the `SALESDESK`
//! prefix (`SALESDESK_DB_NAME`, `SALESDESK_DB_PASSWORD`, ...). The binaries
//! read the env file with `dotenvy` before loading, so values there behave
//! like ordinary environment variables.

use std::env;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::provisioning::{
    ProvisionConnections, ProvisionError, ProvisionTarget, RolePassword, SqlIdentifier,
};

const DEFAULT_ADMIN_URL: &str = "postgres://postgres@localhost:5432/postgres";
const DEFAULT_DB_NAME: &str = "salesdesk";
const DEFAULT_DB_USER: &str = "salesdesk";

/// Settings for `salesdesk-provision`.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SALESDESK")]
pub struct ProvisionSettings {
    /// Connection URL for a role allowed to create databases and roles.
    pub admin_url: Option<String>,
    /// Database to (re)create.
    pub db_name: Option<String>,
    /// Application role that will own the database.
    pub db_user: Option<String>,
    /// Login password for the application role.
    pub db_password: Option<String>,
    /// Host the application role connects to; defaults to the admin host.
    pub db_host: Option<String>,
    /// Port the application role connects to; defaults to the admin port.
    pub db_port: Option<u16>,
}

impl ProvisionSettings {
    pub fn admin_url(&self) -> &str {
        self.admin_url.as_deref().unwrap_or(DEFAULT_ADMIN_URL)
    }

    pub fn db_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(DEFAULT_DB_NAME)
    }

    pub fn db_user(&self) -> &str {
        self.db_user.as_deref().unwrap_or(DEFAULT_DB_USER)
    }

    /// Validate names and password into a provisioning target.
    ///
    /// # Errors
    ///
    /// Fails when the password is missing or a name is not a plain
    /// identifier.
    pub fn target(&self) -> Result<ProvisionTarget, ProvisionError> {
        let password = self
            .db_password
            .as_deref()
            .ok_or_else(|| ProvisionError::settings("SALESDESK_DB_PASSWORD is required"))?;
        Ok(ProvisionTarget {
            database: SqlIdentifier::parse("database name", self.db_name())?,
            role: SqlIdentifier::parse("role name", self.db_user())?,
            password: RolePassword::new(password)?,
        })
    }

    /// Derive the three connection strings a run needs from the admin URL.
    ///
    /// # Errors
    ///
    /// Fails when the admin URL cannot be parsed or cannot carry
    /// credentials.
    pub fn connections(
        &self,
        target: &ProvisionTarget,
    ) -> Result<ProvisionConnections, ProvisionError> {
        let admin = Url::parse(self.admin_url())
            .map_err(|error| ProvisionError::settings(format!("invalid admin URL: {error}")))?;
        if admin.cannot_be_a_base() {
            return Err(ProvisionError::settings("admin URL must be a postgres:// URL"));
        }
        let database_path = format!("/{}", target.database);

        let mut admin_target = admin.clone();
        admin_target.set_path(&database_path);

        let mut app = admin.clone();
        app.set_path(&database_path);
        app.set_username(target.role.as_str())
            .map_err(|()| ProvisionError::settings("admin URL cannot carry a username"))?;
        app.set_password(Some(target.password.expose()))
            .map_err(|()| ProvisionError::settings("admin URL cannot carry a password"))?;
        if let Some(host) = self.db_host.as_deref() {
            app.set_host(Some(host))
                .map_err(|error| ProvisionError::settings(format!("invalid db host: {error}")))?;
        }
        if let Some(port) = self.db_port {
            app.set_port(Some(port))
                .map_err(|()| ProvisionError::settings("admin URL cannot carry a port"))?;
        }

        Ok(ProvisionConnections {
            admin_url: Zeroizing::new(admin.into()),
            admin_target_url: Zeroizing::new(admin_target.into()),
            target_url: Zeroizing::new(app.into()),
        })
    }
}

/// Errors raised when no usable database URL is configured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseUrlError {
    #[error("--database-url must not be empty when provided")]
    EmptyArgument,
    #[error("database URL missing: set --database-url or DATABASE_URL")]
    Missing,
    #[error("DATABASE_URL must not be empty")]
    EmptyEnvironment,
}

/// Prefer an explicit URL, falling back to `DATABASE_URL`.
///
/// # Errors
///
/// Fails when neither source provides a non-blank value.
pub fn resolve_database_url(explicit: Option<String>) -> Result<String, DatabaseUrlError> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(DatabaseUrlError::EmptyArgument);
        }
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL").map_err(|_| DatabaseUrlError::Missing)?;
    if from_env.trim().is_empty() {
        return Err(DatabaseUrlError::EmptyEnvironment);
    }
    Ok(from_env)
}
