//! Provisioning failures.

use super::identifiers::IdentifierError;
use super::plan::ProvisionStep;

/// A provisioning run stopped at `step`.
///
/// Statement text is the displayable form, so role passwords never reach
/// logs or terminal output.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("invalid provisioning settings: {message}")]
    Settings { message: String },
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    #[error("{step}: connection failed: {message}")]
    Connection {
        step: ProvisionStep,
        message: String,
    },
    #[error("{step}: `{statement}` failed: {message}")]
    Statement {
        step: ProvisionStep,
        statement: String,
        message: String,
    },
    #[error("{step}: migration failed: {message}")]
    Migration {
        step: ProvisionStep,
        message: String,
    },
}

impl ProvisionError {
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// The step that failed, when the failure happened during a run.
    pub fn step(&self) -> Option<ProvisionStep> {
        match self {
            Self::Connection { step, .. }
            | Self::Statement { step, .. }
            | Self::Migration { step, .. } => Some(*step),
            Self::Settings { .. } | Self::Identifier(_) => None,
        }
    }
}
