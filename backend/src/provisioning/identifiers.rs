//! Validated SQL identifiers and password literals for bootstrap DDL.
//!
//! Role and database names are interpolated into statements that cannot take
//! bind parameters (`CREATE ROLE`, `DROP DATABASE`), so they are restricted to
//! lower-case unquoted identifiers and never need quoting.

use std::fmt;

use zeroize::Zeroizing;

/// PostgreSQL truncates identifiers beyond `NAMEDATALEN - 1` bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Errors raised when validating identifiers or passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },
    #[error("{kind} '{value}' exceeds {MAX_IDENTIFIER_LEN} bytes")]
    TooLong { kind: &'static str, value: String },
    #[error("{kind} '{value}' must match [a-z_][a-z0-9_]*")]
    InvalidCharacter { kind: &'static str, value: String },
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must not contain NUL bytes")]
    PasswordNul,
}

/// A lower-case PostgreSQL identifier safe to splice into DDL unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    /// Validate `value` as an identifier; `kind` names it in errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use salesdesk::provisioning::SqlIdentifier;
    ///
    /// assert!(SqlIdentifier::parse("database name", "salesdesk_dev").is_ok());
    /// assert!(SqlIdentifier::parse("database name", "Sales-Desk").is_err());
    /// ```
    pub fn parse(kind: &'static str, value: &str) -> Result<Self, IdentifierError> {
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(IdentifierError::Empty { kind });
        };
        if value.len() > MAX_IDENTIFIER_LEN {
            return Err(IdentifierError::TooLong {
                kind,
                value: value.to_owned(),
            });
        }
        let first_ok = first.is_ascii_lowercase() || first == '_';
        let rest_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !(first_ok && rest_ok) {
            return Err(IdentifierError::InvalidCharacter {
                kind,
                value: value.to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as a single-quoted string literal, for catalog lookups
    /// such as `pg_stat_activity.datname`.
    pub fn as_literal(&self) -> String {
        format!("'{}'", self.0)
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Login password for the application role, wiped from memory on drop.
#[derive(Clone)]
pub struct RolePassword(Zeroizing<String>);

impl RolePassword {
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = Zeroizing::new(value.into());
        if value.is_empty() {
            return Err(IdentifierError::EmptyPassword);
        }
        if value.contains('\0') {
            return Err(IdentifierError::PasswordNul);
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Render as a standard-conforming string literal with quotes doubled.
    pub fn to_sql_literal(&self) -> Zeroizing<String> {
        let mut literal = Zeroizing::new(String::with_capacity(self.0.len() + 2));
        literal.push('\'');
        for c in self.0.chars() {
            if c == '\'' {
                literal.push('\'');
            }
            literal.push(c);
        }
        literal.push('\'');
        literal
    }
}

impl fmt::Debug for RolePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RolePassword(***)")
    }
}
