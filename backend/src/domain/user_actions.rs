//! Audit log entries and per-user rate limiting.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::debug;

use super::chat::UserId;
use crate::domain::ports::{UserActionRepository, UserActionRepositoryError};

/// Action type recorded by `log_error`.
pub const ERROR_ACTION_TYPE: &str = "error";

/// A stored row from `user_actions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAction {
    pub id: i32,
    /// Absent for actions not tied to a chat user.
    pub user_id: Option<UserId>,
    pub action_type: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// How many actions a user may log within a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub limit: u64,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            limit: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u64 },
    Limited,
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Rate limiter backed by the audit log.
///
/// Counts the user's actions logged after `now - window`; the user is allowed
/// while that count stays below the policy limit.
#[derive(Clone)]
pub struct RateLimiter<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: RateLimitPolicy,
}

impl<R> RateLimiter<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(repository, clock, RateLimitPolicy::default())
    }

    pub fn with_policy(repository: Arc<R>, clock: Arc<dyn Clock>, policy: RateLimitPolicy) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }
}

impl<R> RateLimiter<R>
where
    R: UserActionRepository,
{
    /// Decide whether `user_id` may perform another action now.
    ///
    /// # Errors
    ///
    /// Propagates repository failures; callers decide whether to fail open.
    pub async fn check(&self, user_id: UserId) -> Result<RateDecision, UserActionRepositoryError> {
        let window = chrono::Duration::from_std(self.policy.window)
            .unwrap_or_else(|_| chrono::Duration::MAX);
        let since = self
            .clock
            .utc()
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let count = self.repository.count_since(user_id, since).await?;

        let decision = if count < self.policy.limit {
            RateDecision::Allowed {
                remaining: self.policy.limit - count,
            }
        } else {
            RateDecision::Limited
        };
        debug!(%user_id, count, ?decision, "rate limit evaluated");
        Ok(decision)
    }
}
