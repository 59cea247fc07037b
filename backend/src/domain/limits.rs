//! Bounded integers guarded by `CHECK` constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for bounded numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundedValueError {
    /// `user_limit` outside 1..=100.
    UserLimitOutOfRange { value: i32 },
    /// `priority` outside 0..=5.
    PriorityOutOfRange { value: i32 },
}

impl fmt::Display for BoundedValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserLimitOutOfRange { value } => write!(
                f,
                "user limit must be between {} and {}, got {value}",
                UserLimit::MIN,
                UserLimit::MAX
            ),
            Self::PriorityOutOfRange { value } => write!(
                f,
                "priority must be between {} and {}, got {value}",
                Priority::MIN,
                Priority::MAX
            ),
        }
    }
}

impl std::error::Error for BoundedValueError {}

/// Maximum number of seats on a tariff.
///
/// Tariffs without a limit carry `None` instead of a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserLimit(i32);

impl UserLimit {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 100;

    pub fn new(value: i32) -> Result<Self, BoundedValueError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(BoundedValueError::UserLimitOutOfRange { value })
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for UserLimit {
    type Error = BoundedValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserLimit> for i32 {
    fn from(value: UserLimit) -> Self {
        value.0
    }
}

/// Ranking hint for support questions; higher values surface first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Priority(i32);

impl Priority {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 5;

    pub fn new(value: i32) -> Result<Self, BoundedValueError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(BoundedValueError::PriorityOutOfRange { value })
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Priority {
    type Error = BoundedValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for i32 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(50)]
    #[case(100)]
    fn user_limit_accepts_range(#[case] value: i32) {
        assert_eq!(UserLimit::new(value).map(UserLimit::get), Ok(value));
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    #[case(-1)]
    fn user_limit_rejects_out_of_range(#[case] value: i32) {
        assert_eq!(
            UserLimit::new(value),
            Err(BoundedValueError::UserLimitOutOfRange { value })
        );
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    fn priority_accepts_range(#[case] value: i32) {
        assert_eq!(Priority::new(value).map(Priority::get), Ok(value));
    }

    #[rstest]
    #[case(-1)]
    #[case(6)]
    fn priority_rejects_out_of_range(#[case] value: i32) {
        let err = Priority::new(value).expect_err("priority should be rejected");
        assert_eq!(
            err.to_string(),
            format!("priority must be between 0 and 5, got {value}")
        );
    }

    #[rstest]
    fn serde_enforces_bounds() {
        let limit: UserLimit = serde_json::from_str("10").expect("valid limit");
        assert_eq!(limit.get(), 10);
        assert!(serde_json::from_str::<UserLimit>("0").is_err());
        assert_eq!(Priority::default().get(), 0);
    }
}
