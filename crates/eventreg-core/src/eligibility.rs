//! Age eligibility checks and age-group bucketing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Youngest age a child profile may carry.
pub const MIN_CHILD_AGE: i32 = 0;
/// Oldest age a child profile may carry.
pub const MAX_CHILD_AGE: i32 = 21;

/// Inclusive age buckets with their display labels.
const AGE_GROUPS: &[(i32, i32, &str)] = &[
    (4, 6, "4-6 years"),
    (7, 9, "7-9 years"),
    (10, 12, "10-12 years"),
    (13, 15, "13-15 years"),
    (16, 18, "16-18 years"),
];

/// Which side of an event's age range was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBound {
    Minimum,
    Maximum,
}

impl fmt::Display for AgeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimum => write!(f, "minimum"),
            Self::Maximum => write!(f, "maximum"),
        }
    }
}

/// Reasons a child cannot be registered for an event.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EligibilityError {
    #[error("age {age} is outside the supported range 0-21")]
    InvalidAge { age: i32 },

    #[error("age {age} is below the minimum age of {min_age}")]
    #[serde(rename_all = "camelCase")]
    BelowMinimum { age: i32, min_age: i32 },

    #[error("age {age} is above the maximum age of {max_age}")]
    #[serde(rename_all = "camelCase")]
    AboveMaximum { age: i32, max_age: i32 },
}

impl EligibilityError {
    /// The violated bound, if the failure came from the event's range.
    #[must_use]
    pub fn bound(&self) -> Option<AgeBound> {
        match self {
            Self::InvalidAge { .. } => None,
            Self::BelowMinimum { .. } => Some(AgeBound::Minimum),
            Self::AboveMaximum { .. } => Some(AgeBound::Maximum),
        }
    }

    /// The limit that was violated, if any.
    #[must_use]
    pub fn limit(&self) -> Option<i32> {
        match self {
            Self::InvalidAge { .. } => None,
            Self::BelowMinimum { min_age, .. } => Some(*min_age),
            Self::AboveMaximum { max_age, .. } => Some(*max_age),
        }
    }
}

/// Maps an age to its marketing age-group label.
///
/// Ages outside every bucket, including toddlers and young adults, fall back
/// to `"{age} years"`.
pub fn age_group_of(age: i32) -> String {
    AGE_GROUPS
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&age))
        .map(|(_, _, label)| (*label).to_string())
        .unwrap_or_else(|| format!("{age} years"))
}

/// Checks `age` against an event's optional, independent bounds.
///
/// The age domain is checked first, so an out-of-domain age is reported as
/// `InvalidAge` even when it would also violate a bound.
pub fn validate_eligibility(
    age: i32,
    min_age: Option<i32>,
    max_age: Option<i32>,
) -> Result<(), EligibilityError> {
    if !(MIN_CHILD_AGE..=MAX_CHILD_AGE).contains(&age) {
        return Err(EligibilityError::InvalidAge { age });
    }
    if let Some(min_age) = min_age
        && age < min_age
    {
        return Err(EligibilityError::BelowMinimum { age, min_age });
    }
    if let Some(max_age) = max_age
        && age > max_age
    {
        return Err(EligibilityError::AboveMaximum { age, max_age });
    }
    Ok(())
}
