//! Reading goal value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Cadence of a reading goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPeriod {
    Weekly,
    Monthly,
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GoalPeriod::Weekly => "Weekly",
            GoalPeriod::Monthly => "Monthly",
        };
        write!(f, "{}", s)
    }
}

/// A periodic page target attached to one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingGoal {
    period: GoalPeriod,
    target_pages: i32,
}

impl ReadingGoal {
    /// Creates a goal with the given cadence and page target.
    ///
    /// # Errors
    ///
    /// - `TooSmall` if `target_pages` is below 1
    pub fn new(period: GoalPeriod, target_pages: i32) -> Result<Self, ValidationError> {
        if target_pages < 1 {
            return Err(ValidationError::too_small("target_pages", 1, target_pages));
        }
        Ok(Self {
            period,
            target_pages,
        })
    }

    /// Returns the goal cadence.
    pub fn period(&self) -> GoalPeriod {
        self.period
    }

    /// Returns the page target for one period.
    pub fn target_pages(&self) -> i32 {
        self.target_pages
    }
}
