//! Book aggregate and reading-goal logic.

mod aggregate;
mod errors;
mod goal;
mod goal_progress;

pub use aggregate::Book;
pub use errors::BookError;
pub use goal::{GoalPeriod, ReadingGoal};
pub use goal_progress::{goal_progress, goal_progress_at};
