//! Rolling-period goal progress.
//!
//! Derives how many pages a book accrued inside the current goal window
//! from its completed session history. Weekly windows open on the most
//! recent Monday at local midnight, monthly windows on the first of the
//! current month; the caller's time zone decides where midnight falls.

use chrono::{DateTime, Datelike, Days, Local, LocalResult, NaiveTime, TimeZone, Utc};

use crate::domain::session::ReadingSession;

use super::{Book, GoalPeriod};

/// Pages read toward the book's goal in the current period.
///
/// Returns `None` when the book has no goal set. Sessions still in
/// progress (no end time) never count; sessions without an attributed
/// page delta contribute zero rather than being estimated from their
/// end page alone.
pub fn goal_progress(book: &Book, sessions: &[ReadingSession]) -> Option<i32> {
    goal_progress_at(book, sessions, Local::now())
}

/// Same as [`goal_progress`], with an explicit zoned clock so hosts and
/// tests can pin both the zone and the instant.
pub fn goal_progress_at<Tz: TimeZone>(
    book: &Book,
    sessions: &[ReadingSession],
    now: DateTime<Tz>,
) -> Option<i32> {
    let goal = book.reading_goal()?;
    let period_start = period_start(goal.period(), &now).with_timezone(&Utc);

    let total = sessions
        .iter()
        .filter(|s| {
            s.end_time()
                .is_some_and(|end| end.as_datetime() > &period_start)
        })
        .map(|s| s.pages_read().unwrap_or(0).max(0))
        .sum();

    Some(total)
}

/// Start of the current goal window: local midnight on the most recent
/// Monday (weekly) or the first of the month (monthly).
fn period_start<Tz: TimeZone>(period: GoalPeriod, now: &DateTime<Tz>) -> DateTime<Tz> {
    let today = now.date_naive();
    let first_day = match period {
        GoalPeriod::Weekly => {
            today - Days::new(u64::from(today.weekday().num_days_from_monday()))
        }
        GoalPeriod::Monthly => today.with_day(1).unwrap(),
    };

    let midnight = first_day.and_time(NaiveTime::MIN);
    match now.timezone().from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        // DST fold repeats the hour; the earlier instant keeps the window widest
        LocalResult::Ambiguous(earlier, _) => earlier,
        // DST gap skipped midnight entirely; read the wall time as UTC
        LocalResult::None => now.timezone().from_utc_datetime(&midnight),
    }
}
