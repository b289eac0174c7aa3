//! Loyalty points accrual policy

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Loan period granted at checkout
pub const LOAN_DAYS: i64 = 14;

/// Points for a return on or before the due date
pub const ON_TIME_POINTS: i32 = 20;

/// Flat points for a late return, whatever the delay
pub const LATE_POINTS: i32 = 5;

/// Due date for a book borrowed at `borrow_at`
pub fn due_date(borrow_at: DateTime<Utc>) -> NaiveDate {
    (borrow_at + Duration::days(LOAN_DAYS)).date_naive()
}

/// Whether a return at `returned_at` is past the due date. Only the calendar
/// day counts, so returning any time on the due date is on time.
pub fn is_late(due_at: NaiveDate, returned_at: DateTime<Utc>) -> bool {
    returned_at.date_naive() > due_at
}

pub fn points_for_return(due_at: NaiveDate, returned_at: DateTime<Utc>) -> i32 {
    if is_late(due_at, returned_at) {
        LATE_POINTS
    } else {
        ON_TIME_POINTS
    }
}
