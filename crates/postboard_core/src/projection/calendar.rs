//! Calendar projection and month grid helpers.

use crate::model::date::parse_display_date;
use crate::model::grouping::GroupingSet;
use crate::model::post::Post;
use crate::ordering::reorder::{regroup_all_by_date, DatePolicy};
use chrono::{Datelike, Duration, NaiveDate};

const GRID_DAYS: usize = 42;

/// Calendar projection: every post bucketed by its parsed date, ascending,
/// with unparseable dates collected in a trailing `unscheduled` bucket.
///
/// Kanban grouping ids and titles play no part in the result.
pub fn calendar_projection(set: &GroupingSet) -> GroupingSet {
    // The unscheduled policy has no failure path.
    regroup_all_by_date(set.posts(), DatePolicy::Unscheduled).unwrap_or_default()
}

/// Six-week grid for one month, starting on the Monday on or before the 1st.
///
/// Returns `None` for an invalid `month`.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let start = grid_start(year, month)?;
    Some(days_from(start, GRID_DAYS))
}

/// Whole weeks covering one month (Monday first), without the trailing
/// padding rows of [`month_grid`].
pub fn month_weeks(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = first.weekday().num_days_from_monday() as usize;
    let days_in_month = days_in_month(first)?;
    let filled = offset + days_in_month;
    let total = filled + (7 - filled % 7) % 7;
    Some(days_from(grid_start(year, month)?, total))
}

/// Posts whose display date falls on `day`, in canonical order.
pub fn posts_on_day(set: &GroupingSet, day: NaiveDate) -> Vec<&Post> {
    set.posts()
        .filter(|post| parse_display_date(&post.date) == Some(day))
        .collect()
}

fn grid_start(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = i64::from(first.weekday().num_days_from_monday());
    first.checked_sub_signed(Duration::days(offset))
}

fn days_in_month(first: NaiveDate) -> Option<usize> {
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    usize::try_from(next_month.signed_duration_since(first).num_days()).ok()
}

fn days_from(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    start.iter_days().take(count).collect()
}
