//! Credit and weekly-hour totals for a set of selected courses

use crate::course::Course;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTotals {
    pub total_credits: f64,
    pub total_hours: usize,
}

/// Sum credits and weekly class hours over the selected courses.
///
/// Selection is a set: a course number listed twice is counted once.
pub fn total_credits_and_hours<'a, I>(selected: I) -> ScheduleTotals
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut seen = HashSet::new();
    selected
        .into_iter()
        .filter(|course| seen.insert(course.number.as_str()))
        .fold(ScheduleTotals::default(), |mut totals, course| {
            totals.total_credits += course.credit_value();
            totals.total_hours += course.weekly_hours();
            totals
        })
}
