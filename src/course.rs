//! Course records supplied by the hosting page
//!
//! Only the identifier, credit and weekday slots are interpreted here. Every
//! other field is kept verbatim so a reordered list goes back to the page in
//! the shape it arrived in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Course identifier (`Number` in the course catalog)
pub type CourseId = String;

/// Day of the week a course can meet on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

/// Time slots a course occupies on one day.
///
/// The catalog encodes these either as a string of slot codes (`"34"`) or as
/// an array of codes; both are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSlots {
    List(Vec<String>),
    Codes(String),
}

impl TimeSlots {
    /// Number of class hours the slots represent
    pub fn count(&self) -> usize {
        match self {
            TimeSlots::List(slots) => slots.len(),
            TimeSlots::Codes(codes) => codes.chars().count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Course {
    pub number: CourseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<TimeSlots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<TimeSlots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<TimeSlots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<TimeSlots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<TimeSlots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<TimeSlots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<TimeSlots>,
    /// Display fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn new(number: impl Into<CourseId>) -> Self {
        Self {
            number: number.into(),
            name: None,
            teacher: None,
            credit: None,
            monday: None,
            tuesday: None,
            wednesday: None,
            thursday: None,
            friday: None,
            saturday: None,
            sunday: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_credit(mut self, credit: impl Into<String>) -> Self {
        self.credit = Some(credit.into());
        self
    }

    #[must_use]
    pub fn with_slots(mut self, day: Weekday, slots: TimeSlots) -> Self {
        *self.slots_mut(day) = Some(slots);
        self
    }

    pub fn slots(&self, day: Weekday) -> Option<&TimeSlots> {
        match day {
            Weekday::Monday => self.monday.as_ref(),
            Weekday::Tuesday => self.tuesday.as_ref(),
            Weekday::Wednesday => self.wednesday.as_ref(),
            Weekday::Thursday => self.thursday.as_ref(),
            Weekday::Friday => self.friday.as_ref(),
            Weekday::Saturday => self.saturday.as_ref(),
            Weekday::Sunday => self.sunday.as_ref(),
        }
    }

    fn slots_mut(&mut self, day: Weekday) -> &mut Option<TimeSlots> {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }

    /// Weekly class hours across all days
    pub fn weekly_hours(&self) -> usize {
        Weekday::ALL
            .iter()
            .filter_map(|day| self.slots(*day))
            .map(TimeSlots::count)
            .sum()
    }

    /// Credit value from the leading number of the field (`"3學分"` is 3).
    ///
    /// A missing field or one without a leading number counts as zero.
    pub fn credit_value(&self) -> f64 {
        self.credit
            .as_deref()
            .and_then(leading_number)
            .filter(|c| c.is_finite())
            .unwrap_or(0.0)
    }
}

/// Longest numeric prefix of `s` after leading whitespace: optional sign,
/// digits with at most one decimal point, optional exponent.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(sign);
    let mut end = int_end;
    let mut mantissa_digits = int_end - sign;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits_start = end + 1 + exp_sign;
        let exp_end = digits_from(exp_digits_start);
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s.get(..end)?.parse().ok()
}
