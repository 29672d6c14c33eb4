//! Date parsing for station open dates and incentive dates.

use chrono::NaiveDate;

/// Parses a station open date in `MM/DD/YY` form.
///
/// Month and day may have one or two digits. Two-digit years always resolve
/// to `2000 + YY`.
pub fn parse_open_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let month = short_field(parts.next()?)?;
    let day = short_field(parts.next()?)?;
    let year = short_field(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(2000 + year as i32, month, day)
}

fn short_field(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Parses an incentive `Date`, accepting the layouts seen in the laws dataset.
///
/// A bare year maps to January 1st of that year.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    // Two-digit years first, `%Y` would read "19" as year 19.
    if let Some(date) = parse_open_date(text) {
        return Some(date);
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1);
    }

    None
}

/// Inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> anyhow::Result<Self> {
        if start > end {
            anyhow::bail!("date range start {start} is after end {end}");
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
