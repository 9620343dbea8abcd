//! The three temporal value forms.

use core::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};

/// Offset date-times compare by instant: `07:32:00Z` and `00:32:00-07:00`
/// are equal even though they display differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datetime {
    /// `1979-05-27`
    Date(NaiveDate),
    /// `1979-05-27T07:32:00`
    Local(NaiveDateTime),
    /// `1979-05-27T07:32:00Z`, `1979-05-27T00:32:00-07:00`
    Offset(DateTime<FixedOffset>),
}

impl Datetime {
    /// Parses `s` against the date, local date-time and offset date-time
    /// grammars, in that order.
    pub(crate) fn parse(s: &str) -> Option<Datetime> {
        let b = s.as_bytes();
        if !has_date_shape(b) {
            return None;
        }
        if b.len() == 10 {
            return NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(Datetime::Date);
        }
        if b[10] != b'T' || !has_time_shape(&b[11..]) {
            return None;
        }
        if let Ok(local) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Datetime::Local(local));
        }
        DateTime::parse_from_rfc3339(s).ok().map(Datetime::Offset)
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Datetime::Date(d) => *d,
            Datetime::Local(dt) => dt.date(),
            Datetime::Offset(dt) => dt.date_naive(),
        }
    }
}

// YYYY-MM-DD
fn has_date_shape(b: &[u8]) -> bool {
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

// HH:MM:SS
fn has_time_shape(b: &[u8]) -> bool {
    b.len() >= 8
        && b[..2].iter().all(u8::is_ascii_digit)
        && b[2] == b':'
        && b[3..5].iter().all(u8::is_ascii_digit)
        && b[5] == b':'
        && b[6..8].iter().all(u8::is_ascii_digit)
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datetime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Datetime::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Datetime::Offset(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}
