use lazy_static::lazy_static;
use regex::Regex;
use time::{macros::format_description, Date, OffsetDateTime};

use crate::error::{AppError, AppResult};

pub const INVALID_DATE: &str = "Date parameters should be in format YYYY-MM-DD";

pub(crate) fn is_valid_date(value: &str) -> bool {
    lazy_static! {
        static ref DATE_RE: Regex =
            Regex::new(r"^\d{4}-(0\d|1[0-2])-([0-2]\d|3[01])$").unwrap();
    }
    DATE_RE.is_match(value)
}

/// Parses a strict `YYYY-MM-DD` value that is also a real calendar date.
pub fn parse_date(value: &str) -> AppResult<Date> {
    if !is_valid_date(value) {
        return Err(AppError::Validation(INVALID_DATE.into()));
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::Validation(INVALID_DATE.into()))
}

/// Half-open `[start, end)` interval over payment timestamps (UTC).
/// A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

impl ReportWindow {
    /// Both dates are inclusive: `end` covers the whole end day.
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> AppResult<Self> {
        let start = start.filter(|s| !s.is_empty()).map(parse_date).transpose()?;
        let end = end.filter(|s| !s.is_empty()).map(parse_date).transpose()?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::Validation(
                    "start date must not be after end date".into(),
                ));
            }
        }

        let end = match end {
            Some(e) => Some(
                e.next_day()
                    .ok_or_else(|| AppError::Validation(INVALID_DATE.into()))?
                    .midnight()
                    .assume_utc(),
            ),
            None => None,
        };

        Ok(Self {
            start: start.map(|d| d.midnight().assume_utc()),
            end,
        })
    }

    pub fn contains(&self, at: OffsetDateTime) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at < e)
    }
}
