use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use thiserror::Error;

/// Literal used in links and on the command line for "the current time".
pub const TODAY: &str = "today";

/// Format of a timestamp in a link and in a date field.
const ISO_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date: '{0}'")]
    InvalidDateInput(String),
}

/// Which side of the comparison a date belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    From,
    To,
}

impl DateField {
    /// Query parameter carrying this field in a shareable link.
    pub fn param(self) -> &'static str {
        match self {
            DateField::From => "fromDate",
            DateField::To => "toDate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateField::From => "from",
            DateField::To => "to",
        }
    }

    pub fn other(self) -> Self {
        match self {
            DateField::From => DateField::To,
            DateField::To => DateField::From,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Today,
    Explicit(NaiveDateTime),
}

impl DateSelection {
    /// Parse a link or CLI value: `today` or any accepted timestamp form.
    pub fn parse(raw: &str) -> Result<Self, DateError> {
        let raw = raw.trim();
        if raw == TODAY {
            return Ok(DateSelection::Today);
        }
        parse_timestamp(raw).map(DateSelection::Explicit)
    }

    /// Value written into the link query.
    pub fn to_param(&self) -> String {
        match self {
            DateSelection::Today => TODAY.to_string(),
            DateSelection::Explicit(t) => format_seconds(t),
        }
    }

    /// Timestamp shown in the date field; `Today` resolves to `now`.
    pub fn resolve(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            DateSelection::Today => truncate_seconds(now),
            DateSelection::Explicit(t) => *t,
        }
    }
}

/// Drop sub-second precision.
pub fn truncate_seconds(t: NaiveDateTime) -> NaiveDateTime {
    t.with_nanosecond(0).unwrap_or(t)
}

pub fn format_seconds(t: &NaiveDateTime) -> String {
    truncate_seconds(*t).format(ISO_SECONDS).to_string()
}

/// Parse a timestamp into UTC wall-clock time. Zone-less input is taken as
/// UTC; input with an offset is converted to UTC. The result is truncated to
/// whole seconds.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DateError> {
    let raw = raw.trim();
    let invalid = || DateError::InvalidDateInput(raw.to_string());
    if raw.is_empty() {
        return Err(invalid());
    }

    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(truncate_seconds(t.with_timezone(&Utc).naive_utc()));
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(truncate_seconds(t));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)
}

/// Current UTC wall-clock time, whole seconds.
pub fn now_seconds() -> NaiveDateTime {
    truncate_seconds(Utc::now().naive_utc())
}
