use chrono::{DateTime, Datelike, Duration, Months, SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

pub const YTD_LABEL: &str = "ytd";

/// Reporting window shared by every metric computed for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub label: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub raw: Option<String>,
}

impl Range {
    pub fn view(&self) -> RangeView {
        RangeView {
            label: self.label.clone(),
            from: self.from.to_rfc3339_opts(SecondsFormat::Millis, true),
            to: self.to.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Serialized form echoed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeView {
    pub label: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeUnit {
    Day,
    Week,
    Month,
}

impl RangeUnit {
    fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            'd' => Some(Self::Day),
            'w' => Some(Self::Week),
            'm' => Some(Self::Month),
            _ => None,
        }
    }

    fn rewind(self, now: DateTime<Utc>, amount: u32) -> Option<DateTime<Utc>> {
        match self {
            Self::Day => now.checked_sub_signed(Duration::try_days(i64::from(amount))?),
            Self::Week => {
                now.checked_sub_signed(Duration::try_days(i64::from(amount).checked_mul(7)?)?)
            }
            Self::Month => now.checked_sub_months(Months::new(amount)),
        }
    }
}

/// Parse a range token against the current instant.
pub fn parse_range(raw: Option<&str>) -> Range {
    parse_range_at(raw, Utc::now())
}

/// Parse a range token against a fixed `now`.
///
/// Unrecognized tokens fall back to the year-to-date window instead of failing,
/// so a typo such as `"7x"` silently reports YTD.
pub fn parse_range_at(raw: Option<&str>, now: DateTime<Utc>) -> Range {
    let Some(raw) = raw else {
        return year_to_date(now, None);
    };

    let token = raw.trim().to_ascii_lowercase();
    if token == YTD_LABEL {
        return year_to_date(now, Some(raw.to_string()));
    }

    match relative_window(&token, now) {
        Some(from) => Range {
            label: token,
            from,
            to: now,
            raw: Some(raw.to_string()),
        },
        None => {
            debug!(range = raw, "unrecognized range token, falling back to ytd");
            year_to_date(now, None)
        }
    }
}

fn relative_window(token: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let suffix = token.chars().last()?;
    let unit = RangeUnit::from_suffix(suffix)?;
    let digits = &token[..token.len() - suffix.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let amount: u32 = digits.parse().ok()?;
    unit.rewind(now, amount)
}

fn year_to_date(now: DateTime<Utc>, raw: Option<String>) -> Range {
    Range {
        label: YTD_LABEL.to_string(),
        from: start_of_year(now),
        to: now,
        raw,
    }
}

/// January 1st, 00:00:00 UTC of the year containing `now`.
pub fn start_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// First day of the month containing `now`, at 00:00:00 UTC.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
