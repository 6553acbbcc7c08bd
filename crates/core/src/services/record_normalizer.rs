use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::models::record::{NormalizedRecord, RawRecord, RawValue};
use crate::models::settings::AmountConvention;

/// Layouts tried, in order, once the fixed patterns failed.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y/%m/%d", "%d.%m.%Y", "%b %d, %Y", "%B %d, %Y"];

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("iso date regex"))
}

fn day_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})([-/])(\d{1,2})([-/])(\d{4})$").expect("day-first date regex")
    })
}

/// Turns loosely-typed records into `(timestamp, amount)` pairs.
///
/// Pure: no I/O, never errors. A record it cannot make sense of is
/// rejected (`None`) and the caller drops it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordNormalizer {
    convention: AmountConvention,
}

impl RecordNormalizer {
    pub fn new(convention: AmountConvention) -> Self {
        Self { convention }
    }

    #[must_use]
    pub fn convention(&self) -> AmountConvention {
        self.convention
    }

    /// Normalize one record, or reject it.
    #[must_use]
    pub fn normalize(&self, raw: &RawRecord) -> Option<NormalizedRecord> {
        let Some(timestamp) = raw.date_value().and_then(parse_date) else {
            debug!(record = ?raw, "rejected record: no usable date");
            return None;
        };
        let Some(amount) = raw.amount_value().and_then(|v| self.parse_amount(v)) else {
            debug!(record = ?raw, "rejected record: no usable amount");
            return None;
        };
        Some(NormalizedRecord { timestamp, amount })
    }

    /// Normalize a batch, dropping rejects. Input order is preserved.
    #[must_use]
    pub fn normalize_batch(&self, raws: &[RawRecord]) -> Vec<NormalizedRecord> {
        let normalized: Vec<NormalizedRecord> =
            raws.iter().filter_map(|r| self.normalize(r)).collect();
        let rejected = raws.len() - normalized.len();
        if rejected > 0 {
            debug!(rejected, accepted = normalized.len(), "dropped unparseable records");
        }
        normalized
    }

    /// Parse an amount-like value into a finite number.
    #[must_use]
    pub fn parse_amount(&self, value: &RawValue) -> Option<f64> {
        match value {
            RawValue::Number(n) => n.is_finite().then_some(*n),
            RawValue::Text(s) => parse_amount_text(s, self.convention),
            _ => None,
        }
    }
}

/// Years a period key can represent with four digits.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Resolve a date-like value to a calendar date-time.
///
/// Order: native value, epoch milliseconds (UTC), `YYYY-MM-DD`,
/// `DD-MM-YYYY` / `DD/MM/YYYY`, then general layouts. Dates outside years
/// 0000-9999 (typically microseconds sent as milliseconds) are rejected.
#[must_use]
pub fn parse_date(value: &RawValue) -> Option<NaiveDateTime> {
    let parsed = match value {
        RawValue::DateTime(dt) => Some(*dt),
        RawValue::Number(ms) => parse_epoch_millis(*ms),
        RawValue::Text(s) => parse_date_text(s.trim()),
        _ => None,
    };
    parsed.filter(|dt| YEAR_RANGE.contains(&dt.year()))
}

fn parse_epoch_millis(ms: f64) -> Option<NaiveDateTime> {
    if !ms.is_finite() || ms.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64).map(|dt| dt.naive_utc())
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }

    // Components are taken literally so a bare date never shifts with the
    // host time zone.
    if let Some(caps) = iso_date_re().captures(s) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = day_first_re().captures(s) {
        // Mixed separators ("05-03/2024") are not a date.
        if caps[2] != caps[4] {
            return None;
        }
        return ymd(&caps[5], &caps[3], &caps[1]);
    }

    parse_general(s)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    Some(date.and_time(NaiveTime::MIN))
}

fn parse_general(s: &str) -> Option<NaiveDateTime> {
    // Offsets are dropped, keeping the wall-clock time that was written.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Parse a textual amount such as `"€ 1.234,56"` or `"-1,234.56 USD"`.
#[must_use]
pub fn parse_amount_text(s: &str, convention: AmountConvention) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | ',' | '.'))
        .collect();

    // A minus sign is only meaningful in front.
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    if body.contains('-') || !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let plain = match convention {
        AmountConvention::DropCommas => body.replace(',', ""),
        AmountConvention::LastSeparatorDecimal => resolve_separators(body)?,
    };

    let n: f64 = plain.parse().ok()?;
    let n = if negative { -n } else { n };
    n.is_finite().then_some(n)
}

/// Rewrite a digits-and-separators string into `1234.56` form.
fn resolve_separators(body: &str) -> Option<String> {
    let last_comma = body.rfind(',');
    let last_dot = body.rfind('.');

    match (last_comma, last_dot) {
        (Some(c), Some(d)) => {
            let (decimal, thousands) = if c > d { (',', '.') } else { ('.', ',') };
            let without_groups: String = body.chars().filter(|ch| *ch != thousands).collect();
            // Only one decimal separator may remain.
            if without_groups.matches(decimal).count() > 1 {
                return None;
            }
            Some(without_groups.replace(decimal, "."))
        }
        (Some(c), None) => {
            let fraction = &body[c + 1..];
            if body.matches(',').count() == 1 && (1..=2).contains(&fraction.len()) {
                Some(body.replace(',', "."))
            } else {
                Some(body.replace(',', ""))
            }
        }
        (None, Some(_)) => {
            if body.matches('.').count() > 1 {
                Some(body.replace('.', ""))
            } else {
                Some(body.to_string())
            }
        }
        (None, None) => Some(body.to_string()),
    }
}
