// Date normalization

use crate::{Date, Value};
use chrono::format::{ParseResult, Parsed, StrftimeItems};
use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Format used to render dates when none was given
pub const DEFAULT_DATE_FORMAT: &str = "m/d/Y";

/// Date conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error(
        "Unable to convert a {0} to a date. Value must be a unix timestamp, a string with a date format, or a date"
    )]
    UnsupportedInput(&'static str),

    #[error("'{value}' is not a date in format '{format}'")]
    Unparsable { value: String, format: String },

    #[error("Format '{format}' uses unsupported letter '{letter}'")]
    UnsupportedFormat { format: String, letter: char },

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

impl DateError {
    /// Whether the error comes from the data rather than the caller
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            DateError::Unparsable { .. } | DateError::TimestampOutOfRange(_)
        )
    }
}

/// Timezone applied to formatted strings that carry no offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timezone {
    #[default]
    Utc,
    /// The host's local timezone
    Local,
    Fixed(FixedOffset),
}

impl Timezone {
    /// Attach this timezone to a wall-clock time
    pub fn localize(&self, naive: NaiveDateTime) -> Option<Date> {
        match self {
            Timezone::Utc => Some(Utc.from_utc_datetime(&naive).fixed_offset()),
            Timezone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|d| d.fixed_offset()),
            Timezone::Fixed(offset) => offset.from_local_datetime(&naive).single(),
        }
    }
}

impl FromStr for Timezone {
    type Err = DateError;

    /// Accepts `UTC`/`GMT`/`Z`, `local`, or an offset such as `+02:00`, `-0530`, `+01`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utc" | "gmt" | "z" | "etc/utc" => return Ok(Timezone::Utc),
            "local" => return Ok(Timezone::Local),
            _ => {}
        }
        parse_offset(trimmed)
            .map(Timezone::Fixed)
            .ok_or_else(|| DateError::InvalidTimezone(s.to_string()))
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Utc => write!(f, "UTC"),
            Timezone::Local => write!(f, "local"),
            Timezone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes): (i32, i32) = match digits.len() {
        1 | 2 => (digits.parse().ok()?, 0),
        4 => (digits[..2].parse().ok()?, digits[2..].parse().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Normalize a value into the canonical date type.
///
/// Dates pass through, integers are Unix timestamps, and strings are parsed
/// with `format` (date format letters, see [`to_chrono_format`]) in
/// `timezone`. Without a format, RFC 3339, RFC 2822 and ISO-like layouts
/// are tried. Every other value type is rejected.
pub fn convert_to_date(
    value: &Value,
    format: Option<&str>,
    timezone: Timezone,
) -> Result<Date, DateError> {
    match value {
        Value::Date(date) => Ok(*date),
        Value::Int(timestamp) => Utc
            .timestamp_opt(*timestamp, 0)
            .single()
            .map(|d| d.fixed_offset())
            .ok_or(DateError::TimestampOutOfRange(*timestamp)),
        Value::String(text) => match format {
            Some(format) => parse_with_format(text, format, timezone),
            None => parse_free_form(text, timezone),
        },
        other => Err(DateError::UnsupportedInput(other.type_name())),
    }
}

/// Render `date` with date format letters
pub fn format_date(date: &Date, format: &str) -> String {
    date.format(&to_chrono_format(format)).to_string()
}

/// Date format letters with no chrono equivalent.
///
/// `S` (ordinal suffix), `z` (zero-based day of year), `W`, `t`, `L`, `o`,
/// `X`, `x`, `B`, `I`, `p`, `T`, `Z`, `e`, `c`, `r` and the parse modifiers
/// `! | + * ? #`. Parsing with one of these fails with
/// [`DateError::UnsupportedFormat`]; [`format_date`] writes them literally.
pub const UNSUPPORTED_FORMAT_LETTERS: &str = "SzWtLoXxBIpTZecr!|+*?#";

/// Translate date format letters into a chrono format string.
///
/// Supported letters: `d j D l N w m n M F Y y H G h g i s u v A a U O P`.
/// A backslash escapes the next character; anything else is literal,
/// including the letters in [`UNSUPPORTED_FORMAT_LETTERS`].
pub fn to_chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        let spec = match c {
            'd' => "%d",
            'j' => "%-d",
            'D' => "%a",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'm' => "%m",
            'n' => "%-m",
            'M' => "%b",
            'F' => "%B",
            'Y' => "%Y",
            'y' => "%y",
            'H' => "%H",
            'G' => "%-H",
            'h' => "%I",
            'g' => "%-I",
            'i' => "%M",
            's' => "%S",
            'u' => "%6f",
            'v' => "%3f",
            'A' => "%p",
            'a' => "%P",
            'U' => "%s",
            'O' => "%z",
            'P' => "%:z",
            '%' => "%%",
            '\\' => {
                match chars.next() {
                    Some('%') => out.push_str("%%"),
                    Some(literal) => out.push(literal),
                    None => {}
                }
                continue;
            }
            literal => {
                out.push(literal);
                continue;
            }
        };
        out.push_str(spec);
    }

    out
}

fn unsupported_letter(format: &str) -> Option<char> {
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if UNSUPPORTED_FORMAT_LETTERS.contains(c) {
            return Some(c);
        }
    }
    None
}

fn parse_with_format(text: &str, format: &str, timezone: Timezone) -> Result<Date, DateError> {
    if let Some(letter) = unsupported_letter(format) {
        return Err(DateError::UnsupportedFormat {
            format: format.to_string(),
            letter,
        });
    }

    let pattern = to_chrono_format(format);
    let unparsable = || DateError::Unparsable {
        value: text.to_string(),
        format: format.to_string(),
    };

    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, text, StrftimeItems::new(&pattern))
        .map_err(|_| unparsable())?;

    if parsed.timestamp().is_some() {
        let naive = parsed
            .to_naive_datetime_with_offset(0)
            .map_err(|_| unparsable())?;
        return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
    }

    fill_missing_fields(&mut parsed).map_err(|_| unparsable())?;

    if parsed.offset().is_some() {
        return parsed.to_datetime().map_err(|_| unparsable());
    }
    let naive = parsed
        .to_naive_datetime_with_offset(0)
        .map_err(|_| unparsable())?;
    timezone.localize(naive).ok_or_else(unparsable)
}

/// Default the fields a format left out to the start of their unit:
/// year 1970, January, the 1st, midnight.
fn fill_missing_fields(parsed: &mut Parsed) -> ParseResult<()> {
    let has_week = parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();

    if parsed.year().is_none()
        && parsed.year_div_100().is_none()
        && parsed.year_mod_100().is_none()
        && parsed.isoyear().is_none()
    {
        parsed.set_year(1970)?;
    }
    if parsed.month().is_none() && parsed.ordinal().is_none() && !has_week {
        parsed.set_month(1)?;
    }
    if parsed.day().is_none() && parsed.ordinal().is_none() && !has_week {
        parsed.set_day(1)?;
    }

    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        // 12-hour clock without AM/PM reads as AM
        (None, Some(_)) => parsed.set_ampm(false)?,
        _ => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}

const FREE_FORM_DATETIMES: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const FREE_FORM_DATES: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

fn parse_free_form(text: &str, timezone: Timezone) -> Result<Date, DateError> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(date);
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(text) {
        return Ok(date);
    }

    let naive = FREE_FORM_DATETIMES
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| {
            FREE_FORM_DATES
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        });

    naive
        .and_then(|n| timezone.localize(n))
        .ok_or_else(|| DateError::Unparsable {
            value: text.to_string(),
            format: String::new(),
        })
}
