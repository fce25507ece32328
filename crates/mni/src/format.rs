//! Display formatting for MNI scalar encodings.
//!
//! These functions are total: unparseable input never panics and never errors. Empty input
//! renders as [`NOT_AVAILABLE`]; anything else that cannot be interpreted is passed through.
//!
//! Two timestamp encodings appear on the wire:
//! - compact digits `YYYYMMDD[HHMMSS]` (MNI 2.2), sliced at fixed offsets
//!   (year `0..4`, month `4..6`, day `6..8`, hour `8..10`, minute `10..12`, second `12..14`);
//! - ISO-8601 (MNI 3.0), rendered in the wall-clock time of its own offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Sentinel rendered for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a date as `DD/MM/YYYY`.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    if let Some(compact) = compact_digits(value) {
        return compact_date(compact);
    }

    if looks_like_iso(value) {
        if let Some((date, _)) = parse_iso(value) {
            return date.format("%d/%m/%Y").to_string();
        }
    }

    value.to_string()
}

/// Formats a timestamp as `DD/MM/YYYY HH:MM`, or `DD/MM/YYYY` when the input has no time part.
pub fn format_date_time(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    if let Some(compact) = compact_digits(value) {
        let date = compact_date(compact);
        return if compact.len() >= 12 {
            format!("{date} {}:{}", &compact[8..10], &compact[10..12])
        } else {
            date
        };
    }

    if looks_like_iso(value) {
        match parse_iso(value) {
            Some((date, Some(time))) => {
                return format!("{} {}", date.format("%d/%m/%Y"), time.format("%H:%M"));
            }
            Some((date, None)) => return date.format("%d/%m/%Y").to_string(),
            None => {}
        }
    }

    value.to_string()
}

/// Parses either timestamp encoding into a calendar date.
///
/// ISO values keep the calendar date of their own offset.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Some(compact) = compact_digits(value) {
        let year = compact[0..4].parse().ok()?;
        let month = compact[4..6].parse().ok()?;
        let day = compact[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if looks_like_iso(value) {
        return parse_iso(value).map(|(date, _)| date);
    }

    None
}

/// Masks a CPF (`NNN.NNN.NNN-NN`) or CNPJ (`NN.NNN.NNN/NNNN-NN`).
///
/// Non-digits are stripped first. Values whose digit count does not match the kind of person
/// are returned trimmed but otherwise as given.
pub fn format_document(value: &str, is_legal_entity: bool) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let digits = only_digits(trimmed);
    match (is_legal_entity, digits.len()) {
        (true, 14) => format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        ),
        (false, 11) => format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        ),
        _ => trimmed.to_string(),
    }
}

/// Masks an 8-digit CEP as `NNNNN-NNN`.
pub fn format_postal_code(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let digits = only_digits(trimmed);
    if digits.len() == 8 {
        format!("{}-{}", &digits[0..5], &digits[5..8])
    } else {
        trimmed.to_string()
    }
}

/// Masks a 20-digit CNJ case number as `NNNNNNN-NN.NNNN.N.NN.NNNN`.
pub fn format_process_number(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let digits = only_digits(trimmed);
    if digits.len() == 20 {
        format!(
            "{}-{}.{}.{}.{}.{}",
            &digits[0..7],
            &digits[7..9],
            &digits[9..13],
            &digits[13..14],
            &digits[14..16],
            &digits[16..20]
        )
    } else {
        trimmed.to_string()
    }
}

/// Renders a byte count with base-1024 units, rounded to two decimals.
///
/// Trailing zeros are dropped, so `1536` renders as `1.5 KB` and `1024` as `1 KB`.
pub fn format_byte_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while unit < BYTE_UNITS.len() - 1 && round_cents(value) >= 1024.0 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", round_cents(value));
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{rounded} {}", BYTE_UNITS[unit])
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Renders an amount in Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{:02}", cents % 100)
}

fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn compact_digits(value: &str) -> Option<&str> {
    ((8..=14).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())).then_some(value)
}

fn compact_date(compact: &str) -> String {
    format!("{}/{}/{}", &compact[6..8], &compact[4..6], &compact[0..4])
}

fn looks_like_iso(value: &str) -> bool {
    value.contains('T') || value.contains('-')
}

fn parse_iso(value: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        let local = dt.naive_local();
        return Some((local.date(), Some(local.time())));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%dT%H:%M%z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            let local = dt.naive_local();
            return Some((local.date(), Some(local.time())));
        }
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(local) = NaiveDateTime::parse_from_str(value, format) {
            return Some((local.date(), Some(local.time())));
        }
    }

    value
        .get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
        .map(|date| (date, None))
}
