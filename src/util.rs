use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SubsecRound, Utc};

/// Encode a timestamp as generalized time with millisecond precision (`YYYYMMDDhhmmss.fffZ`).
pub(crate) fn encode_generalized_time(t: &DateTime<Utc>) -> String {
    t.format("%Y%m%d%H%M%S%.3fZ").to_string()
}

/// Decode a UTC generalized time value.
///
/// Accepts whole seconds (`20260101120000Z`) and any fractional precision
/// (`20260101120000.5Z`, `20260101120000.123456Z`). Minute-only values are accepted too.
pub(crate) fn decode_generalized_time(value: &str) -> Option<DateTime<Utc>> {
    let body = value.trim().strip_suffix(['Z', 'z'])?;
    let (whole, fraction) = match body.split_once(['.', ',']) {
        Some((w, f)) => (w, Some(f)),
        None => (body, None),
    };
    if !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole = match whole.len() {
        14 => whole.to_string(),
        12 if fraction.is_none() => format!("{whole}00"),
        _ => return None,
    };
    let mut parsed = NaiveDateTime::parse_from_str(&whole, "%Y%m%d%H%M%S").ok()?;
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits: String = fraction.chars().chain("000000000".chars()).take(9).collect();
        let nanos: i64 = digits.parse().ok()?;
        parsed += chrono::Duration::nanoseconds(nanos);
    }
    Some(normalize_timestamp(parsed.and_utc()))
}

/// Drop sub-millisecond precision and clamp to years 0000-9999, the range generalized time
/// can carry, so values survive an encode/decode cycle unchanged.
pub(crate) fn normalize_timestamp(t: DateTime<Utc>) -> DateTime<Utc> {
    let t = t.trunc_subsecs(3);
    let bound = if t.year() < 0 {
        NaiveDate::from_ymd_opt(0, 1, 1).and_then(|d| d.and_hms_milli_opt(0, 0, 0, 0))
    } else if t.year() > 9999 {
        NaiveDate::from_ymd_opt(9999, 12, 31).and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
    } else {
        None
    };
    bound.map_or(t, |b| b.and_utc())
}

pub(crate) fn decode_boolean(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// `None` for an empty string, which is never written to an entry.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

pub(crate) fn generate_task_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Escape an RDN attribute value.
pub(crate) fn escape_rdn_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);
    for (i, c) in value.chars().enumerate() {
        let needs_escape = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=')
            || (i == 0 && (c == ' ' || c == '#'))
            || (i == last && c == ' ');
        if needs_escape {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
