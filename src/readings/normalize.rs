use super::Reading;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::{Map, Value};
use tracing::debug;

const TIMESTAMP_KEYS: &[&str] = &["Timestamp"];
const PHASE1_CURRENT_KEYS: &[&str] = &["L1_I_A"];
const PHASE1_APPARENT_KEYS: &[&str] = &["L1_VA"];
const PHASE2_CURRENT_KEYS: &[&str] = &["L2_I_A"];
const PHASE2_APPARENT_KEYS: &[&str] = &["L2_VA"];
const PHASE1_PEAK_KEYS: &[&str] = &["l1_peak_i_a"];
const PHASE2_PEAK_KEYS: &[&str] = &["l2_peak_i_a"];
const TOTAL_APPARENT_KEYS: &[&str] = &["Total_VA"];
const TOTAL_ENERGY_KEYS: &[&str] = &["Total_kVAh"];
const DAILY_ENERGY_KEYS: &[&str] = &["Daily_kVAh"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Normalize one raw record. Never fails: bad fields become 0 and a bad
/// timestamp becomes `None`.
pub fn normalize(raw: &Value, tz: &Tz) -> Reading {
    let Some(obj) = raw.as_object() else {
        debug!("Skipping non-object record: {}", raw);
        return Reading::default();
    };

    let timestamp = lookup(obj, TIMESTAMP_KEYS).and_then(|v| timestamp_value(v, tz));
    if timestamp.is_none() {
        debug!(
            "Unparseable timestamp {:?}; reading excluded from aggregation",
            lookup(obj, TIMESTAMP_KEYS)
        );
    }

    let num = |keys: &[&str]| lookup(obj, keys).map(coerce_number).unwrap_or(0.0);

    Reading {
        timestamp,
        phase1_current: num(PHASE1_CURRENT_KEYS),
        phase1_apparent: num(PHASE1_APPARENT_KEYS),
        phase2_current: num(PHASE2_CURRENT_KEYS),
        phase2_apparent: num(PHASE2_APPARENT_KEYS),
        phase1_peak_current: num(PHASE1_PEAK_KEYS),
        phase2_peak_current: num(PHASE2_PEAK_KEYS),
        total_apparent: num(TOTAL_APPARENT_KEYS),
        total_energy: num(TOTAL_ENERGY_KEYS),
        daily_energy: num(DAILY_ENERGY_KEYS),
    }
}

pub fn normalize_all(raw: &[Value], tz: &Tz) -> Vec<Reading> {
    let readings: Vec<Reading> = raw.iter().map(|r| normalize(r, tz)).collect();

    let dropped = readings.iter().filter(|r| r.timestamp.is_none()).count();
    if dropped > 0 {
        debug!(
            "{} of {} readings have no usable timestamp",
            dropped,
            readings.len()
        );
    }

    readings
}

/// Tolerant ISO-8601 parsing. Offsets are honoured; naive values are taken
/// as wall-clock time in `tz`.
pub fn parse_timestamp(s: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn timestamp_value(v: &Value, tz: &Tz) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => parse_timestamp(s, tz),
        // Epoch milliseconds
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Case-insensitive key lookup over a set of aliases.
fn lookup<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    for alias in aliases {
        if let Some(v) = obj.get(*alias) {
            return Some(v);
        }
    }
    obj.iter()
        .find(|(k, _)| aliases.iter().any(|a| k.eq_ignore_ascii_case(a)))
        .map(|(_, v)| v)
}

/// Numeric coercion with a 0 fallback; the result is always finite.
pub(crate) fn coerce_number(v: &Value) -> f64 {
    let n = match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_leading_float(s).unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Parse the longest numeric prefix, so "12.5 VA" reads as 12.5.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<f64>() {
        return Some(n);
    }

    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].trim_end_matches('.').parse::<f64>().ok()
}
