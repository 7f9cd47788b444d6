//! Lenient cell conversion. Anything that does not convert is `None`.

use chrono::NaiveDateTime;
use rusqlite::types::ValueRef;

use crate::models::parse_timestamp;

pub(crate) fn text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(bytes) => {
            let s = String::from_utf8_lossy(bytes);
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

pub(crate) fn real(value: ValueRef<'_>) -> Option<f64> {
    let parsed = match value {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(_) => text(value).and_then(|s| s.parse::<f64>().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    };
    parsed.filter(|f| f.is_finite())
}

pub(crate) fn integer(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Text(_) => {
            let s = text(value)?;
            s.parse::<i64>()
                .ok()
                .or_else(|| whole_number(s.parse::<f64>().ok()?))
        }
        ValueRef::Real(f) => whole_number(f),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

fn whole_number(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Ages are whole, non-negative years.
pub(crate) fn age(value: ValueRef<'_>) -> Option<u32> {
    integer(value).and_then(|i| u32::try_from(i).ok())
}

pub(crate) fn flag(value: ValueRef<'_>) -> Option<bool> {
    match value {
        ValueRef::Integer(0) => Some(false),
        ValueRef::Integer(1) => Some(true),
        ValueRef::Text(_) => match text(value)?.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => Some(true),
            "0" | "false" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn timestamp(value: ValueRef<'_>) -> Option<NaiveDateTime> {
    match value {
        ValueRef::Text(_) => parse_timestamp(&text(value)?),
        _ => None,
    }
}
