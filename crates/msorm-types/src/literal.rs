//! SQL literal construction.
//!
//! The checked path ([`build`], [`build_cast`]) renders a value under a known
//! [`DeclaredType`], dispatching to one core builder per T-SQL type family.
//! The unchecked path ([`build_unchecked`]) infers the declared type from the
//! value itself via the registry. [`build_test_value`] converts *textual*
//! (human-entered) representations for diagnostic tooling.
//!
//! Every builder emits either the NULL token, a validly quoted and escaped
//! literal, or a `CAST(... AS ...)` expression, never raw unescaped content.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::compliance::resolve_host;
use crate::error::{TypeError, TypeResult};
use crate::registry::TypeRegistry;
use crate::sqltype::{DeclaredType, SqlType, TypeGroup};
use crate::value::{HostType, SqlArg, SqlValue};

/// The SQL NULL token.
pub const NULL: &str = "NULL";

/// Fractional-second shape of a datetime family member.
#[derive(Clone, Copy)]
enum Fraction {
    /// Whole seconds (smalldatetime).
    None,
    /// Milliseconds, 3 fixed digits (datetime).
    Millis,
    /// 100ns ticks, 7 fixed digits (datetime2).
    Ticks,
}

/// Render `arg` as a literal of the declared type.
pub fn build(arg: &SqlArg, declared: &DeclaredType) -> TypeResult<String> {
    let value = match arg {
        SqlArg::Absent | SqlArg::Null => return Ok(NULL.to_string()),
        SqlArg::Fragment(f) => return Ok(f.as_str().to_string()),
        SqlArg::Value(v) => v,
    };
    match declared.tag {
        SqlType::Char
        | SqlType::VarChar
        | SqlType::Text
        | SqlType::NChar
        | SqlType::NVarChar
        | SqlType::NText => Ok(quote_text(&value.plain_text(), declared.tag.is_unicode())),
        SqlType::Bit => Ok(build_bit(&value.plain_text())),
        SqlType::TinyInt | SqlType::SmallInt | SqlType::Int | SqlType::BigInt => {
            build_integer(value)
        }
        SqlType::Decimal | SqlType::Money | SqlType::SmallMoney => build_decimal(value),
        SqlType::Float | SqlType::Real => build_float(value),
        SqlType::Binary | SqlType::VarBinary | SqlType::Image => build_binary(value),
        SqlType::UniqueIdentifier => build_guid(value),
        SqlType::Date => build_date(value),
        SqlType::Time => build_time(value),
        SqlType::SmallDateTime => build_datetime(value, Fraction::None),
        SqlType::DateTime => build_datetime(value, Fraction::Millis),
        SqlType::DateTime2 => build_datetime(value, Fraction::Ticks),
        SqlType::DateTimeOffset => build_datetimeoffset(value),
        SqlType::Variant => build_unchecked(arg),
    }
}

/// Render `arg` as `CAST(literal AS type)`.
///
/// Used where the engine's own literal type inference would otherwise be
/// ambiguous.
pub fn build_cast(arg: &SqlArg, declared: &DeclaredType) -> TypeResult<String> {
    Ok(format!(
        "CAST({} AS {})",
        build(arg, declared)?,
        declared.to_sql()
    ))
}

/// Render a value as a CAST against its host type's default declared type.
///
/// This is the single generic stand-in for one convenience cast per host
/// type: `cast(42i16)` yields `CAST(42 AS smallint)`.
pub fn cast<T: Into<SqlValue>>(value: T) -> TypeResult<String> {
    let value = value.into();
    let host = value.host_type();
    let declared = TypeRegistry::global()
        .default_declared(host)
        .ok_or(TypeError::Unsupported {
            host,
            supported: TypeRegistry::global().supported_list(),
        })?;
    build_cast(&SqlArg::Value(value), &declared)
}

/// Render a literal with the declared type inferred from the value.
///
/// NULLs and absent arguments yield the NULL token; raw fragments pass
/// through verbatim and uninspected (the caller vouches for them); present
/// values resolve through host compliance and build under their host type's
/// default declared type. Unregistered and non-scalar host types come back
/// as errors for the caller to raise or to treat as "must be bound as a
/// parameter".
pub fn build_unchecked(arg: &SqlArg) -> TypeResult<String> {
    match arg {
        SqlArg::Absent | SqlArg::Null => Ok(NULL.to_string()),
        SqlArg::Fragment(f) => Ok(f.as_str().to_string()),
        SqlArg::Value(v) => {
            let host = resolve_host(v.host_type())?;
            // Terminates the variant delegation cycle: a resolved generic
            // placeholder carries no concrete value to render.
            if host == HostType::Any {
                return Ok(NULL.to_string());
            }
            let declared = TypeRegistry::global()
                .default_declared(host)
                .ok_or(TypeError::Unsupported {
                    host,
                    supported: TypeRegistry::global().supported_list(),
                })?;
            #[cfg(feature = "tracing")]
            tracing::trace!(host = %host, declared = %declared, "building unchecked literal");
            build(arg, &declared)
        }
    }
}

/// Convert a textual (human-entered) value into a literal of the declared
/// type, for diagnostic tooling.
///
/// Recognizes the NULL token case-insensitively. Temporal types are parsed
/// and reformatted into their exact literal shape, falling back to escaped
/// verbatim text when parsing fails. Text types are quoted and escaped, with
/// the Unicode marker for national types. Decimal-family numerics accept a
/// comma decimal separator and normalize it to a dot. The variant type is
/// treated as literal Unicode text.
pub fn build_test_value(text: &str, declared: &DeclaredType) -> TypeResult<String> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return Ok(NULL.to_string());
    }
    if declared.tag.is_temporal() {
        return Ok(reformat_temporal(trimmed, declared.tag));
    }
    let group = TypeRegistry::global().sql_descriptor(declared.tag).group;
    match group {
        TypeGroup::Text => Ok(quote_text(text, declared.tag.is_unicode())),
        TypeGroup::Object => Ok(quote_text(text, true)),
        TypeGroup::Number => {
            let normalized = match declared.tag {
                SqlType::Decimal
                | SqlType::Money
                | SqlType::SmallMoney
                | SqlType::Float
                | SqlType::Real => trimmed.replace(',', "."),
                _ => trimmed.to_string(),
            };
            numeric_text(&normalized, declared.tag)
                .ok_or_else(|| TypeError::conversion(text, declared.tag.sql_name()))
        }
        TypeGroup::Hexadecimal => {
            if !is_hex_text(trimmed) {
                return Err(TypeError::conversion(text, declared.tag.sql_name()));
            }
            Ok(trimmed.to_string())
        }
    }
}

// ---- core builders, one per type family ----

/// Bit literals are defined over the *string form* of the input: the
/// case-insensitive text "TRUE" maps to `1`, anything else to `0`.
fn build_bit(text: &str) -> String {
    if text.trim().eq_ignore_ascii_case("true") {
        "1".to_string()
    } else {
        "0".to_string()
    }
}

fn build_integer(value: &SqlValue) -> TypeResult<String> {
    match value {
        SqlValue::U8(n) => Ok(n.to_string()),
        SqlValue::I16(n) => Ok(n.to_string()),
        SqlValue::I32(n) => Ok(n.to_string()),
        SqlValue::I64(n) => Ok(n.to_string()),
        SqlValue::Decimal(d) if d.is_integer() => Ok(d.trunc().normalize().to_string()),
        SqlValue::Text(s) => match s.trim().parse::<i128>() {
            Ok(n) => Ok(n.to_string()),
            Err(_) => Err(TypeError::conversion(s, "integer")),
        },
        other => Err(TypeError::conversion(other.plain_text(), "integer")),
    }
}

fn build_decimal(value: &SqlValue) -> TypeResult<String> {
    let dec = match value {
        SqlValue::Decimal(d) => *d,
        SqlValue::U8(n) => Decimal::from(*n),
        SqlValue::I16(n) => Decimal::from(*n),
        SqlValue::I32(n) => Decimal::from(*n),
        SqlValue::I64(n) => Decimal::from(*n),
        SqlValue::F32(f) => {
            Decimal::try_from(*f).map_err(|_| TypeError::conversion(f, "decimal"))?
        }
        SqlValue::F64(f) => {
            Decimal::try_from(*f).map_err(|_| TypeError::conversion(f, "decimal"))?
        }
        SqlValue::Text(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| TypeError::conversion(s, "decimal"))?,
        other => return Err(TypeError::conversion(other.plain_text(), "decimal")),
    };
    Ok(dec.to_string())
}

fn build_float(value: &SqlValue) -> TypeResult<String> {
    let f = match value {
        SqlValue::F64(f) => *f,
        SqlValue::F32(f) => f64::from(*f),
        SqlValue::U8(n) => return Ok(n.to_string()),
        SqlValue::I16(n) => return Ok(n.to_string()),
        SqlValue::I32(n) => return Ok(n.to_string()),
        SqlValue::I64(n) => return Ok(n.to_string()),
        SqlValue::Decimal(d) => return Ok(d.to_string()),
        SqlValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| TypeError::conversion(s, "float"))?,
        other => return Err(TypeError::conversion(other.plain_text(), "float")),
    };
    // T-SQL has no literal for infinities or NaN.
    if !f.is_finite() {
        return Err(TypeError::out_of_range(f, "float"));
    }
    Ok(f.to_string())
}

fn build_binary(value: &SqlValue) -> TypeResult<String> {
    match value {
        SqlValue::Bytes(b) if b.is_empty() => Ok(NULL.to_string()),
        SqlValue::Bytes(b) => Ok(hex_literal(b)),
        other => Err(TypeError::conversion(other.plain_text(), "varbinary")),
    }
}

fn build_guid(value: &SqlValue) -> TypeResult<String> {
    match value {
        SqlValue::Guid(u) => Ok(format!("'{}'", u.hyphenated())),
        SqlValue::Text(s) => match Uuid::parse_str(s.trim()) {
            Ok(u) => Ok(format!("'{}'", u.hyphenated())),
            Err(_) => Err(TypeError::conversion(s, "uniqueidentifier")),
        },
        other => Err(TypeError::conversion(
            other.plain_text(),
            "uniqueidentifier",
        )),
    }
}

fn build_date(value: &SqlValue) -> TypeResult<String> {
    match value {
        SqlValue::Date(d) => Ok(format!("'{}'", d.format("%Y-%m-%d"))),
        SqlValue::DateTime(dt) => Ok(format!("'{}'", dt.format("%Y-%m-%d"))),
        other => Err(TypeError::conversion(other.plain_text(), "date")),
    }
}

fn build_time(value: &SqlValue) -> TypeResult<String> {
    match value {
        SqlValue::Time(d) => match time_text(*d) {
            Some(text) => Ok(format!("'{text}'")),
            None => Err(TypeError::out_of_range(format!("{d:?}"), "time")),
        },
        other => Err(TypeError::conversion(other.plain_text(), "time")),
    }
}

fn build_datetime(value: &SqlValue, fraction: Fraction) -> TypeResult<String> {
    let dt = match value {
        SqlValue::DateTime(dt) => *dt,
        SqlValue::Date(d) => d.and_hms_opt(0, 0, 0).unwrap_or_default(),
        other => return Err(TypeError::conversion(other.plain_text(), "datetime")),
    };
    Ok(format!("'{}'", datetime_text(&dt, fraction)))
}

fn build_datetimeoffset(value: &SqlValue) -> TypeResult<String> {
    match value {
        SqlValue::DateTimeOffset(dt) => Ok(format!("'{}'", datetimeoffset_text(dt))),
        other => Err(TypeError::conversion(other.plain_text(), "datetimeoffset")),
    }
}

// ---- text shaping helpers ----

fn quote_text(s: &str, unicode: bool) -> String {
    let escaped = s.replace('\'', "''");
    if unicode {
        format!("N'{escaped}'")
    } else {
        format!("'{escaped}'")
    }
}

/// `0x` followed by two lowercase hex digits per byte, original byte order.
pub(crate) fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Invariant long-time text for a time-of-day magnitude, or `None` when the
/// magnitude falls outside `[0, 24h)`.
pub(crate) fn time_text(delta: TimeDelta) -> Option<String> {
    if delta < TimeDelta::zero() || delta >= TimeDelta::hours(24) {
        return None;
    }
    let total_secs = delta.num_seconds();
    let (h, m, s) = (total_secs / 3600, total_secs % 3600 / 60, total_secs % 60);
    let ticks = delta.subsec_nanos() / 100;
    if ticks == 0 {
        Some(format!("{h:02}:{m:02}:{s:02}"))
    } else {
        Some(format!("{h:02}:{m:02}:{s:02}.{ticks:07}"))
    }
}

fn datetime_text(dt: &NaiveDateTime, fraction: Fraction) -> String {
    match fraction {
        Fraction::None => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        Fraction::Millis => dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        Fraction::Ticks => {
            // Fixed 7-digit fraction; chrono only offers 3/6/9-digit widths.
            let ticks = dt.nanosecond() % 1_000_000_000 / 100;
            format!("{}.{ticks:07}", dt.format("%Y-%m-%dT%H:%M:%S"))
        }
    }
}

/// ISO-8601 text with 7 fractional digits and a `+HH:MM` offset.
pub(crate) fn datetimeoffset_text(dt: &DateTime<FixedOffset>) -> String {
    let ticks = dt.nanosecond() % 1_000_000_000 / 100;
    format!(
        "{}.{ticks:07}{}",
        dt.format("%Y-%m-%dT%H:%M:%S"),
        dt.format("%:z")
    )
}

/// Canonical numeric text for a number-group test value. Parsing through the
/// family's numeric type is the validator: anything the type does not accept
/// (comments, expressions, stray signs) never reaches the emitted SQL.
fn numeric_text(s: &str, tag: SqlType) -> Option<String> {
    match tag {
        SqlType::Decimal | SqlType::Money | SqlType::SmallMoney => {
            s.parse::<Decimal>().ok().map(|d| d.to_string())
        }
        SqlType::Float | SqlType::Real => {
            let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
            Some(f.to_string())
        }
        _ => s.parse::<i128>().ok().map(|n| n.to_string()),
    }
}

fn is_hex_text(s: &str) -> bool {
    s.len() > 2
        && (s.starts_with("0x") || s.starts_with("0X"))
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn reformat_temporal(text: &str, tag: SqlType) -> String {
    let fallback = || quote_text(text, false);
    match tag {
        SqlType::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(|d| format!("'{}'", d.format("%Y-%m-%d")))
            .unwrap_or_else(|_| fallback()),
        SqlType::Time => parse_time_of_day(text)
            .and_then(time_text)
            .map(|t| format!("'{t}'"))
            .unwrap_or_else(fallback),
        SqlType::SmallDateTime => parse_datetime(text)
            .map(|dt| format!("'{}'", datetime_text(&dt, Fraction::None)))
            .unwrap_or_else(fallback),
        SqlType::DateTime => parse_datetime(text)
            .map(|dt| format!("'{}'", datetime_text(&dt, Fraction::Millis)))
            .unwrap_or_else(fallback),
        SqlType::DateTime2 => parse_datetime(text)
            .map(|dt| format!("'{}'", datetime_text(&dt, Fraction::Ticks)))
            .unwrap_or_else(fallback),
        SqlType::DateTimeOffset => DateTime::parse_from_rfc3339(text)
            .map(|dt| format!("'{}'", datetimeoffset_text(&dt)))
            .unwrap_or_else(|_| fallback()),
        _ => fallback(),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_time_of_day(text: &str) -> Option<TimeDelta> {
    let t = NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()?;
    Some(
        TimeDelta::seconds(i64::from(t.num_seconds_from_midnight()))
            + TimeDelta::nanoseconds(i64::from(t.nanosecond())),
    )
}
