//! Diagnostic JSON fragment rendering, one rule per host type.
//!
//! This path is independent of the SQL literal path: it feeds logging and
//! diagnostic tooling, and its temporal formats deliberately do not track
//! the SQL literal formats. String escaping delegates to `serde_json`.

use crate::value::{SqlArg, SqlValue};

/// The JSON null token.
pub const JSON_NULL: &str = "null";

/// Render an argument as a self-contained JSON fragment.
///
/// NULLs and absent arguments give the null token, as does anything without
/// a registered scalar formatter (raw fragments). Numerics render as
/// unquoted invariant text; non-finite floats have no JSON form and also
/// give the null token. The binary form is pinned to the quoted `0x` hex
/// rendering of the legacy wrapper.
pub fn json_fragment(arg: &SqlArg) -> String {
    let value = match arg {
        SqlArg::Absent | SqlArg::Null => return JSON_NULL.to_string(),
        SqlArg::Fragment(_) => return JSON_NULL.to_string(),
        SqlArg::Value(v) => v,
    };
    match value {
        SqlValue::Text(s) => json_string(s),
        SqlValue::Bool(b) => b.to_string(),
        SqlValue::U8(n) => n.to_string(),
        SqlValue::I16(n) => n.to_string(),
        SqlValue::I32(n) => n.to_string(),
        SqlValue::I64(n) => n.to_string(),
        SqlValue::F32(f) if !f.is_finite() => JSON_NULL.to_string(),
        SqlValue::F32(f) => f.to_string(),
        SqlValue::F64(f) if !f.is_finite() => JSON_NULL.to_string(),
        SqlValue::F64(f) => f.to_string(),
        SqlValue::Decimal(d) => d.to_string(),
        SqlValue::Bytes(b) => json_string(&crate::literal::hex_literal(b)),
        SqlValue::Guid(u) => json_string(&u.hyphenated().to_string()),
        SqlValue::Time(d) => match crate::literal::time_text(*d) {
            Some(t) => json_string(&t),
            None => JSON_NULL.to_string(),
        },
        SqlValue::Date(d) => json_string(&d.format("%Y-%m-%d").to_string()),
        SqlValue::DateTime(dt) => json_string(&dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        SqlValue::DateTimeOffset(dt) => {
            json_string(&dt.format("%Y-%m-%d %H:%M:%S %:z").to_string())
        }
    }
}

fn json_string(s: &str) -> String {
    // serde_json's serializer performs the standard escaping (backslash,
    // quote, and the control characters) and quotes the result.
    serde_json::to_string(s).unwrap_or_else(|_| JSON_NULL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeDelta};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    #[test]
    fn null_and_fragment_render_null_token() {
        assert_eq!(json_fragment(&SqlArg::Null), "null");
        assert_eq!(json_fragment(&SqlArg::Absent), "null");
        let frag = SqlArg::from(crate::value::Fragment::raw("GETDATE()"));
        assert_eq!(json_fragment(&frag), "null");
    }

    #[test]
    fn strings_are_escaped_and_quoted() {
        assert_eq!(
            json_fragment(&SqlArg::from("a\"b\\c\n\t")),
            r#""a\"b\\c\n\t""#
        );
    }

    #[test]
    fn numerics_are_unquoted() {
        assert_eq!(json_fragment(&SqlArg::from(42i32)), "42");
        assert_eq!(
            json_fragment(&SqlArg::from(Decimal::from_str("123.45").unwrap())),
            "123.45"
        );
        assert_eq!(json_fragment(&SqlArg::from(1.5f64)), "1.5");
        assert_eq!(json_fragment(&SqlArg::from(f64::NAN)), "null");
    }

    #[test]
    fn booleans_are_lowercase() {
        assert_eq!(json_fragment(&SqlArg::from(true)), "true");
        assert_eq!(json_fragment(&SqlArg::from(false)), "false");
    }

    #[test]
    fn temporals_use_the_json_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(json_fragment(&SqlArg::from(date)), r#""2024-03-05""#);

        let dt = date.and_hms_opt(13, 45, 0).unwrap();
        assert_eq!(
            json_fragment(&SqlArg::from(dt)),
            r#""2024-03-05 13:45:00""#
        );

        let odt = DateTime::parse_from_rfc3339("2024-03-05T13:45:00+02:00").unwrap();
        assert_eq!(
            json_fragment(&SqlArg::from(odt)),
            r#""2024-03-05 13:45:00 +02:00""#
        );

        let t = TimeDelta::seconds(3661);
        assert_eq!(json_fragment(&SqlArg::from(t)), r#""01:01:01""#);
    }

    #[test]
    fn guid_and_binary_are_quoted_strings() {
        let u = Uuid::parse_str("6f9619ff-8b86-d011-b42d-00c04fc964ff").unwrap();
        assert_eq!(
            json_fragment(&SqlArg::from(u)),
            r#""6f9619ff-8b86-d011-b42d-00c04fc964ff""#
        );
        assert_eq!(
            json_fragment(&SqlArg::from(vec![0u8, 0xff])),
            r#""0x00ff""#
        );
    }
}
