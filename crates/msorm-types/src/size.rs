//! Size and precision validation.
//!
//! Checks a value's natural length or precision/scale against a declared
//! constraint. Failures come back as `false` (plus diagnostic text from
//! [`size_violation`]) rather than errors: callers accumulate violations in
//! a validation loop before reporting.
//!
//! Natural precision/scale is computed by digit counting over the value's
//! invariant decimal text form (never exponent notation, `.` separator);
//! the tests pin this down against `rust_decimal` and primitive `Display`.

use rust_decimal::Decimal;

use crate::sqltype::{DeclaredType, SqlSize};
use crate::value::{SqlArg, SqlValue};

/// Check a value against a declared size.
///
/// `None` sizes always pass. NULL values always pass. Length sizes compare
/// against the value's natural character or byte length; precision sizes
/// require declared precision ≥ natural precision and declared scale ≥
/// natural scale.
pub fn check_size(arg: &SqlArg, size: SqlSize) -> bool {
    let value = match arg {
        SqlArg::Absent | SqlArg::Null => return true,
        SqlArg::Fragment(_) => return true,
        SqlArg::Value(v) => v,
    };
    match size {
        SqlSize::None | SqlSize::Max => true,
        SqlSize::Len(len) => natural_len(value) <= len as usize,
        SqlSize::Prec { precision, scale } => match decimal_text(value) {
            Some(text) => {
                let (np, ns) = natural_precision(&text);
                u32::from(precision) >= np && u32::from(scale) >= ns
            }
            None => false,
        },
    }
}

/// Check a value against a declared type's size, returning diagnostic text
/// on failure.
pub fn size_violation(arg: &SqlArg, declared: &DeclaredType) -> Option<String> {
    if check_size(arg, declared.size) {
        return None;
    }
    let natural = match arg {
        SqlArg::Value(v) => infer_declared_type(v),
        _ => "NULL".to_string(),
    };
    Some(format!(
        "value of natural type {natural} does not fit declared type {declared}"
    ))
}

/// Infer the minimal-fitting declared type of a value, as human-readable
/// SQL text (e.g. `varchar(12)`, `decimal(5,2)`). Used for diagnostics and
/// declare-by-example convenience.
pub fn infer_declared_type(value: &SqlValue) -> String {
    match value {
        SqlValue::Text(s) => {
            let len = s.chars().count().max(1);
            if s.is_ascii() {
                format!("varchar({len})")
            } else {
                format!("nvarchar({len})")
            }
        }
        SqlValue::Bool(_) => "bit".to_string(),
        SqlValue::U8(_) => "tinyint".to_string(),
        SqlValue::I16(_) => "smallint".to_string(),
        SqlValue::I32(_) => "int".to_string(),
        SqlValue::I64(_) => "bigint".to_string(),
        SqlValue::F32(_) => "real".to_string(),
        SqlValue::F64(_) => "float".to_string(),
        SqlValue::Decimal(d) => {
            let (p, s) = natural_precision(&d.to_string());
            format!("decimal({},{})", p.max(1), s)
        }
        SqlValue::Bytes(b) => format!("varbinary({})", b.len().max(1)),
        SqlValue::Guid(_) => "uniqueidentifier".to_string(),
        SqlValue::Time(_) => "time".to_string(),
        SqlValue::Date(_) => "date".to_string(),
        SqlValue::DateTime(_) => "datetime2".to_string(),
        SqlValue::DateTimeOffset(_) => "datetimeoffset".to_string(),
    }
}

/// Natural character length for text, byte length for binary, rendered
/// length otherwise.
fn natural_len(value: &SqlValue) -> usize {
    match value {
        SqlValue::Text(s) => s.chars().count(),
        SqlValue::Bytes(b) => b.len(),
        other => other.plain_text().chars().count(),
    }
}

/// The value's invariant decimal text, or `None` when it has no finite
/// numeric form.
fn decimal_text(value: &SqlValue) -> Option<String> {
    match value {
        SqlValue::Decimal(d) => Some(d.to_string()),
        SqlValue::U8(n) => Some(n.to_string()),
        SqlValue::I16(n) => Some(n.to_string()),
        SqlValue::I32(n) => Some(n.to_string()),
        SqlValue::I64(n) => Some(n.to_string()),
        SqlValue::F32(f) if f.is_finite() => Some(f.to_string()),
        SqlValue::F64(f) if f.is_finite() => Some(f.to_string()),
        SqlValue::Text(s) => {
            // Re-render the parsed number so exponent forms like "1e3" are
            // counted over their expanded digits, not their source text.
            let t = s.trim().replace(',', ".");
            if let Ok(d) = t.parse::<Decimal>() {
                return Some(d.to_string());
            }
            t.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.to_string())
        }
        _ => None,
    }
}

/// Digit counts over invariant decimal text: total precision and
/// post-separator scale. Leading integer zeros do not count; a bare `0`
/// integer part counts zero digits; fraction digits count as printed.
fn natural_precision(text: &str) -> (u32, u32) {
    let unsigned = text.trim_start_matches(['+', '-']);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    let int_digits = int_part.trim_start_matches('0').len() as u32;
    let scale = frac_part.len() as u32;
    (int_digits + scale, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn val(v: impl Into<SqlValue>) -> SqlArg {
        SqlArg::Value(v.into())
    }

    #[test]
    fn sizeless_always_passes() {
        assert!(check_size(&val(12345i64), SqlSize::None));
        assert!(check_size(&val("anything at all"), SqlSize::Max));
    }

    #[test]
    fn null_always_passes() {
        assert!(check_size(&SqlArg::Null, SqlSize::Len(1)));
        assert!(check_size(
            &SqlArg::Absent,
            SqlSize::Prec {
                precision: 1,
                scale: 0
            }
        ));
    }

    #[test]
    fn length_compares_character_count() {
        assert!(check_size(&val("hello"), SqlSize::Len(5)));
        assert!(!check_size(&val("hello"), SqlSize::Len(4)));
        // Characters, not bytes.
        assert!(check_size(&val("héllo"), SqlSize::Len(5)));
    }

    #[test]
    fn length_compares_byte_count_for_binary() {
        assert!(check_size(&val(vec![1u8, 2, 3]), SqlSize::Len(3)));
        assert!(!check_size(&val(vec![1u8, 2, 3]), SqlSize::Len(2)));
    }

    #[test]
    fn precision_and_scale_must_cover_the_value() {
        let d = Decimal::from_str("123.45").unwrap();
        assert!(check_size(
            &val(d),
            SqlSize::Prec {
                precision: 5,
                scale: 2
            }
        ));
        assert!(!check_size(
            &val(d),
            SqlSize::Prec {
                precision: 4,
                scale: 2
            }
        ));
        assert!(!check_size(
            &val(d),
            SqlSize::Prec {
                precision: 5,
                scale: 1
            }
        ));
    }

    // Pins the digit-counting rules against rust_decimal's text form.
    #[test]
    fn natural_precision_digit_counting() {
        assert_eq!(natural_precision("123.45"), (5, 2));
        assert_eq!(natural_precision("-123.45"), (5, 2));
        assert_eq!(natural_precision("0.5"), (1, 1));
        assert_eq!(natural_precision("0"), (0, 0));
        assert_eq!(natural_precision("1000"), (4, 0));
        // Trailing fraction zeros count as printed.
        assert_eq!(natural_precision("1.500"), (4, 3));
    }

    #[test]
    fn decimal_text_never_uses_exponents() {
        let d = Decimal::from_str("1e3").unwrap_or(Decimal::new(1000, 0));
        assert_eq!(decimal_text(&SqlValue::Decimal(d)).unwrap(), "1000");
        let f = 1e21f64;
        let text = decimal_text(&SqlValue::F64(f)).unwrap();
        assert!(!text.contains('e') && !text.contains('E'), "{text}");
    }

    #[test]
    fn exponent_form_text_is_counted_over_expanded_digits() {
        // "1e3" is 1000: four integer digits, not three characters.
        assert_eq!(decimal_text(&SqlValue::from("1e3")).unwrap(), "1000");
        assert!(!check_size(
            &val("1e3"),
            SqlSize::Prec {
                precision: 3,
                scale: 0
            }
        ));
        assert!(check_size(
            &val("1e3"),
            SqlSize::Prec {
                precision: 4,
                scale: 0
            }
        ));
        assert_eq!(decimal_text(&SqlValue::from("1,5")).unwrap(), "1.5");
    }

    #[test]
    fn non_finite_floats_fail_precision_checks() {
        assert!(!check_size(
            &val(f64::NAN),
            SqlSize::Prec {
                precision: 38,
                scale: 10
            }
        ));
    }

    #[test]
    fn infer_minimal_fitting_types() {
        assert_eq!(infer_declared_type(&SqlValue::from("hello world!")), "varchar(12)");
        assert_eq!(infer_declared_type(&SqlValue::from("héllo")), "nvarchar(5)");
        assert_eq!(
            infer_declared_type(&SqlValue::from(Decimal::from_str("123.45").unwrap())),
            "decimal(5,2)"
        );
        assert_eq!(infer_declared_type(&SqlValue::from(7i32)), "int");
        assert_eq!(infer_declared_type(&SqlValue::from(vec![1u8, 2])), "varbinary(2)");
    }

    #[test]
    fn violation_text_names_both_types() {
        let declared = DeclaredType::with_len(crate::sqltype::SqlType::VarChar, 4).unwrap();
        let msg = size_violation(&val("hello"), &declared).unwrap();
        assert!(msg.contains("varchar(5)"), "{msg}");
        assert!(msg.contains("varchar(4)"), "{msg}");
        assert!(size_violation(&val("hi"), &declared).is_none());
    }
}
