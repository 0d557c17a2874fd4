//! Host values and the argument holder used by the literal builders.
//!
//! Every value that reaches the SQL text layer is one of a closed set of host
//! types. [`SqlValue`] is the tagged union of present scalar values;
//! [`SqlArg`] wraps it with the states the builders must distinguish: no
//! argument supplied, an explicit NULL, a caller-trusted raw fragment, or a
//! present value.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tag identifying one type of the host type system.
///
/// Scalar tags have a registered SQL mapping. `Any` is the generic
/// placeholder resolved from untyped NULLs. The remaining tags name DSL
/// constructs the registry recognizes only for classification: identifiers,
/// raw fragments, expression objects and procedure references are accepted at
/// inline substitution points, while records and row sets belong to the
/// tabular parameter surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostType {
    /// UTF-8 string
    Text,
    /// Boolean
    Bool,
    /// 8-bit unsigned integer (tinyint)
    U8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// Fixed-point decimal
    Decimal,
    /// Byte array
    Bytes,
    /// GUID / uniqueidentifier
    Guid,
    /// Time of day, as a signed magnitude from midnight
    Time,
    /// Calendar date
    Date,
    /// Date and time without offset
    DateTime,
    /// Date and time with a UTC offset
    DateTimeOffset,
    /// Generic placeholder for untyped NULL values
    Any,
    /// SQL identifier (inline only)
    Ident,
    /// Raw SQL fragment (inline only)
    Fragment,
    /// Expression object from the builder DSL (inline only)
    Expr,
    /// Stored procedure reference (inline only)
    Proc,
    /// Record / row construct (tabular only)
    Record,
    /// Row-set construct (tabular only)
    RowSet,
}

impl std::fmt::Display for HostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "Text",
            Self::Bool => "Bool",
            Self::U8 => "U8",
            Self::I16 => "I16",
            Self::I32 => "I32",
            Self::I64 => "I64",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::Decimal => "Decimal",
            Self::Bytes => "Bytes",
            Self::Guid => "Guid",
            Self::Time => "Time",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Any => "Any",
            Self::Ident => "Ident",
            Self::Fragment => "Fragment",
            Self::Expr => "Expr",
            Self::Proc => "Proc",
            Self::Record => "Record",
            Self::RowSet => "RowSet",
        };
        f.write_str(name)
    }
}

/// A present scalar value, tagged with its host type.
///
/// Time of day is carried as a [`TimeDelta`] rather than a wall-clock time so
/// out-of-range magnitudes (negative, or 24h and beyond) survive until the
/// literal builder can reject them explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Bool(bool),
    U8(u8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Bytes(Vec<u8>),
    Guid(Uuid),
    Time(TimeDelta),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
}

impl SqlValue {
    /// The host type tag of this value.
    pub fn host_type(&self) -> HostType {
        match self {
            Self::Text(_) => HostType::Text,
            Self::Bool(_) => HostType::Bool,
            Self::U8(_) => HostType::U8,
            Self::I16(_) => HostType::I16,
            Self::I32(_) => HostType::I32,
            Self::I64(_) => HostType::I64,
            Self::F32(_) => HostType::F32,
            Self::F64(_) => HostType::F64,
            Self::Decimal(_) => HostType::Decimal,
            Self::Bytes(_) => HostType::Bytes,
            Self::Guid(_) => HostType::Guid,
            Self::Time(_) => HostType::Time,
            Self::Date(_) => HostType::Date,
            Self::DateTime(_) => HostType::DateTime,
            Self::DateTimeOffset(_) => HostType::DateTimeOffset,
        }
    }

    /// The value's plain invariant text form, used for diagnostics and as
    /// the input to the bit and text core builders.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::U8(n) => n.to_string(),
            Self::I16(n) => n.to_string(),
            Self::I32(n) => n.to_string(),
            Self::I64(n) => n.to_string(),
            Self::F32(n) => n.to_string(),
            Self::F64(n) => n.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Bytes(b) => crate::literal::hex_literal(b),
            Self::Guid(u) => u.hyphenated().to_string(),
            Self::Time(d) => crate::literal::time_text(*d).unwrap_or_else(|| format!("{d:?}")),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
            Self::DateTimeOffset(dt) => crate::literal::datetimeoffset_text(dt),
        }
    }
}

/// A caller-trusted, pre-rendered piece of SQL text.
///
/// The literal layer passes fragments through verbatim and uninspected; the
/// caller vouches for their safety. Construction is deliberately explicit;
/// there is no blanket `From<String>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    /// Wrap already-safe SQL text.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// The wrapped SQL text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An argument presented to the literal layer.
///
/// Distinguishes "nothing supplied" from "explicit NULL" from a present
/// value, and admits raw fragments on the unchecked path.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    /// No argument supplied; renders as NULL.
    Absent,
    /// An explicit SQL NULL.
    Null,
    /// Caller-trusted raw SQL, passed through verbatim.
    Fragment(Fragment),
    /// A present scalar value.
    Value(SqlValue),
}

impl SqlArg {
    /// The host type this argument resolves to: the value's own tag, `Any`
    /// for NULLs and absent arguments, and `Fragment` for raw fragments.
    pub fn host_type(&self) -> HostType {
        match self {
            Self::Absent | Self::Null => HostType::Any,
            Self::Fragment(_) => HostType::Fragment,
            Self::Value(v) => v.host_type(),
        }
    }

    /// True for `Absent` and `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Absent | Self::Null)
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    SqlValue::$variant(v.into())
                }
            }

            impl From<$ty> for SqlArg {
                fn from(v: $ty) -> Self {
                    SqlArg::Value(SqlValue::$variant(v.into()))
                }
            }
        )*
    };
}

impl_value_from! {
    String => Text,
    &str => Text,
    bool => Bool,
    u8 => U8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    Uuid => Guid,
    TimeDelta => Time,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
}

impl From<SqlValue> for SqlArg {
    fn from(v: SqlValue) -> Self {
        SqlArg::Value(v)
    }
}

impl From<Fragment> for SqlArg {
    fn from(f: Fragment) -> Self {
        SqlArg::Fragment(f)
    }
}

// Option<T> is the Rust rendition of the nullable wrapper: None becomes an
// explicit NULL, Some unwraps to the carried value.
impl<T: Into<SqlValue>> From<Option<T>> for SqlArg {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => SqlArg::Value(v.into()),
            None => SqlArg::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_carries_its_host_type() {
        assert_eq!(SqlValue::from(42i32).host_type(), HostType::I32);
        assert_eq!(SqlValue::from("hi").host_type(), HostType::Text);
        assert_eq!(
            SqlValue::from(Uuid::nil()).host_type(),
            HostType::Guid
        );
    }

    #[test]
    fn option_none_becomes_explicit_null() {
        let arg: SqlArg = Option::<i64>::None.into();
        assert_eq!(arg, SqlArg::Null);
        assert!(arg.is_null());
        assert_eq!(arg.host_type(), HostType::Any);
    }

    #[test]
    fn option_some_unwraps() {
        let arg: SqlArg = Some(7i16).into();
        assert_eq!(arg, SqlArg::Value(SqlValue::I16(7)));
    }

    #[test]
    fn fragment_passes_text_through() {
        let f = Fragment::raw("GETDATE()");
        assert_eq!(f.as_str(), "GETDATE()");
        assert_eq!(SqlArg::from(f).host_type(), HostType::Fragment);
    }
}
