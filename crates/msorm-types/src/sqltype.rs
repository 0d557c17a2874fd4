//! T-SQL data type tags and declared-type descriptions.
//!
//! [`SqlType`] is the closed set of target types the engine can serialize
//! into. [`DeclaredType`] pairs a tag with an optional size and a nullability
//! flag; its constructors enforce that a length is only attached to
//! length-sized tags and a precision/scale pair only to precision-sized tags.

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// A tag identifying one T-SQL data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Char,
    VarChar,
    Text,
    NChar,
    NVarChar,
    NText,
    Bit,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Decimal,
    Money,
    SmallMoney,
    Float,
    Real,
    Binary,
    VarBinary,
    Image,
    UniqueIdentifier,
    Date,
    Time,
    SmallDateTime,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Variant,
}

impl SqlType {
    /// The T-SQL name of this type, as it appears in DDL and CAST targets.
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::VarChar => "varchar",
            Self::Text => "text",
            Self::NChar => "nchar",
            Self::NVarChar => "nvarchar",
            Self::NText => "ntext",
            Self::Bit => "bit",
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Decimal => "decimal",
            Self::Money => "money",
            Self::SmallMoney => "smallmoney",
            Self::Float => "float",
            Self::Real => "real",
            Self::Binary => "binary",
            Self::VarBinary => "varbinary",
            Self::Image => "image",
            Self::UniqueIdentifier => "uniqueidentifier",
            Self::Date => "date",
            Self::Time => "time",
            Self::SmallDateTime => "smalldatetime",
            Self::DateTime => "datetime",
            Self::DateTime2 => "datetime2",
            Self::DateTimeOffset => "datetimeoffset",
            Self::Variant => "sql_variant",
        }
    }

    /// True for the national-character types whose literals carry the `N`
    /// Unicode marker.
    pub fn is_unicode(self) -> bool {
        matches!(self, Self::NChar | Self::NVarChar | Self::NText)
    }

    /// True for the date/time family (everything rendered as a quoted
    /// temporal literal).
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Date
                | Self::Time
                | Self::SmallDateTime
                | Self::DateTime
                | Self::DateTime2
                | Self::DateTimeOffset
        )
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// What kind of size a SQL type takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeKind {
    /// Fixed layout; no size clause.
    None,
    /// Character or byte length, e.g. `varchar(40)`.
    Length,
    /// Precision and scale, e.g. `decimal(18,4)`.
    Precision,
}

/// How literals of a type are textually shaped, used by the diagnostic
/// test-value path to pick an escaping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeGroup {
    /// Unquoted numeric text.
    Number,
    /// Quoted, escaped text (includes the temporal family and guids).
    Text,
    /// `0x`-prefixed hex dumps.
    Hexadecimal,
    /// The variant/"any" type.
    Object,
}

/// The size attached to a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlSize {
    /// No size clause.
    None,
    /// An explicit length in characters (character types) or bytes (binary).
    Len(u32),
    /// The unbounded `(max)` length.
    Max,
    /// Precision and scale.
    Prec { precision: u8, scale: u8 },
}

impl SqlSize {
    /// The size clause as it appears after a type name, e.g. `(40)`,
    /// `(max)`, `(5,2)`. Empty for [`SqlSize::None`].
    pub fn sql_clause(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Len(n) => format!("({n})"),
            Self::Max => "(max)".to_string(),
            Self::Prec { precision, scale } => format!("({precision},{scale})"),
        }
    }
}

/// A declared SQL type: tag, optional size, nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredType {
    pub tag: SqlType,
    pub size: SqlSize,
    pub nullable: bool,
}

impl DeclaredType {
    /// A sizeless declaration of `tag`, nullable.
    pub fn new(tag: SqlType) -> Self {
        Self {
            tag,
            size: SqlSize::None,
            nullable: true,
        }
    }

    /// Declare `tag` with a character/byte length.
    ///
    /// Fails unless `tag` is a length-sized type.
    pub fn with_len(tag: SqlType, len: u32) -> TypeResult<Self> {
        Self::sized(tag, SqlSize::Len(len))
    }

    /// Declare `tag` with the unbounded `(max)` length.
    pub fn with_max(tag: SqlType) -> TypeResult<Self> {
        Self::sized(tag, SqlSize::Max)
    }

    /// Declare `tag` with precision and scale.
    ///
    /// Fails unless `tag` is a precision-sized type.
    pub fn with_precision(tag: SqlType, precision: u8, scale: u8) -> TypeResult<Self> {
        Self::sized(tag, SqlSize::Prec { precision, scale })
    }

    fn sized(tag: SqlType, size: SqlSize) -> TypeResult<Self> {
        let kind = crate::registry::TypeRegistry::global()
            .sql_descriptor(tag)
            .size_kind;
        let ok = match size {
            SqlSize::None => true,
            SqlSize::Len(_) | SqlSize::Max => kind == SizeKind::Length,
            SqlSize::Prec { .. } => kind == SizeKind::Precision,
        };
        if !ok {
            return Err(TypeError::conversion(
                format!("size clause {}", size.sql_clause()),
                tag.sql_name(),
            ));
        }
        Ok(Self {
            tag,
            size,
            nullable: true,
        })
    }

    /// Mark the declaration NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Render the type as it appears in a CAST target or column definition,
    /// e.g. `nvarchar(40)`, `varbinary(max)`, `decimal(5,2)`, `int`.
    pub fn to_sql(&self) -> String {
        format!("{}{}", self.tag.sql_name(), self.size.sql_clause())
    }
}

impl std::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sql())
    }
}
