//! The type registry: immutable tables mapping T-SQL type tags and host type
//! tags to their descriptors, plus the allow lists for inline and tabular
//! substitution categories.
//!
//! The supported type set is closed. Extending it means adding a descriptor
//! row here (and covering the new tag in the exhaustive matches of
//! `literal`, `size` and `json`), not calling a registration API at runtime.
//! All tables are `'static`; the registry is safe for unsynchronized
//! concurrent reads.

use std::sync::OnceLock;

use crate::sqltype::{DeclaredType, SizeKind, SqlSize, SqlType, TypeGroup};
use crate::value::HostType;

/// Descriptor for one T-SQL data type.
#[derive(Debug)]
pub struct SqlTypeDescriptor {
    /// The tag this row describes.
    pub tag: SqlType,
    /// The host type this SQL type canonically maps to.
    pub canonical: HostType,
    /// Additional host types accepted as narrower inputs (widening).
    pub widened: &'static [HostType],
    /// What kind of size clause the type takes.
    pub size_kind: SizeKind,
    /// Maximum size in bytes (length kinds) or maximum precision
    /// (precision kinds); `None` when unbounded or fixed.
    pub max_size: Option<u32>,
    /// Maximum size in characters, where it differs from bytes.
    pub max_chars: Option<u32>,
    /// Literal shape classification.
    pub group: TypeGroup,
}

/// Descriptor for one host type.
#[derive(Debug)]
pub struct HostTypeDescriptor {
    /// The host tag this row describes.
    pub host: HostType,
    /// Every SQL type a value of this host type may be declared as.
    pub compatible: &'static [SqlType],
    /// The SQL type used when no declared type is given.
    pub default_declared: SqlType,
    /// Name of the driver row accessor that reads this type back.
    /// Informational only at this layer.
    pub accessor: &'static str,
}

/// A non-parameterized DSL substitution point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    /// A raw identifier position (table, column, schema name).
    Ident,
    /// An embedded SQL fragment position.
    Fragment,
    /// An expression-object position.
    Expr,
    /// A stored-procedure reference position.
    Proc,
}

impl InlineKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Ident => "identifier",
            Self::Fragment => "fragment",
            Self::Expr => "expression",
            Self::Proc => "procedure",
        }
    }
}

use HostType as H;
use SqlType as S;

// Declaration order must match the SqlType variant order; `sql_descriptor`
// indexes by discriminant and a test pins the correspondence.
static SQL_DESCRIPTORS: [SqlTypeDescriptor; 27] = [
    SqlTypeDescriptor {
        tag: S::Char,
        canonical: H::Text,
        widened: &[],
        size_kind: SizeKind::Length,
        max_size: Some(8000),
        max_chars: Some(8000),
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::VarChar,
        canonical: H::Text,
        widened: &[],
        size_kind: SizeKind::Length,
        max_size: Some(8000),
        max_chars: Some(8000),
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::Text,
        canonical: H::Text,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: None,
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::NChar,
        canonical: H::Text,
        widened: &[],
        size_kind: SizeKind::Length,
        max_size: Some(8000),
        max_chars: Some(4000),
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::NVarChar,
        canonical: H::Text,
        widened: &[],
        size_kind: SizeKind::Length,
        max_size: Some(8000),
        max_chars: Some(4000),
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::NText,
        canonical: H::Text,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: None,
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::Bit,
        canonical: H::Bool,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: Some(1),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::TinyInt,
        canonical: H::U8,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: Some(1),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::SmallInt,
        canonical: H::I16,
        widened: &[H::U8],
        size_kind: SizeKind::None,
        max_size: Some(2),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::Int,
        canonical: H::I32,
        widened: &[H::U8, H::I16],
        size_kind: SizeKind::None,
        max_size: Some(4),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::BigInt,
        canonical: H::I64,
        widened: &[H::U8, H::I16, H::I32],
        size_kind: SizeKind::None,
        max_size: Some(8),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::Decimal,
        canonical: H::Decimal,
        widened: &[H::U8, H::I16, H::I32, H::I64, H::F32, H::F64],
        size_kind: SizeKind::Precision,
        max_size: Some(38),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::Money,
        canonical: H::Decimal,
        widened: &[H::U8, H::I16, H::I32, H::I64],
        size_kind: SizeKind::None,
        max_size: Some(19),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::SmallMoney,
        canonical: H::Decimal,
        widened: &[H::U8, H::I16, H::I32],
        size_kind: SizeKind::None,
        max_size: Some(10),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::Float,
        canonical: H::F64,
        widened: &[H::F32, H::U8, H::I16, H::I32, H::I64, H::Decimal],
        size_kind: SizeKind::None,
        max_size: Some(8),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::Real,
        canonical: H::F32,
        widened: &[H::U8, H::I16],
        size_kind: SizeKind::None,
        max_size: Some(4),
        max_chars: None,
        group: TypeGroup::Number,
    },
    SqlTypeDescriptor {
        tag: S::Binary,
        canonical: H::Bytes,
        widened: &[],
        size_kind: SizeKind::Length,
        max_size: Some(8000),
        max_chars: None,
        group: TypeGroup::Hexadecimal,
    },
    SqlTypeDescriptor {
        tag: S::VarBinary,
        canonical: H::Bytes,
        widened: &[],
        size_kind: SizeKind::Length,
        max_size: Some(8000),
        max_chars: None,
        group: TypeGroup::Hexadecimal,
    },
    SqlTypeDescriptor {
        tag: S::Image,
        canonical: H::Bytes,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: None,
        max_chars: None,
        group: TypeGroup::Hexadecimal,
    },
    SqlTypeDescriptor {
        tag: S::UniqueIdentifier,
        canonical: H::Guid,
        widened: &[H::Text],
        size_kind: SizeKind::None,
        max_size: Some(16),
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::Date,
        canonical: H::Date,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: Some(3),
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::Time,
        canonical: H::Time,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: Some(5),
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::SmallDateTime,
        canonical: H::DateTime,
        widened: &[H::Date],
        size_kind: SizeKind::None,
        max_size: Some(4),
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::DateTime,
        canonical: H::DateTime,
        widened: &[H::Date],
        size_kind: SizeKind::None,
        max_size: Some(8),
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::DateTime2,
        canonical: H::DateTime,
        widened: &[H::Date],
        size_kind: SizeKind::None,
        max_size: Some(8),
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::DateTimeOffset,
        canonical: H::DateTimeOffset,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: Some(10),
        max_chars: None,
        group: TypeGroup::Text,
    },
    SqlTypeDescriptor {
        tag: S::Variant,
        canonical: H::Any,
        widened: &[],
        size_kind: SizeKind::None,
        max_size: None,
        max_chars: None,
        group: TypeGroup::Object,
    },
];

static HOST_DESCRIPTORS: [HostTypeDescriptor; 16] = [
    HostTypeDescriptor {
        host: H::Text,
        compatible: &[
            S::Char,
            S::VarChar,
            S::Text,
            S::NChar,
            S::NVarChar,
            S::NText,
            S::UniqueIdentifier,
            S::Variant,
        ],
        default_declared: S::NVarChar,
        accessor: "get_string",
    },
    HostTypeDescriptor {
        host: H::Bool,
        compatible: &[S::Bit, S::Variant],
        default_declared: S::Bit,
        accessor: "get_bool",
    },
    HostTypeDescriptor {
        host: H::U8,
        compatible: &[
            S::TinyInt,
            S::SmallInt,
            S::Int,
            S::BigInt,
            S::Decimal,
            S::Money,
            S::SmallMoney,
            S::Float,
            S::Real,
            S::Variant,
        ],
        default_declared: S::TinyInt,
        accessor: "get_u8",
    },
    HostTypeDescriptor {
        host: H::I16,
        compatible: &[
            S::SmallInt,
            S::Int,
            S::BigInt,
            S::Decimal,
            S::Money,
            S::SmallMoney,
            S::Float,
            S::Real,
            S::Variant,
        ],
        default_declared: S::SmallInt,
        accessor: "get_i16",
    },
    HostTypeDescriptor {
        host: H::I32,
        compatible: &[
            S::Int,
            S::BigInt,
            S::Decimal,
            S::Money,
            S::SmallMoney,
            S::Float,
            S::Variant,
        ],
        default_declared: S::Int,
        accessor: "get_i32",
    },
    HostTypeDescriptor {
        host: H::I64,
        compatible: &[S::BigInt, S::Decimal, S::Money, S::Float, S::Variant],
        default_declared: S::BigInt,
        accessor: "get_i64",
    },
    HostTypeDescriptor {
        host: H::F32,
        compatible: &[S::Real, S::Float, S::Decimal, S::Variant],
        default_declared: S::Real,
        accessor: "get_f32",
    },
    HostTypeDescriptor {
        host: H::F64,
        compatible: &[S::Float, S::Decimal, S::Variant],
        default_declared: S::Float,
        accessor: "get_f64",
    },
    HostTypeDescriptor {
        host: H::Decimal,
        compatible: &[S::Decimal, S::Float, S::Variant],
        default_declared: S::Decimal,
        accessor: "get_decimal",
    },
    HostTypeDescriptor {
        host: H::Bytes,
        compatible: &[S::Binary, S::VarBinary, S::Image, S::Variant],
        default_declared: S::VarBinary,
        accessor: "get_bytes",
    },
    HostTypeDescriptor {
        host: H::Guid,
        compatible: &[S::UniqueIdentifier, S::Variant],
        default_declared: S::UniqueIdentifier,
        accessor: "get_uuid",
    },
    HostTypeDescriptor {
        host: H::Time,
        compatible: &[S::Time, S::Variant],
        default_declared: S::Time,
        accessor: "get_time",
    },
    HostTypeDescriptor {
        host: H::Date,
        compatible: &[
            S::Date,
            S::SmallDateTime,
            S::DateTime,
            S::DateTime2,
            S::Variant,
        ],
        default_declared: S::Date,
        accessor: "get_date",
    },
    HostTypeDescriptor {
        host: H::DateTime,
        compatible: &[S::DateTime2, S::DateTime, S::SmallDateTime, S::Variant],
        default_declared: S::DateTime2,
        accessor: "get_datetime",
    },
    HostTypeDescriptor {
        host: H::DateTimeOffset,
        compatible: &[S::DateTimeOffset, S::Variant],
        default_declared: S::DateTimeOffset,
        accessor: "get_datetimeoffset",
    },
    HostTypeDescriptor {
        host: H::Any,
        compatible: &[S::Variant],
        default_declared: S::Variant,
        accessor: "get_value",
    },
];

static INLINE_IDENT: [HostType; 2] = [H::Ident, H::Text];
static INLINE_FRAGMENT: [HostType; 2] = [H::Fragment, H::Text];
static INLINE_EXPR: [HostType; 2] = [H::Expr, H::Fragment];
static INLINE_PROC: [HostType; 3] = [H::Proc, H::Ident, H::Text];
static TABULAR: [HostType; 2] = [H::RowSet, H::Record];

/// The immutable type registry.
///
/// Obtain it with [`TypeRegistry::global`]; all lookups borrow `'static`
/// descriptor rows.
#[derive(Debug)]
pub struct TypeRegistry {
    supported: OnceLock<String>,
}

static REGISTRY: TypeRegistry = TypeRegistry {
    supported: OnceLock::new(),
};

impl TypeRegistry {
    /// The process-wide registry.
    pub fn global() -> &'static TypeRegistry {
        &REGISTRY
    }

    /// Descriptor for a SQL type tag. Total over the closed tag set.
    pub fn sql_descriptor(&self, tag: SqlType) -> &'static SqlTypeDescriptor {
        &SQL_DESCRIPTORS[tag as usize]
    }

    /// Descriptor for a host type tag, or `None` for tags with no scalar
    /// SQL mapping (DSL constructs, records, row sets).
    pub fn host_descriptor(&self, host: HostType) -> Option<&'static HostTypeDescriptor> {
        HOST_DESCRIPTORS.iter().find(|d| d.host == host)
    }

    /// The default declared type for a host type, with the default size for
    /// unbounded character/binary defaults.
    pub fn default_declared(&self, host: HostType) -> Option<DeclaredType> {
        let tag = self.host_descriptor(host)?.default_declared;
        let size = match self.sql_descriptor(tag).size_kind {
            SizeKind::Length => SqlSize::Max,
            _ => SqlSize::None,
        };
        Some(DeclaredType {
            tag,
            size,
            nullable: true,
        })
    }

    /// Host types allowed at an inline substitution point.
    pub fn inline_types(&self, kind: InlineKind) -> &'static [HostType] {
        match kind {
            InlineKind::Ident => &INLINE_IDENT,
            InlineKind::Fragment => &INLINE_FRAGMENT,
            InlineKind::Expr => &INLINE_EXPR,
            InlineKind::Proc => &INLINE_PROC,
        }
    }

    /// Host types allowed as tabular (table-valued) parameters.
    pub fn tabular_types(&self) -> &'static [HostType] {
        &TABULAR
    }

    /// Every host type with a scalar SQL mapping, in registry order.
    pub fn supported_hosts(&self) -> impl Iterator<Item = HostType> + 'static {
        HOST_DESCRIPTORS.iter().map(|d| d.host)
    }

    /// A comma-separated list of all supported host types, built once and
    /// attached to unsupported-type errors as guidance.
    pub fn supported_list(&self) -> &'static str {
        REGISTRY
            .supported
            .get_or_init(|| {
                HOST_DESCRIPTORS
                    .iter()
                    .map(|d| d.host.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_table_order_matches_discriminants() {
        for (i, desc) in SQL_DESCRIPTORS.iter().enumerate() {
            assert_eq!(desc.tag as usize, i, "row {i} out of order: {}", desc.tag);
        }
    }

    #[test]
    fn every_canonical_host_is_registered() {
        let reg = TypeRegistry::global();
        for desc in &SQL_DESCRIPTORS {
            assert!(
                reg.host_descriptor(desc.canonical).is_some(),
                "canonical host {} of {} not in host registry",
                desc.canonical,
                desc.tag
            );
        }
    }

    #[test]
    fn every_default_declared_exists_and_accepts_its_host() {
        let reg = TypeRegistry::global();
        for host in &HOST_DESCRIPTORS {
            let sql = reg.sql_descriptor(host.default_declared);
            assert!(
                sql.canonical == host.host
                    || sql.widened.contains(&host.host)
                    || host.default_declared == SqlType::Variant,
                "{} is not accepted by its own default {}",
                host.host,
                host.default_declared
            );
        }
    }

    #[test]
    fn compatible_tags_accept_the_host() {
        let reg = TypeRegistry::global();
        for host in &HOST_DESCRIPTORS {
            for &tag in host.compatible {
                let sql = reg.sql_descriptor(tag);
                assert!(
                    tag == SqlType::Variant
                        || sql.canonical == host.host
                        || sql.widened.contains(&host.host),
                    "{} lists {} as compatible but {} does not widen to it",
                    host.host,
                    tag,
                    tag
                );
            }
        }
    }

    #[test]
    fn supported_list_names_every_scalar_host() {
        let list = TypeRegistry::global().supported_list();
        for host in &HOST_DESCRIPTORS {
            assert!(list.contains(&host.host.to_string()), "missing {}", host.host);
        }
    }

    #[test]
    fn inline_categories_are_nonempty() {
        let reg = TypeRegistry::global();
        for kind in [
            InlineKind::Ident,
            InlineKind::Fragment,
            InlineKind::Expr,
            InlineKind::Proc,
        ] {
            assert!(!reg.inline_types(kind).is_empty());
        }
        assert!(!reg.tabular_types().is_empty());
    }
}
