//! Compliance checks: is a host type registered, and is it acceptable for a
//! declared SQL type, an inline substitution category, or a DSL parameter?
//!
//! Every check returns a structured [`TypeError`](crate::TypeError); throwing
//! is left to the caller's boundary.

use crate::error::{TypeError, TypeResult};
use crate::registry::{InlineKind, TypeRegistry};
use crate::sqltype::{DeclaredType, SqlType};
use crate::value::HostType;

/// Resolve a host type against the scalar registry.
///
/// The generic placeholder resolves to itself (untyped NULLs are always
/// compliant). Recognized non-scalar constructs come back as
/// [`TypeError::StructuralMismatch`] since their remediation differs from a
/// genuinely unmapped type; everything else unregistered is
/// [`TypeError::Unsupported`], carrying the full supported-type list as
/// guidance.
pub fn resolve_host(host: HostType) -> TypeResult<HostType> {
    let registry = TypeRegistry::global();
    if registry.host_descriptor(host).is_some() {
        return Ok(host);
    }
    match host {
        HostType::Record | HostType::RowSet => Err(TypeError::StructuralMismatch { host }),
        _ => Err(TypeError::Unsupported {
            host,
            supported: registry.supported_list(),
        }),
    }
}

/// Check that a value of `host` may be rendered under an explicitly declared
/// SQL type.
///
/// The variant type accepts every compliant host type. Otherwise `host` must
/// be the declared tag's canonical host type or a member of its widening set
/// (a 16-bit integer may satisfy a bigint column, for example).
pub fn check_declared(host: HostType, declared: &DeclaredType) -> TypeResult<()> {
    let resolved = resolve_host(host)?;
    if declared.tag == SqlType::Variant || resolved == HostType::Any {
        return Ok(());
    }
    let desc = TypeRegistry::global().sql_descriptor(declared.tag);
    if desc.canonical == resolved || desc.widened.contains(&resolved) {
        return Ok(());
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(host = %resolved, declared = %declared, "declared type mismatch");
    Err(TypeError::DeclaredTypeMismatch {
        host: resolved,
        declared: declared.to_sql(),
    })
}

/// Check that `host` is allowed at an inline (non-parameterized)
/// substitution point of the given category.
pub fn check_inline(host: HostType, category: InlineKind) -> TypeResult<()> {
    let allowed = TypeRegistry::global().inline_types(category);
    if allowed.contains(&host) {
        return Ok(());
    }
    Err(TypeError::InlineCategoryMismatch {
        host,
        category: category.name(),
    })
}

/// Check that `host` is a table-like type acceptable as a tabular parameter.
pub fn check_tabular(host: HostType) -> TypeResult<()> {
    let allowed = TypeRegistry::global().tabular_types();
    if allowed.contains(&host) {
        return Ok(());
    }
    Err(TypeError::InlineCategoryMismatch {
        host,
        category: "tabular",
    })
}

/// How a DSL parameter declares its expected argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    /// Identifier-like parameter; arguments bypass type checking.
    Ident,
    /// Inline substitution of a given category.
    Inline(InlineKind),
    /// A value parameter with a declared SQL type.
    Declared(DeclaredType),
    /// A table-valued parameter.
    Tabular,
}

/// A DSL parameter descriptor, as seen by argument checking.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name, used in diagnostics by the statement layer.
    pub name: String,
    /// What the parameter accepts.
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Check one argument against its parameter descriptor.
///
/// `None` for the argument type means no value was supplied; that passes
/// here and is resolved by NULL handling at build time.
pub fn check_argument(spec: &ParamSpec, arg: Option<HostType>) -> TypeResult<()> {
    let Some(host) = arg else {
        return Ok(());
    };
    match &spec.kind {
        ParamKind::Ident => Ok(()),
        ParamKind::Inline(category) => check_inline(host, *category),
        ParamKind::Declared(declared) => check_declared(host, declared),
        ParamKind::Tabular => check_tabular(host),
    }
}
