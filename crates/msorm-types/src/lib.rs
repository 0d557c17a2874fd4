//! # msorm-types
//!
//! Type mapping and SQL literal serialization for the msorm T-SQL query
//! builders.
//!
//! Every literal, cast, and parameter declaration the statement builders
//! produce passes through this crate: it maps host values onto the closed
//! set of T-SQL data types, validates compliance and sizes, and renders
//! dialect-correct literal text (or rejects the value with a structured
//! error).
//!
//! ## The two literal paths
//!
//! ```ignore
//! use msorm_types::{literal, DeclaredType, SqlArg, SqlType};
//!
//! // Checked: the declared type is known.
//! let declared = DeclaredType::with_len(SqlType::NVarChar, 40)?;
//! let lit = literal::build(&SqlArg::from("O'Brien"), &declared)?;
//! assert_eq!(lit, "N'O''Brien'");
//!
//! // Unchecked: the type is inferred from the value.
//! let lit = literal::build_unchecked(&SqlArg::from(42i64))?;
//! assert_eq!(lit, "42");
//! # Ok::<(), msorm_types::TypeError>(())
//! ```
//!
//! ## Registry
//!
//! The supported type set is closed and lives in [`TypeRegistry`]: one
//! descriptor per T-SQL type, one per host type, built once and immutable
//! for the process lifetime. Compliance checks ([`compliance`]) answer
//! whether a host value may appear under a declared type, at an inline
//! substitution point, or as a DSL argument; [`size`] validates natural
//! length and precision/scale against declared constraints; [`json`]
//! renders the diagnostic JSON fragments used by tooling.
//!
//! All of this is pure, synchronous computation over immutable tables; any
//! number of threads may use it concurrently.

pub mod compliance;
pub mod error;
pub mod ident;
pub mod json;
pub mod literal;
pub mod registry;
pub mod size;
pub mod sqltype;
pub mod value;

pub use compliance::{
    check_argument, check_declared, check_inline, check_tabular, resolve_host, ParamKind,
    ParamSpec,
};
pub use error::{MatchKind, TypeError, TypeResult};
pub use ident::{Ident, IdentPart, IntoIdent};
pub use json::json_fragment;
pub use literal::{build, build_cast, build_test_value, build_unchecked, cast, NULL};
pub use registry::{HostTypeDescriptor, InlineKind, SqlTypeDescriptor, TypeRegistry};
pub use size::{check_size, infer_declared_type, size_violation};
pub use sqltype::{DeclaredType, SizeKind, SqlSize, SqlType, TypeGroup};
pub use value::{Fragment, HostType, SqlArg, SqlValue};
