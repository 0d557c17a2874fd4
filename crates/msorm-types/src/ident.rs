//! Safe T-SQL identifier handling.
//!
//! This module provides [`Ident`] which represents a SQL identifier
//! (schema/table/column), supporting dotted notation and bracket-quoted
//! identifiers.
//!
//! - Unquoted parts are validated against T-SQL regular-identifier rules:
//!   `[A-Za-z_@#][A-Za-z0-9_$@#]*`
//! - Quoted parts use `[brackets]`, allow any characters except NUL, and
//!   escape `]` as `]]`
//!
//! # Example
//! ```ignore
//! use msorm_types::Ident;
//!
//! let t = Ident::parse("dbo.users")?;
//! let c = Ident::parse("[Order Details].[Unit Price]")?;
//! # Ok::<(), msorm_types::TypeError>(())
//! ```

use crate::error::{TypeError, TypeResult};

fn invalid(detail: impl std::fmt::Display) -> TypeError {
    TypeError::conversion(detail, "identifier")
}

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Unquoted identifier: must match `[A-Za-z_@#][A-Za-z0-9_$@#]*`.
    Unquoted(String),
    /// Bracket-quoted identifier: allows any characters except NUL.
    Quoted(String),
}

/// A SQL identifier (column, table, or schema name).
///
/// Supports dotted notation (e.g., `dbo.users.id`) and bracket-quoted parts
/// (e.g., `[Order Details].[Unit Price]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Create a single bracket-quoted identifier.
    pub fn quoted(name: &str) -> TypeResult<Self> {
        if name.is_empty() {
            return Err(invalid("empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(invalid("identifier cannot contain NUL"));
        }
        Ok(Self {
            parts: vec![IdentPart::Quoted(name.to_string())],
        })
    }

    /// Parse an identifier string, supporting dotted and bracketed forms.
    ///
    /// - Dotted: `schema.table.column`
    /// - Bracketed: `[Order Details].[Unit Price]`
    /// - Mixed: `dbo.[Order Details].id`
    pub fn parse(s: &str) -> TypeResult<Self> {
        if s.is_empty() {
            return Err(invalid("identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(invalid("identifier cannot contain NUL"));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            // Consume '.' between parts (but require there is a next part).
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(invalid("trailing '.' in identifier"));
                        }
                    }
                    Some(c) => {
                        return Err(invalid(format!(
                            "expected '.' between identifier parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            // Bracket-quoted identifier part.
            if chars.peek() == Some(&'[') {
                chars.next(); // opening bracket
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(']') => {
                            // Escaped bracket: ]]
                            if chars.peek() == Some(&']') {
                                chars.next();
                                name.push(']');
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => return Err(invalid("unclosed bracketed identifier")),
                    }
                }
                if name.is_empty() {
                    return Err(invalid("empty bracketed identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            // Unquoted identifier part.
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                if name.is_empty() {
                    // First char: letter, underscore, @ or #.
                    if c == '_' || c == '@' || c == '#' || c.is_ascii_alphabetic() {
                        name.push(c);
                        chars.next();
                    } else {
                        return Err(invalid(format!("invalid identifier start character: '{c}'")));
                    }
                } else {
                    // Subsequent chars: letter, digit, underscore, $, @ or #.
                    if c == '_' || c == '$' || c == '@' || c == '#' || c.is_ascii_alphanumeric() {
                        name.push(c);
                        chars.next();
                    } else {
                        return Err(invalid(format!("invalid character in identifier: '{c}'")));
                    }
                }
            }
            if name.is_empty() {
                return Err(invalid("empty identifier segment"));
            }
            parts.push(IdentPart::Unquoted(name));
        }

        if parts.is_empty() {
            return Err(invalid("empty identifier"));
        }

        Ok(Self { parts })
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut cap = self.parts.len().saturating_sub(1); // dots
        for part in &self.parts {
            match part {
                IdentPart::Unquoted(s) => cap += s.len(),
                IdentPart::Quoted(s) => cap += s.len() + 2, // surrounding brackets (escapes may add more)
            }
        }
        let mut out = String::with_capacity(cap);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Unquoted(s) => out.push_str(s),
                IdentPart::Quoted(s) => {
                    out.push('[');
                    for ch in s.chars() {
                        if ch == ']' {
                            out.push(']');
                            out.push(']');
                        } else {
                            out.push(ch);
                        }
                    }
                    out.push(']');
                }
            }
        }
    }
}

// An identifier renders to safe SQL text, so it can stand in wherever a
// trusted fragment is expected.
impl From<Ident> for crate::value::Fragment {
    fn from(ident: Ident) -> Self {
        crate::value::Fragment::raw(ident.to_sql())
    }
}

/// Convert an input into an [`Ident`].
///
/// This is mainly for ergonomics in builder APIs.
pub trait IntoIdent {
    fn into_ident(self) -> TypeResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> TypeResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> TypeResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> TypeResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> TypeResult<Ident> {
        Ident::parse(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = Ident::parse("users").unwrap();
        assert_eq!(ident.to_sql(), "users");
    }

    #[test]
    fn ident_dotted() {
        let ident = Ident::parse("dbo.users").unwrap();
        assert_eq!(ident.to_sql(), "dbo.users");
    }

    #[test]
    fn ident_three_parts() {
        let ident = Ident::parse("db.schema.table").unwrap();
        assert_eq!(ident.to_sql(), "db.schema.table");
    }

    #[test]
    fn ident_bracketed() {
        let ident = Ident::parse("[Order Details]").unwrap();
        assert_eq!(ident.to_sql(), "[Order Details]");
    }

    #[test]
    fn ident_bracketed_with_escape() {
        let ident = Ident::parse("[has]]bracket]").unwrap();
        assert_eq!(ident.to_sql(), "[has]]bracket]");
    }

    #[test]
    fn ident_mixed_bracketed_unquoted() {
        let ident = Ident::parse("dbo.[Order Details].id").unwrap();
        assert_eq!(ident.to_sql(), "dbo.[Order Details].id");
    }

    #[test]
    fn ident_temp_table_prefix() {
        let ident = Ident::parse("#temp_rows").unwrap();
        assert_eq!(ident.to_sql(), "#temp_rows");
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(Ident::parse("").is_err());
    }

    #[test]
    fn ident_rejects_start_digit() {
        assert!(Ident::parse("1table").is_err());
    }

    #[test]
    fn ident_rejects_space() {
        assert!(Ident::parse("my table").is_err());
    }

    #[test]
    fn ident_rejects_double_dot() {
        assert!(Ident::parse("schema..table").is_err());
    }

    #[test]
    fn ident_rejects_trailing_dot() {
        assert!(Ident::parse("schema.").is_err());
    }

    #[test]
    fn ident_rejects_unclosed_bracket() {
        assert!(Ident::parse("[unclosed").is_err());
    }
}
