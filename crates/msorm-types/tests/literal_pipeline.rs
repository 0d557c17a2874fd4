//! End-to-end tests for the public type-mapping surface.
//!
//! These walk a value through the same pipeline the statement builders use:
//! compliance check, declared-type resolution, literal build, size check,
//! and the diagnostic JSON fragment.

use chrono::{NaiveDate, TimeDelta};
use msorm_types::{
    build, build_cast, build_unchecked, check_argument, check_declared, check_size,
    infer_declared_type, json_fragment, resolve_host, size_violation, DeclaredType, Fragment,
    HostType, Ident, InlineKind, ParamKind, ParamSpec, SqlArg, SqlSize, SqlType, SqlValue,
    TypeRegistry,
};

#[test]
fn insert_column_pipeline() {
    // A builder resolving the literal for `name nvarchar(20) NOT NULL`.
    let declared = DeclaredType::with_len(SqlType::NVarChar, 20)
        .unwrap()
        .not_null();
    let arg = SqlArg::from("O'Brien");

    check_declared(arg.host_type(), &declared).unwrap();
    assert!(check_size(&arg, declared.size));
    assert_eq!(build(&arg, &declared).unwrap(), "N'O''Brien'");
    assert_eq!(json_fragment(&arg), r#""O'Brien""#);
}

#[test]
fn default_declared_types_drive_the_unchecked_path() {
    let registry = TypeRegistry::global();
    for host in registry.supported_hosts() {
        let declared = registry.default_declared(host).unwrap();
        assert!(
            check_declared(host, &declared).is_ok(),
            "{host} vs {declared}"
        );
    }

    assert_eq!(build_unchecked(&SqlArg::from(7i64)).unwrap(), "7");
    assert_eq!(
        build_unchecked(&SqlArg::from(Option::<i64>::None)).unwrap(),
        "NULL"
    );
}

#[test]
fn declared_mismatch_reports_both_sides() {
    let bit = DeclaredType::new(SqlType::Bit);
    let err = check_declared(HostType::Text, &bit).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Text"), "{msg}");
    assert!(msg.contains("bit"), "{msg}");
}

#[test]
fn oversized_values_accumulate_violations() {
    let declared = DeclaredType::with_precision(SqlType::Decimal, 4, 2).unwrap();
    let too_wide = SqlArg::from("123.45".parse::<rust_decimal::Decimal>().unwrap());
    let fits = SqlArg::from("12.34".parse::<rust_decimal::Decimal>().unwrap());

    let mut violations = Vec::new();
    for arg in [&too_wide, &fits] {
        if let Some(v) = size_violation(arg, &declared) {
            violations.push(v);
        }
    }
    assert_eq!(violations.len(), 1);
    assert!(violations[0].contains("decimal(5,2)"));
}

#[test]
fn declare_by_example() {
    // Inference gives a minimal-fitting declared type usable for diagnostics.
    assert_eq!(infer_declared_type(&SqlValue::from("hello")), "varchar(5)");
    assert_eq!(
        infer_declared_type(&SqlValue::from(TimeDelta::seconds(60))),
        "time"
    );
}

#[test]
fn procedure_argument_checking() {
    // exec [dbo].[find_users] @table, @min_age, @created_after
    let table = ParamSpec::new("table", ParamKind::Inline(InlineKind::Ident));
    let min_age = ParamSpec::new(
        "min_age",
        ParamKind::Declared(DeclaredType::new(SqlType::Int)),
    );
    let created_after = ParamSpec::new(
        "created_after",
        ParamKind::Declared(DeclaredType::new(SqlType::Date)),
    );

    check_argument(&table, Some(HostType::Ident)).unwrap();
    check_argument(&min_age, Some(HostType::I16)).unwrap();
    check_argument(&created_after, Some(HostType::Date)).unwrap();
    assert!(check_argument(&min_age, Some(HostType::Guid)).is_err());

    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert_eq!(
        build_cast(&SqlArg::from(date), &DeclaredType::new(SqlType::Date)).unwrap(),
        "CAST('2024-01-01' AS date)"
    );
}

#[test]
fn identifiers_become_trusted_fragments() {
    let ident = Ident::parse("dbo.[Order Details]").unwrap();
    let frag = Fragment::from(ident);
    assert_eq!(
        build_unchecked(&SqlArg::from(frag)).unwrap(),
        "dbo.[Order Details]"
    );
}

#[test]
fn unsupported_hosts_are_parameter_only() {
    // The builder treats these as "bind as a parameter, cannot be inlined".
    let err = resolve_host(HostType::Expr).unwrap_err();
    assert!(err.is_unsupported());
    let err = resolve_host(HostType::RowSet).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn size_checks_pass_for_null_whatever_the_constraint() {
    for size in [
        SqlSize::None,
        SqlSize::Len(1),
        SqlSize::Max,
        SqlSize::Prec {
            precision: 1,
            scale: 0,
        },
    ] {
        assert!(check_size(&SqlArg::Null, size));
    }
}
