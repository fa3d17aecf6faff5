// SPDX-License-Identifier: Apache-2.0

//! Positional-parameter substitution
//!
//! Dremio's REST API has no bound-parameter protocol, so arguments are
//! inlined into the SQL text before submission. This is string interpolation,
//! not true parameter binding: single quotes inside string values are NOT
//! escaped, so callers must treat untrusted input accordingly.

use crate::error::{DremioError, DremioResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?").expect("placeholder pattern"));

/// A query argument with an optional parameter name.
///
/// The driver only supports positional arguments; any non-empty name fails
/// with [`DremioError::NamedParametersNotSupported`].
#[derive(Debug, Clone)]
pub struct QueryArg {
    pub name: Option<String>,
    pub value: Value,
}

impl QueryArg {
    /// A positional argument
    pub fn positional(value: impl Into<Value>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    /// A named argument; always rejected at execution time, provided so the
    /// contract can be exercised
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }
}

/// Strip names off a named argument list, rejecting any non-empty name.
pub(crate) fn named_to_positional(args: &[QueryArg]) -> DremioResult<Vec<Value>> {
    args.iter()
        .map(|arg| match arg.name.as_deref() {
            Some(name) if !name.is_empty() => Err(DremioError::NamedParametersNotSupported),
            _ => Ok(arg.value.clone()),
        })
        .collect()
}

/// Replace the k-th `?` placeholder with the k-th argument, in document
/// order.
///
/// String values are inlined as `' value '` padded with one space on each
/// side; every other value is inlined space-padded without quotes, using its
/// JSON rendering. Text around the placeholder (commas, newlines) is left
/// untouched, which keeps IN-lists intact. A placeholder with no argument,
/// or a null argument, stays a literal `?`; surplus arguments are ignored.
pub(crate) fn substitute_params(sql: &str, args: &[Value]) -> String {
    let mut index = 0usize;
    PLACEHOLDER
        .replace_all(sql, |_: &regex::Captures<'_>| {
            let arg = args.get(index);
            index += 1;
            match arg {
                None | Some(Value::Null) => "?".to_string(),
                Some(Value::String(s)) => format!(" '{s}' "),
                Some(other) => format!(" {other} "),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(args: &[&str]) -> Vec<Value> {
        args.iter().map(|s| json!(s)).collect()
    }

    #[test]
    fn test_single_string_placeholder() {
        let out = substitute_params(
            r#"SELECT * FROM "foo" WHERE id = ?"#,
            &strings(&["1548460799000"]),
        );
        assert_eq!(out, r#"SELECT * FROM "foo" WHERE id =  '1548460799000' "#);
    }

    #[test]
    fn test_multiple_placeholders() {
        let out = substitute_params(
            r#"SELECT * FROM "foo" WHERE id = ? AND foo=?"#,
            &strings(&["a", "b"]),
        );
        assert_eq!(out, r#"SELECT * FROM "foo" WHERE id =  'a'  AND foo= 'b' "#);
    }

    #[test]
    fn test_in_list_preserves_commas() {
        let sql = r#"SELECT
	dir1,
	"value",
	"metadata",
	"ref_id"
FROM
	 devdata.pinpoint."signal"
WHERE
	 dir2 = ?
	 AND dir1 like 'CycleTime%'
	 AND ref_type = 'team'
	 AND time_unit = 180
	 AND dir0 = ?
	  and ref_id IN (?,?,?,?)"#;
        let args = strings(&[
            "1548460799000",
            "5500a5ba8135f296",
            "9000beafc6358579",
            "5b7adda6516daee7",
            "4fa4a5e4578444b5",
            "5b7adda6516daee7",
        ]);
        let expected = r#"SELECT
	dir1,
	"value",
	"metadata",
	"ref_id"
FROM
	 devdata.pinpoint."signal"
WHERE
	 dir2 =  '1548460799000' 
	 AND dir1 like 'CycleTime%'
	 AND ref_type = 'team'
	 AND time_unit = 180
	 AND dir0 =  '5500a5ba8135f296' 
	  and ref_id IN ( '9000beafc6358579' , '5b7adda6516daee7' , '4fa4a5e4578444b5' , '5b7adda6516daee7' )"#;
        assert_eq!(substitute_params(sql, &args), expected);
    }

    #[test]
    fn test_placeholder_without_arg_is_unchanged() {
        let sql = r#"SELECT * FROM "foo" WHERE id = ?"#;
        assert_eq!(substitute_params(sql, &[]), sql);
    }

    #[test]
    fn test_null_arg_leaves_placeholder() {
        let sql = "SELECT * FROM t WHERE a = ? AND b = ?";
        let out = substitute_params(sql, &[Value::Null, json!("x")]);
        assert_eq!(out, "SELECT * FROM t WHERE a = ? AND b =  'x' ");
    }

    #[test]
    fn test_non_string_args_unquoted() {
        let out = substitute_params(
            "SELECT * FROM t WHERE n = ? AND flag = ?",
            &[json!(42), json!(true)],
        );
        assert_eq!(out, "SELECT * FROM t WHERE n =  42  AND flag =  true ");
    }

    #[test]
    fn test_surplus_args_ignored() {
        let out = substitute_params("SELECT ?", &strings(&["a", "b", "c"]));
        assert_eq!(out, "SELECT  'a' ");
    }

    #[test]
    fn test_named_to_positional_rejects_names() {
        let args = [QueryArg::named("id", "1")];
        assert!(matches!(
            named_to_positional(&args),
            Err(DremioError::NamedParametersNotSupported)
        ));
    }

    #[test]
    fn test_named_to_positional_accepts_positional() {
        let args = [QueryArg::positional("a"), QueryArg::positional(7)];
        let values = named_to_positional(&args).unwrap();
        assert_eq!(values, vec![json!("a"), json!(7)]);
    }
}
