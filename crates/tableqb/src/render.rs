//! Inline rendering of `?`/`??` templates.
//!
//! Drivers escape parameters themselves; this module is the reference rendering of the same
//! rules and is what [`Statement::render`](crate::Statement::render) uses for debugging output.
//!
//! - `??` takes an identifier, quoted with backticks (`` ` `` doubled, dotted names quoted per
//!   part). A string value or a list of strings is accepted too.
//! - `?` takes a value: `NULL`, `true`/`false`, numbers verbatim, strings single-quoted with
//!   backslash escapes. Lists render comma-separated (nested lists in parentheses), objects render
//!   as `` `col` = val `` pairs.

use crate::connection::Param;
use crate::error::{QbError, QbResult};
use serde_json::Value;

/// Render a template with its positional parameters inlined.
///
/// Fails if the template has more placeholders than parameters, or if a parameter does not fit
/// its slot. Surplus parameters are ignored.
pub fn render(sql: &str, params: &[Param]) -> QbResult<String> {
    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut params = params.iter();
    let mut chars = sql.chars().peekable();
    let mut slot = 0usize;

    while let Some(c) = chars.next() {
        if c != '?' {
            out.push(c);
            continue;
        }
        let ident_slot = chars.peek() == Some(&'?');
        if ident_slot {
            chars.next();
        }
        slot += 1;
        let param = params.next().ok_or_else(|| {
            QbError::render(format!("placeholder #{slot} has no matching parameter"))
        })?;
        if ident_slot {
            write_ident_param(&mut out, param, slot)?;
        } else {
            write_value_param(&mut out, param, slot)?;
        }
    }

    Ok(out)
}

fn write_ident_param(out: &mut String, param: &Param, slot: usize) -> QbResult<()> {
    match param {
        Param::Ident(name) | Param::Value(Value::String(name)) => {
            write_ident(out, name);
            Ok(())
        }
        Param::Value(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match item {
                    Value::String(name) => write_ident(out, name),
                    other => {
                        return Err(QbError::render(format!(
                            "identifier placeholder #{slot} got non-string list item {other}"
                        )));
                    }
                }
            }
            Ok(())
        }
        Param::Value(other) => Err(QbError::render(format!(
            "identifier placeholder #{slot} got value {other}"
        ))),
    }
}

fn write_value_param(out: &mut String, param: &Param, slot: usize) -> QbResult<()> {
    match param {
        Param::Value(Value::Array(items)) => {
            write_list(out, items);
            Ok(())
        }
        Param::Value(Value::Object(map)) => {
            for (i, (column, value)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_ident(out, column);
                out.push_str(" = ");
                write_scalar(out, value);
            }
            Ok(())
        }
        Param::Value(value) => {
            write_scalar(out, value);
            Ok(())
        }
        Param::Ident(name) => Err(QbError::render(format!(
            "value placeholder #{slot} got identifier `{name}`"
        ))),
    }
}

fn write_list(out: &mut String, items: &[Value]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match item {
            Value::Array(inner) => {
                out.push('(');
                write_list(out, inner);
                out.push(')');
            }
            other => write_scalar(out, other),
        }
    }
}

/// Write a single value literal. Lists and objects nested below the top level are written as
/// their JSON text in a string literal.
fn write_scalar(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s),
        Value::Array(_) | Value::Object(_) => write_string(out, &value.to_string()),
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

fn write_ident(out: &mut String, name: &str) {
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push('`');
        for ch in part.chars() {
            if ch == '`' {
                out.push('`');
            }
            out.push(ch);
        }
        out.push('`');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_identifiers_and_values_in_order() {
        let sql = render(
            "SELECT * FROM ??.?? WHERE ?? = ?",
            &[
                Param::ident("shop"),
                Param::ident("users"),
                Param::ident("email"),
                Param::value("a@b.c"),
            ],
        )
        .unwrap();
        assert_eq!(sql, "SELECT * FROM `shop`.`users` WHERE `email` = 'a@b.c'");
    }

    #[test]
    fn escapes_backticks_and_dotted_identifiers() {
        let sql = render("??, ??", &[Param::ident("we`ird"), Param::ident("db.t")]).unwrap();
        assert_eq!(sql, "`we``ird`, `db`.`t`");
    }

    #[test]
    fn escapes_string_literals() {
        let sql = render("?", &[Param::value("it's a \"test\"\\\n\0")]).unwrap();
        assert_eq!(sql, r#"'it\'s a \"test\"\\\n\0'"#);
    }

    #[test]
    fn renders_scalars() {
        let sql = render(
            "? ? ? ?",
            &[
                Param::value(Value::Null),
                Param::value(true),
                Param::value(-7),
                Param::value(1.5),
            ],
        )
        .unwrap();
        assert_eq!(sql, "NULL true -7 1.5");
    }

    #[test]
    fn lists_expand_and_nest() {
        let sql = render("IN (?)", &[Param::value(json!([1, "a", null]))]).unwrap();
        assert_eq!(sql, "IN (1, 'a', NULL)");

        let sql = render("VALUES ?", &[Param::value(json!([[1, 2], [3, 4]]))]).unwrap();
        assert_eq!(sql, "VALUES (1, 2), (3, 4)");
    }

    #[test]
    fn objects_render_as_assignments() {
        let sql = render(
            "INSERT INTO ?? SET ?",
            &[
                Param::ident("users"),
                Param::value(json!({"name": "ann", "age": 30, "meta": {"k": 1}})),
            ],
        )
        .unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO `users` SET `name` = 'ann', `age` = 30, `meta` = '{\"k\":1}'"#
        );
    }

    #[test]
    fn identifier_slot_accepts_string_values() {
        let sql = render("SELECT ?? FROM t", &[Param::value(json!(["a", "b"]))]).unwrap();
        assert_eq!(sql, "SELECT `a`, `b` FROM t");
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let err = render("?? = ?", &[Param::ident("a")]).unwrap_err();
        assert_eq!(
            err,
            QbError::Render("placeholder #2 has no matching parameter".to_string())
        );
    }

    #[test]
    fn mismatched_slots_are_errors() {
        assert!(render("??", &[Param::value(1)]).is_err());
        assert!(render("?", &[Param::ident("users")]).is_err());
    }

    #[test]
    fn surplus_parameters_are_ignored() {
        let sql = render("SELECT 1", &[Param::value(1)]).unwrap();
        assert_eq!(sql, "SELECT 1");
    }
}
