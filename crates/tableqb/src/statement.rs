//! Planned statements: a SQL template plus its positional parameters.

use crate::connection::Param;
use crate::error::QbResult;
use crate::render::render;
use crate::value::Lookup;
use serde_json::Value;

/// A SQL template with `?`/`??` placeholders and the parameters that fill them, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Statement {
    /// Start a statement from a SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append raw SQL text.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a `??` placeholder bound to `name`.
    pub fn push_ident(&mut self, name: impl Into<String>) -> &mut Self {
        self.sql.push_str("??");
        self.params.push(Param::Ident(name.into()));
        self
    }

    /// Append a `?` placeholder bound to `value`.
    pub fn push_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.sql.push('?');
        self.params.push(Param::Value(value.into()));
        self
    }

    /// Append `?? = ?` for a single value or `?? IN (?)` for a list.
    pub fn push_lookup(&mut self, column: &str, lookup: &Lookup) -> &mut Self {
        self.push_ident(column);
        match lookup {
            Lookup::One(_) => self.push(" = ").push_value(lookup.to_param_value()),
            Lookup::Many(_) => self
                .push(" IN (")
                .push_value(lookup.to_param_value())
                .push(")"),
        }
    }

    /// Render the statement with parameters inlined, for debugging.
    pub fn render(&self) -> QbResult<String> {
        render(&self.sql, &self.params)
    }
}

/// What an operation will do: run a statement, or skip the round trip entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Submit this statement.
    Run(Statement),
    /// Nothing can match (or nothing to do); resolve without querying.
    Skip,
}

impl Plan {
    /// The statement to run, if any.
    pub fn statement(&self) -> Option<&Statement> {
        match self {
            Plan::Run(stmt) => Some(stmt),
            Plan::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Plan::Skip)
    }
}

impl From<Statement> for Plan {
    fn from(stmt: Statement) -> Self {
        Plan::Run(stmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_placeholders_in_order() {
        let mut stmt = Statement::new("SELECT * FROM ");
        stmt.push_ident("users").push(" WHERE ").push_lookup("id", &Lookup::from(3));

        assert_eq!(stmt.sql, "SELECT * FROM ?? WHERE ?? = ?");
        assert_eq!(
            stmt.params,
            vec![Param::ident("users"), Param::ident("id"), Param::value(3)]
        );
    }

    #[test]
    fn list_lookup_renders_in() {
        let mut stmt = Statement::new("");
        stmt.push_lookup("id", &Lookup::from(vec![1, 2]));
        assert_eq!(stmt.sql, "?? IN (?)");
        assert_eq!(stmt.params[1], Param::value(json!([1, 2])));
        assert_eq!(stmt.render().unwrap(), "`id` IN (1, 2)");
    }

    #[test]
    fn plan_accessors() {
        let plan = Plan::from(Statement::new("SELECT 1"));
        assert!(!plan.is_skip());
        assert_eq!(plan.statement().map(|s| s.sql.as_str()), Some("SELECT 1"));
        assert!(Plan::Skip.is_skip());
        assert!(Plan::Skip.statement().is_none());
    }
}
