//! SQL parsing and classification logic.
//!
//! Uses sqlparser-rs with the SQLite dialect. Every statement in the text is
//! inspected, including CTEs, set operations and derived tables, since a
//! data-modifying statement can hide inside any of them.

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use crate::error::{AskError, Result};

use super::{Classification, SafetyLevel, StatementType};

/// Parses SQL text and classifies what it would do.
#[derive(Debug)]
pub struct SqlClassifier {
    dialect: SQLiteDialect,
}

impl SqlClassifier {
    pub fn new() -> Self {
        Self {
            dialect: SQLiteDialect {},
        }
    }

    /// Classifies every statement in `sql`.
    ///
    /// Several statements classify as [`StatementType::Multiple`] at the level
    /// of the most dangerous one. Fails when the text does not parse or holds
    /// no statement.
    pub fn classify(&self, sql: &str) -> Result<Classification> {
        let statements = Parser::parse_sql(&self.dialect, sql)
            .map_err(|e| AskError::query(format!("SQL parse error: {}", e)))?;

        match statements.as_slice() {
            [] => Err(AskError::query("Empty SQL statement")),
            [statement] => Ok(classify_statement(statement)),
            _ => {
                let worst = statements
                    .iter()
                    .map(classify_statement)
                    .fold(Classification::select(), Classification::most_dangerous);
                Ok(Classification::new(
                    worst.level,
                    StatementType::Multiple(Box::new(worst.statement_type)),
                ))
            }
        }
    }
}

fn classify_statement(statement: &Statement) -> Classification {
    use SafetyLevel::{Destructive, Mutating, Safe};

    match statement {
        Statement::Query(query) => classify_query(query),
        // EXPLAIN ANALYZE runs the statement
        Statement::Explain {
            analyze: true,
            statement,
            ..
        } => Classification::new(classify_statement(statement).level, StatementType::Explain),
        Statement::Explain { .. } => Classification::new(Safe, StatementType::Explain),

        Statement::Insert { .. } => Classification::new(Mutating, StatementType::Insert),
        Statement::Update { .. } => Classification::new(Mutating, StatementType::Update),

        Statement::Delete { .. } => Classification::new(Destructive, StatementType::Delete),
        Statement::Drop { .. } => Classification::new(Destructive, StatementType::Drop),
        Statement::AlterTable { .. } => Classification::new(Destructive, StatementType::Alter),
        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. } => {
            Classification::new(Destructive, StatementType::Create)
        }

        // PRAGMA, ATTACH, VACUUM and anything else we do not recognize
        _ => Classification::new(Destructive, StatementType::Unknown),
    }
}

fn classify_query(query: &Query) -> Classification {
    let ctes = query
        .with
        .iter()
        .flat_map(|with| with.cte_tables.iter())
        .map(|cte| classify_query(&cte.query))
        .fold(Classification::select(), Classification::most_dangerous);

    ctes.most_dangerous(classify_set_expr(&query.body))
}

fn classify_set_expr(set_expr: &SetExpr) -> Classification {
    match set_expr {
        SetExpr::Insert(stmt) | SetExpr::Update(stmt) => classify_statement(stmt),
        SetExpr::Query(query) => classify_query(query),
        SetExpr::Select(select) => classify_select(select),
        SetExpr::SetOperation { left, right, .. } => {
            classify_set_expr(left).most_dangerous(classify_set_expr(right))
        }
        SetExpr::Values(_) | SetExpr::Table(_) => Classification::select(),
        #[allow(unreachable_patterns)]
        _ => Classification::new(SafetyLevel::Destructive, StatementType::Unknown),
    }
}

fn classify_select(select: &Select) -> Classification {
    select
        .from
        .iter()
        .map(classify_table_with_joins)
        .fold(Classification::select(), Classification::most_dangerous)
}

fn classify_table_with_joins(twj: &TableWithJoins) -> Classification {
    twj.joins
        .iter()
        .map(|join| classify_table_factor(&join.relation))
        .fold(classify_table_factor(&twj.relation), Classification::most_dangerous)
}

/// Only derived tables and nested joins can contain further statements.
fn classify_table_factor(factor: &TableFactor) -> Classification {
    match factor {
        TableFactor::Derived { subquery, .. } => classify_query(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => classify_table_with_joins(table_with_joins),
        _ => Classification::select(),
    }
}
