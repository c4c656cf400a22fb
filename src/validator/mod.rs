//! Semantic validation: checks a parsed statement against the live
//! catalog before an executor is allowed to touch it.
//!
//! Executors never re-check what the validator already guarantees.

use crate::ast::{AlterAction, BinaryOp, ColumnDef, ColumnList, Expr, Ident, Stmt};
use crate::catalog::{Catalog, Column, Table};
use crate::error::{Error, ErrorKind, Result};
use crate::types::{DataType, Value};

/// Validate `stmt` against `catalog`. On success the statement is safe to
/// hand to the matching executor.
pub fn validate(stmt: &Stmt, catalog: &Catalog) -> Result<()> {
    match stmt {
        Stmt::Select(select) => {
            let table = require_table(catalog, &select.table)?;
            match &select.columns {
                ColumnList::All => {}
                ColumnList::Columns(columns) => {
                    for column in columns {
                        require_column(table, column)?;
                    }
                }
            }
            if let Some(where_clause) = &select.where_clause {
                validate_expr(table, where_clause)?;
            }
            Ok(())
        }
        Stmt::Insert(insert) => {
            let table = require_table(catalog, &insert.table)?;
            if insert.values.len() != table.columns.len() {
                return Err(Error::new(ErrorKind::ArityMismatch {
                    expected: table.columns.len(),
                    found: insert.values.len(),
                }));
            }
            for (column, value_expr) in table.columns.iter().zip(&insert.values) {
                let literal = value_expr
                    .as_literal()
                    .ok_or_else(|| Error::new(ErrorKind::NonLiteralInsertValue))?;
                let value = Value::from(literal);
                check_cell(column, &value)?;
            }
            Ok(())
        }
        Stmt::Update(update) => {
            let table = require_table(catalog, &update.table)?;
            for assignment in &update.assignments {
                let column = require_column(table, &assignment.column)?;
                if column.is_primary_key {
                    return Err(Error::new(ErrorKind::PrimaryKeyImmutable(
                        column.name.clone(),
                    )));
                }
                validate_expr(table, &assignment.value)?;
                if let Some(literal) = assignment.value.as_literal() {
                    check_cell(column, &Value::from(literal))?;
                }
            }
            if let Some(where_clause) = &update.where_clause {
                validate_expr(table, where_clause)?;
            }
            Ok(())
        }
        Stmt::Delete(delete) => {
            let table = require_table(catalog, &delete.table)?;
            if let Some(where_clause) = &delete.where_clause {
                validate_expr(table, where_clause)?;
            }
            Ok(())
        }
        Stmt::Count(count) => {
            let table = require_table(catalog, &count.table)?;
            if let Some(where_clause) = &count.where_clause {
                validate_expr(table, where_clause)?;
            }
            Ok(())
        }
        Stmt::CreateTable(create) => {
            if catalog.table_exists(&create.table.value) {
                return Err(Error::new(ErrorKind::DuplicateTable(
                    create.table.value.clone(),
                )));
            }
            // A bare `CREATE TABLE name` with no parenthesized column list
            // is a deferred schema, built up via later `ALTER TABLE ... ADD
            // COLUMN` statements. `EmptyColumnList` covers only an
            // explicit-but-empty list, which the grammar's
            // `col_def { "," col_def }` already makes unparseable, so in
            // practice this check never fires; it is kept so a future
            // relaxation of the grammar (e.g. allowing `()`) stays guarded.
            let mut seen_primary_key = false;
            for (i, column) in create.columns.iter().enumerate() {
                validate_column_def(column)?;
                if create.columns[..i]
                    .iter()
                    .any(|other| other.name.matches(&column.name.value))
                {
                    return Err(Error::new(ErrorKind::DuplicateColumn(
                        column.name.value.clone(),
                    )));
                }
                if column.is_primary_key {
                    if seen_primary_key {
                        return Err(Error::new(ErrorKind::MultiplePrimaryKeys));
                    }
                    seen_primary_key = true;
                }
            }
            Ok(())
        }
        Stmt::AlterTable(alter) => {
            let table = require_table(catalog, &alter.table)?;
            match &alter.action {
                AlterAction::AddColumn(column_def) => {
                    validate_column_def(column_def)?;
                    if table.column_index(&column_def.name.value).is_some() {
                        return Err(Error::new(ErrorKind::DuplicateColumn(
                            column_def.name.value.clone(),
                        )));
                    }
                    if column_def.is_primary_key && table.primary_key_index().is_some() {
                        return Err(Error::new(ErrorKind::MultiplePrimaryKeys));
                    }
                    Ok(())
                }
                AlterAction::DropColumn(_) => Err(Error::new(ErrorKind::NotImplemented(
                    "ALTER TABLE ... DROP COLUMN".to_string(),
                ))),
            }
        }
        Stmt::DropTable(drop) => {
            require_table(catalog, &drop.table)?;
            Ok(())
        }
    }
}

fn require_table<'a>(catalog: &'a Catalog, name: &Ident) -> Result<&'a Table> {
    catalog
        .find_table(&name.value)
        .ok_or_else(|| Error::new(ErrorKind::UnknownTable(name.value.clone())))
}

fn require_column<'a>(table: &'a Table, name: &Ident) -> Result<&'a Column> {
    table
        .column_index(&name.value)
        .map(|i| &table.columns[i])
        .ok_or_else(|| Error::new(ErrorKind::UnknownColumn(name.value.clone())))
}

fn validate_column_def(column: &ColumnDef) -> Result<()> {
    if let DataType::String(max_length) = column.data_type {
        if max_length == 0 {
            return Err(Error::new(ErrorKind::LengthViolation {
                column: column.name.value.clone(),
                max: 0,
                actual: 0,
            }));
        }
    }
    Ok(())
}

/// Check `value` against `column`'s null/type/length rules. Shared by the
/// validator's literal checks above and, via `pub(crate)`, by the `UPDATE`
/// executor, which must run this same check against the evaluated runtime
/// value of every assignment RHS (literal or not) before it is coerced and
/// spliced into the target cell.
pub(crate) fn check_cell(column: &Column, value: &Value) -> Result<()> {
    if value.is_null() {
        if !column.allows_null {
            return Err(Error::new(ErrorKind::NullViolation(column.name.clone())));
        }
        return Ok(());
    }

    if !column.data_type.accepts(value) {
        return Err(Error::new(ErrorKind::TypeMismatch {
            column: column.name.clone(),
            expected: column.data_type.name().to_string(),
            found: value.type_name().to_string(),
        }));
    }

    if let (DataType::String(max_length), Value::Str(s)) = (column.data_type, value) {
        if s.len() > max_length {
            return Err(Error::new(ErrorKind::LengthViolation {
                column: column.name.clone(),
                max: max_length,
                actual: s.len(),
            }));
        }
    }

    Ok(())
}

/// Every identifier referenced inside an expression must name a column of
/// `table`, except the virtual `rowid` pseudo-column (the row's live
/// 0-based position), which every statement kind accepts without it being
/// a declared column. For a comparison whose two sides are a column
/// identifier and a literal (in either order), the literal's type must
/// also be compatible with the column's type, per §4.6's "for comparisons
/// and assignments" rule.
fn validate_expr(table: &Table, expr: &Expr) -> Result<()> {
    match expr {
        Expr::Literal(..) => Ok(()),
        Expr::Identifier(ident) if ident.is_rowid() => Ok(()),
        Expr::Identifier(ident) => {
            require_column(table, ident)?;
            Ok(())
        }
        Expr::Unary { expr, .. } => validate_expr(table, expr),
        Expr::Binary { op, left, right, .. } => {
            validate_expr(table, left)?;
            validate_expr(table, right)?;
            check_comparison_type(table, *op, left, right)
        }
    }
}

/// For a comparison operator with a column identifier on one side and a
/// literal on the other, check that the literal's value type is compatible
/// with the column's declared type. Non-comparison operators, operands that
/// are not an identifier/literal pair, and the virtual `rowid`
/// pseudo-column are left unconstrained; a `Null` literal is also left to
/// `NullViolation`'s proper home (assignment/insert), not a comparison.
fn check_comparison_type(table: &Table, op: BinaryOp, left: &Expr, right: &Expr) -> Result<()> {
    if !matches!(
        op,
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq
    ) {
        return Ok(());
    }

    let pair = match (left, right) {
        (Expr::Identifier(ident), Expr::Literal(literal, _)) if !ident.is_rowid() => {
            Some((ident, literal))
        }
        (Expr::Literal(literal, _), Expr::Identifier(ident)) if !ident.is_rowid() => {
            Some((ident, literal))
        }
        _ => None,
    };

    let Some((ident, literal)) = pair else {
        return Ok(());
    };

    let column = require_column(table, ident)?;
    let value = Value::from(literal);
    if value.is_null() || column.data_type.accepts(&value) {
        return Ok(());
    }

    Err(Error::new(ErrorKind::TypeMismatch {
        column: column.name.clone(),
        expected: column.data_type.name().to_string(),
        found: value.type_name().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EngineConfig, Row};
    use crate::parser::Parser;

    fn catalog_with_users() -> Catalog {
        let mut catalog = Catalog::new(EngineConfig::default());
        catalog
            .create_table(
                "users",
                vec![
                    Column {
                        name: "id".into(),
                        data_type: DataType::Int,
                        is_primary_key: true,
                        allows_null: false,
                    },
                    Column {
                        name: "name".into(),
                        data_type: DataType::String(20),
                        is_primary_key: false,
                        allows_null: true,
                    },
                ],
            )
            .unwrap();
        catalog
            .insert_row("users", Row::new(vec![Value::Int(1), Value::Str("a".into())]))
            .unwrap();
        catalog
    }

    fn parse(sql: &str) -> Stmt {
        Parser::new(sql).parse_statement().unwrap()
    }

    #[test]
    fn unknown_table_is_rejected() {
        let catalog = Catalog::new(EngineConfig::default());
        let stmt = parse("SELECT * FROM ghost");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownTable("ghost".to_string()));
    }

    #[test]
    fn unknown_column_in_select_list_is_rejected() {
        let catalog = catalog_with_users();
        let stmt = parse("SELECT ghost_col FROM users");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnknownColumn(_)));
    }

    #[test]
    fn where_rowid_is_accepted_without_a_declared_column() {
        let catalog = catalog_with_users();
        for sql in [
            "SELECT * FROM users WHERE rowid = 0",
            "DELETE FROM users WHERE rowid = 0",
            "UPDATE users SET name = \"x\" WHERE rowid = 0",
            "COUNT FROM users WHERE rowid = 0",
        ] {
            assert!(validate(&parse(sql), &catalog).is_ok(), "{sql} should validate");
        }
    }

    #[test]
    fn insert_arity_mismatch_is_rejected() {
        let catalog = catalog_with_users();
        let stmt = parse("INSERT INTO users VALUES (1)");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ArityMismatch { .. }));
    }

    #[test]
    fn insert_type_mismatch_is_rejected() {
        let catalog = catalog_with_users();
        let stmt = parse("INSERT INTO users VALUES (\"x\", \"y\")");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn update_of_primary_key_is_rejected() {
        let catalog = catalog_with_users();
        let stmt = parse("UPDATE users SET id = 2 WHERE id = 1");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::PrimaryKeyImmutable(_)));
    }

    #[test]
    fn create_table_rejects_duplicate_columns() {
        let catalog = Catalog::new(EngineConfig::default());
        let stmt = parse("CREATE TABLE t (a INT, a FLOAT)");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::DuplicateColumn(_)));
    }

    #[test]
    fn create_table_rejects_multiple_primary_keys() {
        let catalog = Catalog::new(EngineConfig::default());
        let stmt = parse("CREATE TABLE t (a INT PRIMARY KEY, b INT PRIMARY KEY)");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MultiplePrimaryKeys);
    }

    #[test]
    fn create_table_with_no_column_list_is_a_deferred_schema() {
        let catalog = Catalog::new(EngineConfig::default());
        let stmt = parse("CREATE TABLE t");
        assert!(validate(&stmt, &catalog).is_ok());
    }

    #[test]
    fn alter_table_drop_column_is_not_implemented() {
        let catalog = catalog_with_users();
        let stmt = parse("ALTER TABLE users DROP COLUMN name");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotImplemented(_)));
    }

    #[test]
    fn where_clause_rejects_literal_incompatible_with_column_type() {
        let catalog = catalog_with_users();
        let stmt = parse("SELECT * FROM users WHERE id = \"not-a-number\"");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn where_clause_accepts_literal_on_either_side_of_comparison() {
        let catalog = catalog_with_users();
        assert!(validate(&parse("SELECT * FROM users WHERE id = 1"), &catalog).is_ok());
        assert!(validate(&parse("SELECT * FROM users WHERE 1 = id"), &catalog).is_ok());
        let err = validate(&parse("SELECT * FROM users WHERE \"x\" = id"), &catalog).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn where_clause_allows_null_literal_comparison() {
        let catalog = catalog_with_users();
        assert!(validate(&parse("SELECT * FROM users WHERE id = NULL"), &catalog).is_ok());
    }

    #[test]
    fn alter_table_add_duplicate_primary_key_is_rejected() {
        let catalog = catalog_with_users();
        let stmt = parse("ALTER TABLE users ADD COLUMN id2 INT PRIMARY KEY");
        let err = validate(&stmt, &catalog).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MultiplePrimaryKeys);
    }
}
