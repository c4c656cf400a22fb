//! Executors: given a validated statement and the catalog, perform the
//! effect and report a result.
//!
//! Executors never re-check what the validator already guarantees; they
//! translate AST into catalog operations and build the user-visible
//! result.

use crate::ast::{AlterAction, BinaryOp, ColumnDef, ColumnList, Expr, Stmt, UnaryOp};
use crate::catalog::{Catalog, Column, Row, Table};
use crate::error::{Error, ErrorKind, Result};
use crate::types::{DataType, Value};

/// The outcome of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    /// `SELECT`: column names plus the matching rows.
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    /// `INSERT`/`UPDATE`/`DELETE`: number of rows affected.
    RowsAffected(usize),
    /// `CREATE TABLE`/`DROP TABLE`/`ALTER TABLE`: no row-level result.
    Done,
    /// `COUNT FROM`: the number of matching rows.
    Count(usize),
}

/// Validate then execute `stmt` against `catalog`.
pub fn execute(stmt: &Stmt, catalog: &mut Catalog) -> Result<ExecResult> {
    crate::validator::validate(stmt, catalog)?;
    execute_validated(stmt, catalog)
}

fn execute_validated(stmt: &Stmt, catalog: &mut Catalog) -> Result<ExecResult> {
    match stmt {
        Stmt::Select(select) => {
            let table = catalog.find_table(&select.table.value).expect("validated");
            let indices = projection_indices(table, &select.columns);
            let columns = indices.iter().map(|&i| table.columns[i].name.clone()).collect();

            let mut rows = Vec::new();
            for (rowid, row) in table.rows.iter().enumerate() {
                let matches = match &select.where_clause {
                    Some(predicate) => eval_predicate(table, rowid, row, predicate)?,
                    None => true,
                };
                if matches {
                    rows.push(indices.iter().map(|&i| row.0[i].clone()).collect());
                }
            }
            Ok(ExecResult::Rows { columns, rows })
        }
        Stmt::Insert(insert) => {
            let table = catalog.find_table(&insert.table.value).expect("validated");
            let values: Vec<Value> = table
                .columns
                .iter()
                .zip(&insert.values)
                .map(|(column, expr)| {
                    let literal = expr.as_literal().expect("validated: literal-only insert");
                    Value::from(literal).coerce(column.data_type)
                })
                .collect();
            catalog.insert_row(&insert.table.value, Row::new(values))?;
            Ok(ExecResult::RowsAffected(1))
        }
        Stmt::Update(update) => {
            let table = catalog.find_table(&update.table.value).expect("validated");
            let assignment_columns: Vec<usize> = update
                .assignments
                .iter()
                .map(|a| table.column_index(&a.column.value).expect("validated"))
                .collect();

            let mut planned = Vec::new();
            for (rowid, row) in table.rows.iter().enumerate() {
                let matches = match &update.where_clause {
                    Some(predicate) => eval_predicate(table, rowid, row, predicate)?,
                    None => true,
                };
                if !matches {
                    continue;
                }
                let mut cells = Vec::with_capacity(update.assignments.len());
                for (assignment, &column_index) in update.assignments.iter().zip(&assignment_columns) {
                    let column = &table.columns[column_index];
                    let value = eval_expr_as_value(table, rowid, row, &assignment.value)?;
                    // The validator only type-checks a literal RHS; an
                    // identifier or expression RHS (e.g. `SET age = age + 1`)
                    // is only known once evaluated against this row, so the
                    // same null/type/length check runs here for every
                    // assignment before `coerce` is allowed to see it.
                    crate::validator::check_cell(column, &value)?;
                    cells.push((column_index, value.coerce(column.data_type)));
                }
                planned.push((rowid, cells));
            }

            let affected = planned.len();
            for (rowid, cells) in planned {
                for (column_index, value) in cells {
                    catalog.update_cell(&update.table.value, rowid, column_index, value)?;
                }
            }
            Ok(ExecResult::RowsAffected(affected))
        }
        Stmt::Delete(delete) => {
            let table = catalog.find_table(&delete.table.value).expect("validated");
            let mut matching = Vec::new();
            for (rowid, row) in table.rows.iter().enumerate() {
                let matches = match &delete.where_clause {
                    Some(predicate) => eval_predicate(table, rowid, row, predicate)?,
                    None => true,
                };
                if matches {
                    matching.push(rowid);
                }
            }
            // Delete from the back so earlier indices stay valid.
            let affected = matching.len();
            for rowid in matching.into_iter().rev() {
                catalog.delete_row(&delete.table.value, rowid)?;
            }
            Ok(ExecResult::RowsAffected(affected))
        }
        Stmt::Count(count) => {
            let table = catalog.find_table(&count.table.value).expect("validated");
            let mut total = 0;
            for (rowid, row) in table.rows.iter().enumerate() {
                let matches = match &count.where_clause {
                    Some(predicate) => eval_predicate(table, rowid, row, predicate)?,
                    None => true,
                };
                if matches {
                    total += 1;
                }
            }
            Ok(ExecResult::Count(total))
        }
        Stmt::CreateTable(create) => {
            let columns = create.columns.iter().map(column_from_def).collect();
            catalog.create_table(&create.table.value, columns)?;
            Ok(ExecResult::Done)
        }
        Stmt::AlterTable(alter) => {
            match &alter.action {
                AlterAction::AddColumn(column_def) => {
                    catalog.add_column(&alter.table.value, column_from_def(column_def))?;
                }
                AlterAction::DropColumn(_) => {
                    unreachable!("validator rejects DROP COLUMN before execution")
                }
            }
            Ok(ExecResult::Done)
        }
        Stmt::DropTable(drop) => {
            catalog.drop_table(&drop.table.value)?;
            Ok(ExecResult::Done)
        }
    }
}

fn column_from_def(def: &ColumnDef) -> Column {
    Column {
        name: def.name.value.clone(),
        data_type: def.data_type,
        is_primary_key: def.is_primary_key,
        // A primary-key column implicitly disallows null, independent of
        // whether `NOT NULL` was also written.
        allows_null: !def.not_null && !def.is_primary_key,
    }
}

fn projection_indices(table: &Table, columns: &ColumnList) -> Vec<usize> {
    match columns {
        ColumnList::All => (0..table.columns.len()).collect(),
        ColumnList::Columns(idents) => idents
            .iter()
            .map(|ident| table.column_index(&ident.value).expect("validated"))
            .collect(),
    }
}

/// Evaluate `predicate` against `row`, the row currently at position
/// `rowid` within `table`, returning whether the row matches. This is the
/// one shared routine `SELECT`/`UPDATE`/`DELETE`/`COUNT` all call. `rowid`
/// resolves the virtual `rowid` pseudo-column (the row's live 0-based
/// position, not a declared column) wherever it appears.
pub fn eval_predicate(table: &Table, rowid: usize, row: &Row, predicate: &Expr) -> Result<bool> {
    Ok(eval_expr_as_value(table, rowid, row, predicate)?.is_truthy())
}

fn eval_expr_as_value(table: &Table, rowid: usize, row: &Row, expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Literal(lit, _) => Ok(Value::from(lit)),
        Expr::Identifier(ident) if ident.is_rowid() => Ok(Value::Int(rowid as i64)),
        Expr::Identifier(ident) => {
            let index = table.column_index(&ident.value).expect("validated");
            Ok(row.get(index).cloned().unwrap_or(Value::Null))
        }
        Expr::Unary { op, expr, .. } => {
            let inner = eval_expr_as_value(table, rowid, row, expr)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!inner.is_truthy()),
                UnaryOp::Neg => match inner {
                    Value::Int(i) => Value::Int(-i),
                    Value::Float(f) => Value::Float(-f),
                    _ => Value::Null,
                },
            })
        }
        Expr::Binary { op, left, right, .. } => {
            let left = eval_expr_as_value(table, rowid, row, left)?;
            let right = eval_expr_as_value(table, rowid, row, right)?;
            eval_binary(*op, left, right)
        }
    }
}

fn eval_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    use BinaryOp::*;
    match op {
        And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        Eq => Ok(Value::Bool(values_equal(&left, &right))),
        NotEq => Ok(Value::Bool(!values_equal(&left, &right))),
        Lt | Gt | LtEq | GtEq => Ok(Value::Bool(compare(op, &left, &right))),
        Add | Sub | Mul | Div => arithmetic(op, left, right),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (numeric(left), numeric(right)) {
        return a == b;
    }
    left == right
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> bool {
    let ordering = match (numeric(left), numeric(right)) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => match (left, right) {
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            _ => None,
        },
    };
    let Some(ordering) = ordering else { return false };
    match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::LtEq => ordering.is_le(),
        BinaryOp::GtEq => ordering.is_ge(),
        _ => unreachable!(),
    }
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    let (Some(a), Some(b)) = (numeric(&left), numeric(&right)) else {
        return Err(Error::new(ErrorKind::TypeMismatch {
            column: "<expression>".to_string(),
            expected: "a numeric operand".to_string(),
            found: format!("{} and {}", left.type_name(), right.type_name()),
        }));
    };

    let both_int = matches!(left, Value::Int(_)) && matches!(right, Value::Int(_));
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        _ => unreachable!(),
    };

    if both_int && op != BinaryOp::Div {
        Ok(Value::Int(result as i64))
    } else {
        Ok(Value::Float(result))
    }
}
