//! Abstract syntax tree for NQL statements.
//!
//! Nodes are a plain Rust enum rather than a tagged union with a
//! per-node disposer: ownership and drop glue fall out of the type
//! system instead of being hand-maintained.

use crate::error::Span;
use crate::types::{DataType, Value};

/// An identifier (table or column name).
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub value: String,
    pub span: Span,
}

impl Ident {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }

    /// Case-insensitive match, ASCII-only casefold (the original engine
    /// folds ASCII only; we preserve that rather than reaching for
    /// Unicode-aware `to_lowercase`).
    pub fn matches(&self, other: &str) -> bool {
        self.value.eq_ignore_ascii_case(other)
    }

    /// Whether this identifier names the virtual `rowid` pseudo-column: a
    /// row's current 0-based position, not a declared column. Recognized
    /// the same way the legacy shell's `WHERE rowid = N` path matched it.
    pub fn is_rowid(&self) -> bool {
        self.matches("rowid")
    }
}

/// A literal value appearing in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(i) => Value::Int(*i),
            Literal::Float(f) => Value::Float(*f),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }
}

/// Binary operators, ordered loosely by the parser's precedence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// An expression, used in `WHERE` predicates and assignment/insert RHS.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal, Span),
    Identifier(Ident),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(_, span) => *span,
            Expr::Identifier(ident) => ident.span,
            Expr::Unary { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
        }
    }

    /// Whether this expression is a bare literal. `INSERT` requires every
    /// value to be a literal, so the validator uses this to reject
    /// expressions in the values list.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Literal(lit, _) => Some(lit),
            _ => None,
        }
    }
}

/// A column definition appearing in `CREATE TABLE`/`ALTER TABLE ADD COLUMN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: Ident,
    pub data_type: DataType,
    pub is_primary_key: bool,
    pub not_null: bool,
}

/// `SELECT`'s projection: either `*` or an explicit column list.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnList {
    All,
    Columns(Vec<Ident>),
}

/// An `UPDATE` assignment, `column = expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub columns: ColumnList,
    pub table: Ident,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table: Ident,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub table: Ident,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table: Ident,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStmt {
    pub table: Ident,
    pub columns: Vec<ColumnDef>,
}

/// `ALTER TABLE`'s action. `DROP COLUMN` is syntactically accepted but
/// rejected at validation time, since the catalog has no way to shrink
/// existing rows in place.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterAction {
    AddColumn(ColumnDef),
    DropColumn(Ident),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStmt {
    pub table: Ident,
    pub action: AlterAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTableStmt {
    pub table: Ident,
}

/// `COUNT FROM ident [ WHERE expr ]`, a `COUNT(*)`-equivalent statement
/// carried over from the original CLI's `cmd_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountStmt {
    pub table: Ident,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    CreateTable(CreateTableStmt),
    AlterTable(AlterTableStmt),
    DropTable(DropTableStmt),
    Count(CountStmt),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 1, 1, 1)
    }

    #[test]
    fn ident_matches_case_insensitively() {
        let ident = Ident::new("Users", span());
        assert!(ident.matches("users"));
        assert!(ident.matches("USERS"));
        assert!(!ident.matches("other"));
    }

    #[test]
    fn literal_expr_extraction() {
        let lit = Expr::Literal(Literal::Int(5), span());
        assert_eq!(lit.as_literal(), Some(&Literal::Int(5)));

        let ident_expr = Expr::Identifier(Ident::new("x", span()));
        assert_eq!(ident_expr.as_literal(), None);
    }
}
