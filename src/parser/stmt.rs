//! Statement-level parsing: one method per statement kind.

use super::Parser;
use crate::ast::{
    AlterAction, AlterTableStmt, Assignment, ColumnDef, ColumnList, CountStmt, CreateTableStmt,
    DeleteStmt, DropTableStmt, Expr, Ident, InsertStmt, SelectStmt, UpdateStmt,
};
use crate::error::{Error, Result};
use crate::lexer::{Keyword, Operator, Punctuation, TokenKind};
use crate::types::DataType;

impl<'a> Parser<'a> {
    /// `select := SELECT column_list FROM ident [ where ]`
    pub(super) fn parse_select(&mut self) -> Result<SelectStmt> {
        self.expect_keyword(Keyword::Select)?;
        let columns = self.parse_column_list()?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_ident()?;
        let where_clause = self.parse_optional_where()?;
        Ok(SelectStmt {
            columns,
            table,
            where_clause,
        })
    }

    /// `insert := INSERT INTO ident VALUES "(" expr { "," expr } ")"`
    pub(super) fn parse_insert(&mut self) -> Result<InsertStmt> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_ident()?;
        self.expect_keyword(Keyword::Values)?;
        self.expect_punctuation(Punctuation::LeftParen)?;
        let mut values = vec![self.parse_expr()?];
        while self.check_punctuation(Punctuation::Comma)? {
            self.advance()?;
            values.push(self.parse_expr()?);
        }
        self.expect_punctuation(Punctuation::RightParen)?;
        Ok(InsertStmt { table, values })
    }

    /// `update := UPDATE ident SET assign { "," assign } [ where ]`
    pub(super) fn parse_update(&mut self) -> Result<UpdateStmt> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_ident()?;
        self.expect_keyword(Keyword::Set)?;
        let mut assignments = vec![self.parse_assignment()?];
        while self.check_punctuation(Punctuation::Comma)? {
            self.advance()?;
            assignments.push(self.parse_assignment()?);
        }
        let where_clause = self.parse_optional_where()?;
        Ok(UpdateStmt {
            table,
            assignments,
            where_clause,
        })
    }

    /// `delete := DELETE FROM ident [ where ]`
    pub(super) fn parse_delete(&mut self) -> Result<DeleteStmt> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_ident()?;
        let where_clause = self.parse_optional_where()?;
        Ok(DeleteStmt { table, where_clause })
    }

    /// `count := COUNT FROM ident [ where ]`
    pub(super) fn parse_count(&mut self) -> Result<CountStmt> {
        self.expect_keyword(Keyword::Count)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_ident()?;
        let where_clause = self.parse_optional_where()?;
        Ok(CountStmt { table, where_clause })
    }

    /// `create_table := CREATE TABLE ident [ "(" col_def { "," col_def } ")" ]`
    pub(super) fn parse_create_table(&mut self) -> Result<CreateTableStmt> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_ident()?;

        let columns = if self.check_punctuation(Punctuation::LeftParen)? {
            self.advance()?;
            let mut defs = vec![self.parse_column_def()?];
            while self.check_punctuation(Punctuation::Comma)? {
                self.advance()?;
                defs.push(self.parse_column_def()?);
            }
            self.expect_punctuation(Punctuation::RightParen)?;
            defs
        } else {
            Vec::new()
        };

        Ok(CreateTableStmt { table, columns })
    }

    /// `alter_table := ALTER TABLE ident ADD COLUMN col_def
    ///               | ALTER TABLE ident DROP COLUMN ident`
    pub(super) fn parse_alter_table(&mut self) -> Result<AlterTableStmt> {
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_ident()?;

        let action = if self.check_keyword(Keyword::Add)? {
            self.advance()?;
            self.expect_keyword(Keyword::Column)?;
            AlterAction::AddColumn(self.parse_column_def()?)
        } else if self.check_keyword(Keyword::Drop)? {
            self.advance()?;
            self.expect_keyword(Keyword::Column)?;
            AlterAction::DropColumn(self.parse_ident()?)
        } else {
            let token = self.peek()?.clone();
            return Err(Error::unexpected_token(
                "ADD or DROP",
                token.kind.to_string(),
                token.span,
            ));
        };

        Ok(AlterTableStmt { table, action })
    }

    /// `drop_table := DROP TABLE ident`
    pub(super) fn parse_drop_table(&mut self) -> Result<DropTableStmt> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_ident()?;
        Ok(DropTableStmt { table })
    }

    /// `column_list := "*" | ident { "," ident }`
    fn parse_column_list(&mut self) -> Result<ColumnList> {
        if matches!(self.peek()?.kind, TokenKind::Operator(Operator::Star)) {
            self.advance()?;
            return Ok(ColumnList::All);
        }

        let mut columns = vec![self.parse_ident()?];
        while self.check_punctuation(Punctuation::Comma)? {
            self.advance()?;
            columns.push(self.parse_ident()?);
        }
        Ok(ColumnList::Columns(columns))
    }

    /// `col_def := ident data_type { PRIMARY KEY | NOT NULL }`
    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.parse_ident()?;
        let data_type = self.parse_data_type()?;

        let mut is_primary_key = false;
        let mut not_null = false;
        loop {
            if self.check_keyword(Keyword::Primary)? {
                self.advance()?;
                self.expect_keyword(Keyword::Key)?;
                is_primary_key = true;
            } else if self.check_keyword(Keyword::Not)? {
                self.advance()?;
                self.expect_keyword(Keyword::Null)?;
                not_null = true;
            } else {
                break;
            }
        }

        Ok(ColumnDef {
            name,
            data_type,
            is_primary_key,
            not_null,
        })
    }

    /// `data_type := INT | FLOAT | STRING "(" integer ")" | BOOL`
    fn parse_data_type(&mut self) -> Result<DataType> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Keyword(Keyword::Int) => Ok(DataType::Int),
            TokenKind::Keyword(Keyword::Float) => Ok(DataType::Float),
            TokenKind::Keyword(Keyword::Bool) => Ok(DataType::Bool),
            TokenKind::Keyword(Keyword::String) => {
                self.expect_punctuation(Punctuation::LeftParen)?;
                let len_token = self.advance()?;
                let len = match len_token.kind {
                    TokenKind::Integer(i) if i >= 0 => i as usize,
                    _ => {
                        return Err(Error::unexpected_token(
                            "an integer length",
                            len_token.kind.to_string(),
                            len_token.span,
                        ))
                    }
                };
                self.expect_punctuation(Punctuation::RightParen)?;
                Ok(DataType::String(len))
            }
            _ => Err(Error::unexpected_token(
                "a data type",
                token.kind.to_string(),
                token.span,
            )),
        }
    }

    /// `assign := ident "=" expr`
    fn parse_assignment(&mut self) -> Result<Assignment> {
        let column = self.parse_ident()?;
        match &self.advance()?.kind {
            TokenKind::Operator(Operator::Eq) => {}
            other => {
                let span = self.current_span();
                return Err(Error::unexpected_token("'='", other.to_string(), span));
            }
        }
        let value = self.parse_expr()?;
        Ok(Assignment { column, value })
    }

    /// `where := WHERE expr`
    fn parse_optional_where(&mut self) -> Result<Option<Expr>> {
        if self.check_keyword(Keyword::Where)? {
            self.advance()?;
            Ok(Some(self.parse_expr()?))
        } else {
            Ok(None)
        }
    }

    fn check_punctuation(&mut self, punct: Punctuation) -> Result<bool> {
        Ok(matches!(&self.peek()?.kind, TokenKind::Punctuation(p) if *p == punct))
    }
}

#[cfg(test)]
mod tests {
    use super::super::Parser;
    use crate::ast::{ColumnList, Stmt};
    use crate::types::DataType;

    #[test]
    fn select_star() {
        let mut parser = Parser::new("SELECT * FROM users");
        let stmt = parser.parse_statement().unwrap();
        match stmt {
            Stmt::Select(select) => {
                assert_eq!(select.columns, ColumnList::All);
                assert_eq!(select.table.value, "users");
                assert!(select.where_clause.is_none());
            }
            _ => panic!("expected select"),
        }
    }

    #[test]
    fn select_with_column_list_and_where() {
        let mut parser = Parser::new("SELECT id, name FROM users WHERE id = 1");
        let stmt = parser.parse_statement().unwrap();
        match stmt {
            Stmt::Select(select) => {
                assert_eq!(
                    select.columns,
                    ColumnList::Columns(vec![
                        crate::ast::Ident::new("id", select.table.span),
                        crate::ast::Ident::new("name", select.table.span),
                    ])
                );
                assert!(select.where_clause.is_some());
            }
            _ => panic!("expected select"),
        }
    }

    #[test]
    fn insert_requires_parens() {
        let mut parser = Parser::new("INSERT INTO t VALUES (1, \"a\")");
        let stmt = parser.parse_statement().unwrap();
        match stmt {
            Stmt::Insert(insert) => assert_eq!(insert.values.len(), 2),
            _ => panic!("expected insert"),
        }

        let mut parser = Parser::new("INSERT INTO t VALUES 1, 2");
        assert!(parser.parse_statement().is_err());
    }

    #[test]
    fn create_table_with_column_defs() {
        let mut parser = Parser::new(
            "CREATE TABLE users (id INT PRIMARY KEY NOT NULL, name STRING(50) NOT NULL)",
        );
        let stmt = parser.parse_statement().unwrap();
        match stmt {
            Stmt::CreateTable(create) => {
                assert_eq!(create.columns.len(), 2);
                assert_eq!(create.columns[0].data_type, DataType::Int);
                assert!(create.columns[0].is_primary_key);
                assert_eq!(create.columns[1].data_type, DataType::String(50));
            }
            _ => panic!("expected create table"),
        }
    }

    #[test]
    fn alter_table_add_and_drop_column() {
        let mut parser = Parser::new("ALTER TABLE t ADD COLUMN age INT");
        assert!(parser.parse_statement().is_ok());

        let mut parser = Parser::new("ALTER TABLE t DROP COLUMN age");
        assert!(parser.parse_statement().is_ok());
    }

    #[test]
    fn count_from_with_where() {
        let mut parser = Parser::new("COUNT FROM t WHERE rowid = 1");
        let stmt = parser.parse_statement().unwrap();
        assert!(matches!(stmt, Stmt::Count(_)));
    }

    #[test]
    fn update_multiple_assignments() {
        let mut parser = Parser::new("UPDATE t SET a = 1, b = 2 WHERE a = 0");
        let stmt = parser.parse_statement().unwrap();
        match stmt {
            Stmt::Update(update) => assert_eq!(update.assignments.len(), 2),
            _ => panic!("expected update"),
        }
    }
}
