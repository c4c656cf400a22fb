//! Recursive-descent parser with single-token lookahead.

mod expr;
mod stmt;

use crate::error::{Error, Result, Span};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// Parses NQL source text into a statement tree. Owns its lexer and the
/// current lookahead token directly; there is no separate tokenizer pass.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }

    /// Parse a single statement. On the first error, parsing stops; there
    /// is no error recovery.
    pub fn parse_statement(&mut self) -> Result<crate::ast::Stmt> {
        use crate::ast::Stmt;

        let token = self.peek()?.clone();
        match &token.kind {
            TokenKind::Keyword(Keyword::Select) => Ok(Stmt::Select(self.parse_select()?)),
            TokenKind::Keyword(Keyword::Insert) => Ok(Stmt::Insert(self.parse_insert()?)),
            TokenKind::Keyword(Keyword::Update) => Ok(Stmt::Update(self.parse_update()?)),
            TokenKind::Keyword(Keyword::Delete) => Ok(Stmt::Delete(self.parse_delete()?)),
            TokenKind::Keyword(Keyword::Create) => Ok(Stmt::CreateTable(self.parse_create_table()?)),
            TokenKind::Keyword(Keyword::Alter) => Ok(Stmt::AlterTable(self.parse_alter_table()?)),
            TokenKind::Keyword(Keyword::Drop) => Ok(Stmt::DropTable(self.parse_drop_table()?)),
            TokenKind::Keyword(Keyword::Count) => Ok(Stmt::Count(self.parse_count()?)),
            _ => Err(Error::unexpected_token("a statement", token.kind.to_string(), token.span)),
        }
    }

    // --- Lexer-facing utilities ---

    fn peek(&mut self) -> Result<&Token> {
        self.lexer.peek()
    }

    fn advance(&mut self) -> Result<Token> {
        self.lexer.next_token()
    }

    fn check_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        Ok(self.peek()?.is_keyword(keyword))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        let token = self.advance()?;
        if token.is_keyword(keyword) {
            Ok(token)
        } else {
            Err(Error::expected_keyword(keyword.to_string(), token.span))
        }
    }

    fn expect_punctuation(&mut self, punct: crate::lexer::Punctuation) -> Result<Token> {
        let token = self.advance()?;
        match &token.kind {
            TokenKind::Punctuation(p) if *p == punct => Ok(token),
            _ => Err(Error::unexpected_token(
                format!("'{punct}'"),
                token.kind.to_string(),
                token.span,
            )),
        }
    }

    fn parse_ident(&mut self) -> Result<crate::ast::Ident> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(crate::ast::Ident::new(name, token.span)),
            _ => Err(Error::unexpected_token("an identifier", token.kind.to_string(), token.span)),
        }
    }

    fn current_span(&self) -> Span {
        Span::new(self.lexer.position(), self.lexer.position(), 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Stmt;

    #[test]
    fn dispatches_on_leading_keyword() {
        let mut parser = Parser::new("SELECT * FROM t");
        assert!(matches!(parser.parse_statement(), Ok(Stmt::Select(_))));

        let mut parser = Parser::new("DELETE FROM t");
        assert!(matches!(parser.parse_statement(), Ok(Stmt::Delete(_))));
    }

    #[test]
    fn unknown_leading_token_is_error() {
        let mut parser = Parser::new("FOOBAR");
        assert!(parser.parse_statement().is_err());
    }
}
