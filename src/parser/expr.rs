//! Expression parsing via precedence climbing.

use super::Parser;
use crate::ast::{BinaryOp, Expr, Ident, Literal, UnaryOp};
use crate::error::{Error, Result, Span};
use crate::lexer::{Keyword, Operator, Punctuation, TokenKind};

impl<'a> Parser<'a> {
    /// `expr := prec_or`
    pub(super) fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    /// `prec_or := prec_and { OR prec_and }`
    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.check_keyword(Keyword::Or)? {
            self.advance()?;
            let right = self.parse_and()?;
            let span = Span::new(left.span().start, right.span().end, left.span().line, left.span().column);
            left = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// `prec_and := prec_cmp { AND prec_cmp }`
    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_cmp()?;
        while self.check_keyword(Keyword::And)? {
            self.advance()?;
            let right = self.parse_cmp()?;
            let span = Span::new(left.span().start, right.span().end, left.span().line, left.span().column);
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// `prec_cmp := prec_add { ("="|"<>"|"<"|">"|"<="|">=") prec_add }`
    fn parse_cmp(&mut self) -> Result<Expr> {
        let mut left = self.parse_add()?;
        loop {
            let op = match &self.peek()?.kind {
                TokenKind::Operator(Operator::Eq) => BinaryOp::Eq,
                TokenKind::Operator(Operator::NotEq) => BinaryOp::NotEq,
                TokenKind::Operator(Operator::Lt) => BinaryOp::Lt,
                TokenKind::Operator(Operator::Gt) => BinaryOp::Gt,
                TokenKind::Operator(Operator::LtEq) => BinaryOp::LtEq,
                TokenKind::Operator(Operator::GtEq) => BinaryOp::GtEq,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_add()?;
            let span = Span::new(left.span().start, right.span().end, left.span().line, left.span().column);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// `prec_add := prec_mul { ("+"|"-") prec_mul }`
    fn parse_add(&mut self) -> Result<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match &self.peek()?.kind {
                TokenKind::Operator(Operator::Plus) => BinaryOp::Add,
                TokenKind::Operator(Operator::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_mul()?;
            let span = Span::new(left.span().start, right.span().end, left.span().line, left.span().column);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// `prec_mul := primary { ("*"|"/") primary }`
    fn parse_mul(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match &self.peek()?.kind {
                TokenKind::Operator(Operator::Star) => BinaryOp::Mul,
                TokenKind::Operator(Operator::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            let span = Span::new(left.span().start, right.span().end, left.span().line, left.span().column);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// `primary := literal | ident | "(" expr ")" | ("-"|NOT) primary`
    fn parse_unary(&mut self) -> Result<Expr> {
        let token = self.peek()?.clone();
        match &token.kind {
            TokenKind::Operator(Operator::Minus) => {
                self.advance()?;
                let inner = self.parse_unary()?;
                let span = Span::new(token.span.start, inner.span().end, token.span.line, token.span.column);
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    expr: Box::new(inner),
                    span,
                })
            }
            TokenKind::Keyword(Keyword::Not) => {
                self.advance()?;
                let inner = self.parse_unary()?;
                let span = Span::new(token.span.start, inner.span().end, token.span.line, token.span.column);
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(inner),
                    span,
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Integer(i) => Ok(Expr::Literal(Literal::Int(i), token.span)),
            TokenKind::Float(f) => Ok(Expr::Literal(Literal::Float(f), token.span)),
            TokenKind::String(s) => Ok(Expr::Literal(Literal::Str(s), token.span)),
            TokenKind::Keyword(Keyword::True) => Ok(Expr::Literal(Literal::Bool(true), token.span)),
            TokenKind::Keyword(Keyword::False) => Ok(Expr::Literal(Literal::Bool(false), token.span)),
            TokenKind::Keyword(Keyword::Null) => Ok(Expr::Literal(Literal::Null, token.span)),
            TokenKind::Identifier(name) => Ok(Expr::Identifier(Ident::new(name, token.span))),
            TokenKind::Punctuation(Punctuation::LeftParen) => {
                let inner = self.parse_expr()?;
                self.expect_punctuation(Punctuation::RightParen)
                    .map_err(|_| Error::unclosed_paren(token.span))?;
                Ok(inner)
            }
            _ => Err(Error::bad_expression(token.span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse(input: &str) -> Expr {
        let mut parser = Parser::new(input);
        parser.parse_expr().expect("expr should parse")
    }

    #[test]
    fn precedence_mul_over_add() {
        let expr = parse("1 + 2 * 3");
        match expr {
            Expr::Binary { op: BinaryOp::Add, right, .. } => {
                assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse("a = 1 OR b = 2 AND c = 3");
        match expr {
            Expr::Binary { op: BinaryOp::Or, right, .. } => {
                assert!(matches!(*right, Expr::Binary { op: BinaryOp::And, .. }));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn parenthesized_expression() {
        let expr = parse("(1 + 2) * 3");
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn unary_not_and_negation() {
        let expr = parse("NOT TRUE");
        assert!(matches!(expr, Expr::Unary { op: UnaryOp::Not, .. }));

        let expr = parse("-5");
        assert!(matches!(expr, Expr::Unary { op: UnaryOp::Neg, .. }));
    }

    #[test]
    fn unclosed_paren_is_error() {
        let mut parser = Parser::new("(1 + 2");
        assert!(parser.parse_expr().is_err());
    }
}
