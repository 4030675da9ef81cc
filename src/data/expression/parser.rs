use crate::data::address::{AddressEntry, DataAddress, RESERVED_NAMES};
use crate::data::expression::ast::{BinaryOp, Expr, LogicalOp, Stmt, UnaryOp};
use crate::data::expression::error::ExprError;
use crate::data::expression::lexer::{Span, Token, TokenKind, lex};
use crate::data::filters::{FilterId, FilterRegistry};
use crate::data::variant::Variant;

/// Deepest nesting of parentheses, unary operators and ternaries a source may use.
pub(crate) const MAX_NESTING: usize = 128;

/// Parses a value-producing expression.
pub(crate) fn parse_expr(src: &str, filters: &FilterRegistry) -> Result<Expr, ExprError> {
    let mut p = Parser::new(src, filters)?;
    let expr = p.parse_ternary()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

/// Parses `target = expr; other = expr; event(args)`.
pub(crate) fn parse_assignment(
    src: &str,
    filters: &FilterRegistry,
) -> Result<Vec<Stmt>, ExprError> {
    let mut p = Parser::new(src, filters)?;
    let mut stmts = Vec::new();
    loop {
        if p.peek().kind == TokenKind::Eof {
            break;
        }
        stmts.push(p.parse_stmt()?);
        if !p.consume(TokenKind::Semicolon) {
            p.expect(TokenKind::Eof)?;
            break;
        }
    }
    if stmts.is_empty() {
        return Err(ExprError::new(0, "expected at least one assignment"));
    }
    Ok(stmts)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    filters: &'a FilterRegistry,
}

impl<'a> Parser<'a> {
    fn new(src: &str, filters: &'a FilterRegistry) -> Result<Self, ExprError> {
        Ok(Self {
            tokens: lex(src)?,
            pos: 0,
            depth: 0,
            filters,
        })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), ExprError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Ident(name) => Ok((name, t.span)),
            other => Err(ExprError::new(
                t.span.start,
                format!("expected identifier, found {other:?}"),
            )),
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ExprError> {
        let (name, span) = self.expect_ident()?;

        if self.consume(TokenKind::LParen) {
            let args = self.parse_args()?;
            return Ok(Stmt::Event { name, args });
        }

        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(ExprError::new(
                span.start,
                format!("cannot assign to reserved name '{name}'"),
            ));
        }
        let target = self.parse_address_tail(name)?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_ternary()?;
        Ok(Stmt::Assign { target, value })
    }

    /// Runs `f` one nesting level deeper, failing once the limit is reached.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::new(
                self.span().start,
                format!("expression nested deeper than {MAX_NESTING} levels"),
            ));
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn parse_ternary(&mut self) -> Result<Expr, ExprError> {
        self.nested(Self::parse_ternary_inner)
    }

    fn parse_ternary_inner(&mut self) -> Result<Expr, ExprError> {
        let cond = self.parse_pipe()?;
        if !self.consume(TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.parse_ternary()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.parse_ternary()?;
        Ok(Expr::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_pipe(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_or()?;
        while self.consume(TokenKind::Pipe) {
            let (name, span) = self.expect_ident()?;
            let id = self.resolve_filter(&name, span)?;
            let mut args = vec![e];
            if self.consume(TokenKind::LParen) {
                args.extend(self.parse_args()?);
            }
            e = Expr::Filter { id, args };
        }
        Ok(e)
    }

    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_and()?;
        while self.consume(TokenKind::OrOr) {
            let r = self.parse_and()?;
            e = logical(LogicalOp::Or, e, r);
        }
        Ok(e)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_equality()?;
        while self.consume(TokenKind::AndAnd) {
            let r = self.parse_equality()?;
            e = logical(LogicalOp::And, e, r);
        }
        Ok(e)
    }

    fn parse_equality(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_comparison()?;
        loop {
            let op = if self.consume(TokenKind::EqEq) {
                BinaryOp::Eq
            } else if self.consume(TokenKind::Ne) {
                BinaryOp::Ne
            } else {
                break;
            };
            let r = self.parse_comparison()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_term()?;
        loop {
            let op = if self.consume(TokenKind::Lt) {
                BinaryOp::Lt
            } else if self.consume(TokenKind::Le) {
                BinaryOp::Le
            } else if self.consume(TokenKind::Gt) {
                BinaryOp::Gt
            } else if self.consume(TokenKind::Ge) {
                BinaryOp::Ge
            } else {
                break;
            };
            let r = self.parse_term()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_term(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_factor()?;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let r = self.parse_factor()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_factor(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else {
                break;
            };
            let r = self.parse_unary()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        self.nested(Self::parse_unary_inner)
    }

    fn parse_unary_inner(&mut self) -> Result<Expr, ExprError> {
        if self.consume(TokenKind::Minus) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(e),
            });
        }
        if self.consume(TokenKind::Bang) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(e),
            });
        }
        if self.consume(TokenKind::Plus) {
            return self.parse_unary();
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Lit(Variant::Float(v))),
            TokenKind::Str(s) => Ok(Expr::Lit(Variant::String(s))),
            TokenKind::True => Ok(Expr::Lit(Variant::Bool(true))),
            TokenKind::False => Ok(Expr::Lit(Variant::Bool(false))),
            TokenKind::LParen => {
                let e = self.parse_ternary()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            TokenKind::Ident(name) if self.peek().kind == TokenKind::LParen => {
                // `f(a, b)` is the same as `a | f(b)`.
                let id = self.resolve_filter(&name, t.span)?;
                self.bump();
                let args = self.parse_args()?;
                Ok(Expr::Filter { id, args })
            }
            TokenKind::Ident(name) => Ok(Expr::Var(self.parse_address_tail(name)?)),
            other => Err(ExprError::new(
                t.span.start,
                format!("expected literal, variable, '(' or '!', found {other:?}"),
            )),
        }
    }

    /// Continues `root` with any `.member` and `[index]` accessors.
    fn parse_address_tail(&mut self, root: String) -> Result<DataAddress, ExprError> {
        let mut entries = vec![AddressEntry::Name(root)];
        loop {
            if self.peek().kind == TokenKind::Dot
                && matches!(self.peek_kind_at(1), Some(TokenKind::Ident(_)))
            {
                self.bump();
                let (member, _) = self.expect_ident()?;
                entries.push(AddressEntry::Name(member));
                continue;
            }
            if self.consume(TokenKind::LBracket) {
                let t = self.bump().clone();
                let index = match t.kind {
                    TokenKind::Number(v) if v >= 0.0 && v.fract() == 0.0 => v as usize,
                    other => {
                        return Err(ExprError::new(
                            t.span.start,
                            format!("expected a non-negative integer index, found {other:?}"),
                        ));
                    }
                };
                self.expect(TokenKind::RBracket)?;
                entries.push(AddressEntry::Index(index));
                continue;
            }
            break;
        }
        Ok(DataAddress::from_entries(entries))
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_ternary()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }

    fn resolve_filter(&self, name: &str, span: Span) -> Result<FilterId, ExprError> {
        self.filters
            .get_id(name)
            .ok_or_else(|| ExprError::new(span.start, format!("unknown filter '{name}'")))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/data/expression/parser.rs"]
mod tests;
