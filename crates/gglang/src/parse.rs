//! Recursive-descent parser producing the AST the evaluator consumes.
//!
//! Operator precedence, loosest to tightest: `|>` assignment pipe, `-->`/`~~>`
//! pipes, `?:` ternary, comparisons, `+`/`-`, `*`/`/`, unary `-`/`&`, then
//! postfix calls, property access, and indexing.
//!
//! Pipe steps parse below the ternary level so that `?` after a step is a
//! conditional modifier; a ternary step needs parentheses. A step that is a
//! bare identifier (other than the placeholder `_`) desugars to a call with
//! the placeholder as its argument, so `3 --> double ×3` applies `double`
//! three times.

use std::rc::Rc;

use thiserror::Error;

use crate::{
    ast::{
        BinOpKind, Block, Expr, FuncDecl, KeyValuePair, Modifier, Param, PipeOp, Program, Stmt,
        TypeName,
    },
    lexer::{SpannedToken, Token, lex, line_of, unescape},
};

/// Errors produced while lexing or parsing GGLang source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: unrecognized token near {text:?}")]
    UnrecognizedToken { line: usize, text: String },
    #[error("line {line}: unexpected {found:?}, expected {expected}")]
    UnexpectedToken {
        line: usize,
        found: String,
        expected: String,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("line {line}: integer literal out of range")]
    IntegerOutOfRange { line: usize },
    #[error("line {line}: invalid assignment target")]
    InvalidAssignmentTarget { line: usize },
}

/// Parses a complete program.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    parser.parse_program()
}

/// Parses a single expression, used for the `#{...}` parts of interpolated
/// strings.
fn parse_expression_str(source: &str) -> Result<Expr, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_expression()?;
    if parser.peek().is_some() {
        return Err(parser.error_here("end of interpolated expression"));
    }
    Ok(expr)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|t| t.token)
    }

    fn peek_at(&self, offset: usize) -> Option<Token> {
        self.tokens.get(self.pos + offset).map(|t| t.token)
    }

    fn advance(&mut self) -> Option<SpannedToken<'a>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<SpannedToken<'a>, ParseError> {
        if self.check(token) {
            Ok(self.advance().expect("token was just peeked"))
        } else {
            Err(self.error_here(expected))
        }
    }

    fn error_here(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(token) => ParseError::UnexpectedToken {
                line: line_of(self.source, token.span.start),
                found: token.text.to_owned(),
                expected: expected.to_owned(),
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_owned(),
            },
        }
    }

    fn current_line(&self) -> usize {
        match self.tokens.get(self.pos.min(self.tokens.len().saturating_sub(1))) {
            Some(token) => line_of(self.source, token.span.start),
            None => line_of(self.source, self.source.len()),
        }
    }

    fn expect_name(&mut self, expected: &str) -> Result<String, ParseError> {
        Ok(self.expect(Token::Name, expected)?.text.to_owned())
    }

    fn parse_type(&mut self) -> Result<TypeName, ParseError> {
        Ok(TypeName::new(self.expect_name("a type name")?))
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while self.peek().is_some() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let stmt = match self.peek() {
            Some(Token::Var) => self.parse_var_decl()?,
            Some(Token::Const) => self.parse_const_decl()?,
            Some(Token::Fn) => Stmt::FuncDecl(self.parse_func_decl()?),
            Some(Token::Class) => self.parse_class_decl()?,
            Some(Token::For) => self.parse_for_loop()?,
            Some(Token::Try) => self.parse_try_catch()?,
            Some(Token::Return) => self.parse_return()?,
            Some(Token::At) if self.peek_at(2) == Some(Token::Colon) => {
                self.parse_instance_var_decl()?
            }
            _ => self.parse_expression_statement()?,
        };
        while self.eat(Token::Semi) {}
        Ok(stmt)
    }

    /// `var name (: type)? (= expr)?`
    fn parse_var_decl(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Var, "'var'")?;
        let name = self.expect_name("a variable name")?;
        let var_type = if self.eat(Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let value = if self.eat(Token::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Stmt::VarDecl {
            name,
            var_type,
            value,
        })
    }

    /// `const name = expr` or, inside methods, `const @name = expr`.
    fn parse_const_decl(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Const, "'const'")?;
        if self.eat(Token::At) {
            let name = self.expect_name("an instance variable name")?;
            self.expect(Token::Assign, "'='")?;
            let value = self.parse_expression()?;
            return Ok(Stmt::InstanceConstDecl { name, value });
        }
        let name = self.expect_name("a constant name")?;
        self.expect(Token::Assign, "'='")?;
        let value = self.parse_expression()?;
        Ok(Stmt::ConstDecl { name, value })
    }

    /// `@name: type (= expr)?`
    fn parse_instance_var_decl(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::At, "'@'")?;
        let name = self.expect_name("an instance variable name")?;
        self.expect(Token::Colon, "':'")?;
        let var_type = self.parse_type()?;
        let value = if self.eat(Token::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Stmt::InstanceVarDecl {
            name,
            var_type: Some(var_type),
            value,
        })
    }

    /// `fn name(params) (: type)? { body }`
    fn parse_func_decl(&mut self) -> Result<Rc<FuncDecl>, ParseError> {
        self.expect(Token::Fn, "'fn'")?;
        let name = self.expect_name("a function name")?;
        self.expect(Token::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(Token::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.eat(Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "')'")?;
        let return_type = if self.eat(Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Rc::new(FuncDecl {
            name,
            params,
            return_type,
            body,
        }))
    }

    /// `name: type` or `name: ref type`.
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let name = self.expect_name("a parameter name")?;
        self.expect(Token::Colon, "':'")?;
        let is_ref = self.eat(Token::Ref);
        let param_type = self.parse_type()?;
        Ok(Param {
            name,
            param_type,
            is_ref,
        })
    }

    /// `class Name (( Super ))? { fn ... }` — the body holds only methods.
    fn parse_class_decl(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Class, "'class'")?;
        let name = self.expect_name("a class name")?;
        let superclass = if self.eat(Token::LParen) {
            let superclass = self.expect_name("a superclass name")?;
            self.expect(Token::RParen, "')'")?;
            Some(superclass)
        } else {
            None
        };
        self.expect(Token::LBrace, "'{'")?;
        let mut methods = Vec::new();
        while !self.check(Token::RBrace) {
            if self.peek().is_none() {
                return Err(self.error_here("'}' closing the class body"));
            }
            methods.push(self.parse_func_decl()?);
            while self.eat(Token::Semi) {}
        }
        self.expect(Token::RBrace, "'}'")?;
        Ok(Stmt::ClassDecl {
            name,
            superclass,
            methods,
        })
    }

    fn parse_for_loop(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::For, "'for'")?;
        let variable = self.expect_name("a loop variable")?;
        self.expect(Token::In, "'in'")?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Stmt::ForLoop {
            variable,
            iterable,
            body,
        })
    }

    fn parse_try_catch(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Try, "'try'")?;
        let try_block = self.parse_block()?;
        self.expect(Token::Catch, "'catch'")?;
        self.expect(Token::LParen, "'('")?;
        let exception_var = self.expect_name("an exception variable")?;
        self.expect(Token::RParen, "')'")?;
        let catch_block = self.parse_block()?;
        Ok(Stmt::TryCatch {
            try_block,
            exception_var,
            catch_block,
        })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Return, "'return'")?;
        let value = match self.peek() {
            None | Some(Token::Semi | Token::RBrace) => None,
            _ => Some(self.parse_expression()?),
        };
        Ok(Stmt::Return { value })
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check(Token::RBrace) {
            if self.peek().is_none() {
                return Err(self.error_here("'}' closing the block"));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(Token::RBrace, "'}'")?;
        Ok(Block { statements })
    }

    /// An expression statement, possibly continued into an assignment or a
    /// compound assignment once the target has been parsed.
    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;
        let compound_op = match self.peek() {
            Some(Token::PlusEq) => Some(BinOpKind::Add),
            Some(Token::MinusEq) => Some(BinOpKind::Sub),
            Some(Token::StarEq) => Some(BinOpKind::Mul),
            Some(Token::SlashEq) => Some(BinOpKind::Div),
            _ => None,
        };
        if let Some(op) = compound_op {
            self.advance();
            self.check_assignment_target(&expr)?;
            let value = self.parse_expression()?;
            return Ok(Stmt::CompoundAssignment {
                target: expr,
                op,
                value,
            });
        }
        if self.eat(Token::Assign) {
            self.check_assignment_target(&expr)?;
            let value = self.parse_expression()?;
            return Ok(Stmt::Assignment {
                target: expr,
                value,
            });
        }
        Ok(Stmt::Expr(expr))
    }

    fn check_assignment_target(&self, target: &Expr) -> Result<(), ParseError> {
        match target {
            Expr::Variable(_)
            | Expr::InstanceVar(_)
            | Expr::PropertyAccess { .. }
            | Expr::ArrayAccess { .. } => Ok(()),
            _ => Err(ParseError::InvalidAssignmentTarget {
                line: self.current_line(),
            }),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let value = self.parse_pipe()?;
        if self.eat(Token::AssignPipe) {
            let target = self.expect_name("an assignment pipe target")?;
            let var_type = if self.eat(Token::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            return Ok(Expr::AssignmentPipe {
                value: Box::new(value),
                target,
                var_type,
            });
        }
        Ok(value)
    }

    fn parse_pipe(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_ternary()?;
        loop {
            let op = match self.peek() {
                Some(Token::PipeArrow) => PipeOp::Plain,
                Some(Token::CoercePipeArrow) => PipeOp::Coerce,
                _ => break,
            };
            self.advance();
            let right = self.parse_pipe_step()?;
            left = Expr::Pipe {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// One right-hand pipe segment: a typed target, or a step expression with
    /// optional `×N` / `?cond` modifiers.
    fn parse_pipe_step(&mut self) -> Result<Expr, ParseError> {
        if self.check(Token::Name)
            && self.peek_at(1) == Some(Token::Colon)
            && self.peek_at(2) == Some(Token::Name)
        {
            let name = self.expect_name("a pipe target name")?;
            self.expect(Token::Colon, "':'")?;
            let var_type = self.parse_type()?;
            return Ok(Expr::TypedPipeTarget { name, var_type });
        }

        let expr = self.parse_comparison()?;
        let expr = desugar_bare_step(expr);
        let mut modifiers = Vec::new();
        loop {
            if self.eat(Token::Cross) {
                let token = self.expect(Token::Int, "a repetition count")?;
                let line = line_of(self.source, token.span.start);
                let count = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParseError::IntegerOutOfRange { line })?;
                modifiers.push(Modifier::Repetition(count));
            } else if self.eat(Token::Question) {
                let condition = self.parse_comparison()?;
                modifiers.push(Modifier::Conditional(condition));
            } else {
                break;
            }
        }
        if modifiers.is_empty() {
            Ok(expr)
        } else {
            Ok(Expr::ModifiedExpression {
                expression: Box::new(expr),
                modifiers,
            })
        }
    }

    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_comparison()?;
        if !self.eat(Token::Question) {
            return Ok(condition);
        }
        let then_branch = self.parse_ternary()?;
        self.expect(Token::Colon, "':'")?;
        let else_branch = self.parse_ternary()?;
        Ok(Expr::Ternary {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinOpKind::Eq,
                Some(Token::BangEq) => BinOpKind::Ne,
                Some(Token::Greater) => BinOpKind::Gt,
                Some(Token::Less) => BinOpKind::Lt,
                Some(Token::GreaterEq) => BinOpKind::Ge,
                Some(Token::LessEq) => BinOpKind::Le,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOpKind::Add,
                Some(Token::Minus) => BinOpKind::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOpKind::Mul,
                Some(Token::Slash) => BinOpKind::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(Token::Minus) {
            // Negation desugars to subtraction from zero; the node set has no
            // unary operator.
            let operand = self.parse_unary()?;
            return Ok(match operand {
                Expr::Integer(i) => Expr::Integer(-i),
                Expr::Float(f) => Expr::Float(-f),
                other => Expr::BinOp {
                    left: Box::new(Expr::Integer(0)),
                    op: BinOpKind::Sub,
                    right: Box::new(other),
                },
            });
        }
        if self.eat(Token::Amp) {
            let value = self.parse_unary()?;
            return Ok(Expr::CreateReference(Box::new(value)));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(Token::LParen) {
                let mut args = Vec::new();
                if !self.check(Token::RParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.eat(Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Token::RParen, "')'")?;
                expr = match expr {
                    Expr::PropertyAccess { object, name } => Expr::MethodCall {
                        object,
                        name,
                        args,
                    },
                    callee => Expr::Call {
                        callee: Box::new(callee),
                        args,
                    },
                };
            } else if self.eat(Token::Dot) {
                let name = self.expect_name("a property name")?;
                expr = Expr::PropertyAccess {
                    object: Box::new(expr),
                    name,
                };
            } else if self.eat(Token::LBracket) {
                let index = self.parse_expression()?;
                self.expect(Token::RBracket, "']'")?;
                expr = Expr::ArrayAccess {
                    array: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::Int) => {
                let token = self.advance().expect("token was just peeked");
                let line = line_of(self.source, token.span.start);
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParseError::IntegerOutOfRange { line })?;
                Ok(Expr::Integer(value))
            }
            Some(Token::Float) => {
                let token = self.advance().expect("token was just peeked");
                let value = token.text.parse::<f64>().expect("lexed float literal");
                Ok(Expr::Float(value))
            }
            Some(Token::Str) => {
                let token = self.advance().expect("token was just peeked");
                let body = &token.text[1..token.text.len() - 1];
                Ok(Expr::Str(unescape(body)))
            }
            Some(Token::InterpStr) => {
                let token = self.advance().expect("token was just peeked");
                let body = token.text[2..token.text.len() - 1].to_owned();
                parse_interpolated(&body)
            }
            Some(Token::Name) => {
                let token = self.advance().expect("token was just peeked");
                Ok(Expr::Variable(token.text.to_owned()))
            }
            Some(Token::At) => {
                self.advance();
                let name = self.expect_name("an instance variable name")?;
                Ok(Expr::InstanceVar(name))
            }
            Some(Token::Super) => {
                self.advance();
                Ok(Expr::Super)
            }
            Some(Token::LParen) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen, "')'")?;
                Ok(expr)
            }
            Some(Token::LBracket) => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(Token::RBracket) {
                    loop {
                        elements.push(self.parse_expression()?);
                        if !self.eat(Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Token::RBracket, "']'")?;
                Ok(Expr::ArrayLiteral(elements))
            }
            Some(Token::LBrace) => {
                self.advance();
                let mut pairs = Vec::new();
                if !self.check(Token::RBrace) {
                    loop {
                        let key = self.parse_expression()?;
                        self.expect(Token::Colon, "':'")?;
                        let value = self.parse_expression()?;
                        pairs.push(KeyValuePair { key, value });
                        if !self.eat(Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Token::RBrace, "'}'")?;
                Ok(Expr::Dictionary(pairs))
            }
            _ => Err(self.error_here("an expression")),
        }
    }
}

/// A pipe step that is a bare identifier (other than the placeholder itself)
/// means "apply this to the piped value": it becomes a call with `_` as the
/// argument.
fn desugar_bare_step(expr: Expr) -> Expr {
    match expr {
        Expr::Variable(name) if name != "_" => Expr::Call {
            callee: Box::new(Expr::Variable(name)),
            args: vec![Expr::Variable("_".to_owned())],
        },
        other => other,
    }
}

/// Splits an `i"..."` body into literal and `#{expr}` parts, parsing each
/// expression fragment with the ordinary expression grammar.
fn parse_interpolated(body: &str) -> Result<Expr, ParseError> {
    let mut parts = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find("#{") {
        if start > 0 {
            parts.push(Expr::Str(unescape(&rest[..start])));
        }
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ParseError::UnexpectedEof {
                expected: "'}' closing the interpolated expression".to_owned(),
            });
        };
        parts.push(parse_expression_str(&after[..end])?);
        rest = &after[end + 1..];
    }
    if !rest.is_empty() {
        parts.push(Expr::Str(unescape(rest)));
    }
    Ok(Expr::InterpolatedString(parts))
}
