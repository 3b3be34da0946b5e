use crate::{
    ast::{
        BinaryOp, Expr, Literal, LogicalOp, Param, Program, Range, RecordDecl, RoutineDecl, Stmt,
        UnaryOp, VarDecl,
    },
    session::Session,
    token::{Token, TokenType},
    types::{Primitive, Type},
};

/// Parameter and argument lists are capped at this size.
const MAX_ARITY: usize = 69;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    /// Lexeme the parser stopped on; `None` means end of input.
    pub location: Option<String>,
}

impl std::error::Error for ParseError {}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(lexeme) => write!(
                f,
                "[line {}] Error at '{}': {}",
                self.line, lexeme, self.kind
            ),
            None => write!(f, "[line {}] Error at end: {}", self.line, self.kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("Expected {0}.")]
    Expected(&'static str),
    #[error("Expected expression.")]
    ExpectedExpression,
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    #[error("Type or initializer not specified for variable.")]
    MissingTypeOrInitializer,
    #[error("Cannot find type '{0}' in scope.")]
    UnknownType(String),
    #[error("Cannot have more than {MAX_ARITY} parameters.")]
    TooManyParameters,
    #[error("Cannot have more than {MAX_ARITY} arguments.")]
    TooManyArguments,
}

type Parsed<'a, T> = Result<(T, &'a [Token]), ParseError>;

/// Parses a whole token sequence into a program. On an unexpected token the
/// parser records one error and resynchronizes at the next statement-starting
/// keyword, so several independent errors can surface from a single pass.
pub fn parse(session: &Session, tokens: &[Token]) -> Result<Program, Vec<ParseError>> {
    let mut statements = Vec::new();
    let mut errors = Vec::new();
    let mut tokens = tokens;

    while !is_at_end(tokens) {
        match declaration(session, tokens) {
            Ok((statement, rest)) => {
                statements.push(statement);
                tokens = rest;
            }
            Err(error) => {
                errors.push(error);
                tokens = synchronize(tokens);
            }
        }
    }

    if errors.is_empty() {
        Ok(Program(statements))
    } else {
        Err(errors)
    }
}

fn is_at_end(tokens: &[Token]) -> bool {
    matches!(
        tokens.first().map(|t| &t.token_type),
        Some(TokenType::Eof) | None
    )
}

/// Discards tokens until the next statement-starting keyword.
fn synchronize(tokens: &[Token]) -> &[Token] {
    let mut tokens = if tokens.is_empty() {
        tokens
    } else {
        &tokens[1..]
    };

    while let Some(token) = tokens.first() {
        match token.token_type {
            TokenType::Array
            | TokenType::Record
            | TokenType::Routine
            | TokenType::Var
            | TokenType::For
            | TokenType::If
            | TokenType::Type
            | TokenType::While
            | TokenType::Eof => return tokens,
            _ => tokens = &tokens[1..],
        }
    }
    tokens
}

fn declaration<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    match tokens.first().map(|t| &t.token_type) {
        Some(TokenType::Array) => array_declaration(session, &tokens[1..]),
        Some(TokenType::Record) => record_declaration(session, &tokens[1..]),
        Some(TokenType::Routine) => routine_declaration(session, &tokens[1..]),
        Some(TokenType::Type) => type_declaration(session, &tokens[1..]),
        Some(TokenType::Var) => {
            let (decl, tokens) = var_declaration(session, &tokens[1..])?;
            Ok((Stmt::Var(decl), tokens))
        }
        _ => statement(session, tokens),
    }
}

fn array_declaration<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let ((name, line), tokens) = match_identifier(tokens, "array name")?;
    let mut tokens = consume(tokens, &TokenType::LeftBracket, "'[' after array name")?;

    let mut members = Vec::new();
    if !check(tokens, &TokenType::RightBracket) {
        loop {
            let (member, rest) = expression(session, tokens)?;
            members.push(member);
            tokens = rest;
            match tokens.first().map(|t| &t.token_type) {
                Some(TokenType::Comma) => tokens = &tokens[1..],
                _ => break,
            }
        }
    }

    let tokens = consume(tokens, &TokenType::RightBracket, "']' after members")?;
    let tokens = consume(
        tokens,
        &TokenType::Semicolon,
        "';' or newline after array declaration",
    )?;
    Ok((
        Stmt::Array {
            name,
            line,
            members,
        },
        tokens,
    ))
}

fn record_declaration<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let ((name, line), tokens) = match_identifier(tokens, "record name")?;
    let mut tokens = consume(tokens, &TokenType::LeftBrace, "'{' before record body")?;

    let mut fields = Vec::new();
    while !check(tokens, &TokenType::RightBrace) && !is_at_end(tokens) {
        tokens = consume(tokens, &TokenType::Var, "'var' keyword")?;
        let (field, rest) = var_declaration(session, tokens)?;
        fields.push(field);
        tokens = rest;
    }

    let tokens = consume(tokens, &TokenType::RightBrace, "'}' after record body")?;
    let tokens = consume(tokens, &TokenType::End, "'end' after '}'")?;
    Ok((
        Stmt::Record(RecordDecl { name, line, fields }),
        tokens,
    ))
}

fn routine_declaration<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let ((name, line), tokens) = match_identifier(tokens, "routine name")?;
    let mut tokens = consume(tokens, &TokenType::LeftParen, "'(' after routine name")?;

    let mut params = Vec::new();
    if !check(tokens, &TokenType::RightParen) {
        loop {
            if params.len() >= MAX_ARITY {
                return Err(error_at(ParseErrorKind::TooManyParameters, tokens));
            }

            let ((param_name, _), rest) = match_identifier(tokens, "parameter name")?;
            tokens = rest;

            let param_type = if check(tokens, &TokenType::Colon) {
                let (param_type, rest) = parse_type(session, &tokens[1..])?;
                tokens = rest;
                Some(param_type)
            } else {
                None
            };
            params.push(Param {
                name: param_name,
                param_type,
            });

            match tokens.first().map(|t| &t.token_type) {
                Some(TokenType::Comma) => tokens = &tokens[1..],
                _ => break,
            }
        }
    }
    let mut tokens = consume(tokens, &TokenType::RightParen, "')' after parameters")?;

    let return_type = if check(tokens, &TokenType::Colon) {
        let (return_type, rest) = parse_type(session, &tokens[1..])?;
        tokens = rest;
        Some(return_type)
    } else {
        None
    };

    let tokens = consume(tokens, &TokenType::Is, "'is' before routine body")?;
    let (body, tokens) = block(session, tokens)?;
    Ok((
        Stmt::Routine(RoutineDecl {
            name,
            line,
            params,
            return_type,
            body,
        }),
        tokens,
    ))
}

fn type_declaration<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let ((name, _), tokens) = match_identifier(tokens, "identifier after 'type'")?;
    let tokens = consume(tokens, &TokenType::Is, "'is' after identifier")?;
    let (alias_of, tokens) = parse_type(session, tokens)?;
    let tokens = consume(
        tokens,
        &TokenType::Semicolon,
        "';' or newline after type declaration",
    )?;

    // Registered immediately so later annotations in the same parse resolve.
    session.define_alias(name.clone(), alias_of.clone());
    Ok((Stmt::TypeAlias { name, alias_of }, tokens))
}

fn var_declaration<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, VarDecl> {
    let ((name, line), mut tokens) = match_identifier(tokens, "identifier")?;

    let var_type = if check(tokens, &TokenType::Colon) {
        let (var_type, rest) = parse_type(session, &tokens[1..])?;
        tokens = rest;
        Some(var_type)
    } else {
        None
    };

    let initializer = if check(tokens, &TokenType::Is) {
        let (initializer, rest) = expression(session, &tokens[1..])?;
        tokens = rest;
        Some(initializer)
    } else {
        None
    };

    if var_type.is_none() && initializer.is_none() {
        return Err(error_at(ParseErrorKind::MissingTypeOrInitializer, tokens));
    }

    let tokens = consume(
        tokens,
        &TokenType::Semicolon,
        "';' or newline after variable declaration",
    )?;
    Ok((
        VarDecl {
            name,
            line,
            var_type,
            initializer,
        },
        tokens,
    ))
}

fn parse_type<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Type> {
    match tokens.first().map(|t| &t.token_type) {
        Some(TokenType::IntegerType) => Ok((Type::Primitive(Primitive::Integer), &tokens[1..])),
        Some(TokenType::RealType) => Ok((Type::Primitive(Primitive::Real), &tokens[1..])),
        Some(TokenType::Boolean) => Ok((Type::Primitive(Primitive::Boolean), &tokens[1..])),
        Some(TokenType::Identifier(name)) => match session.alias(name) {
            Some(alias_of) => Ok((alias_of, &tokens[1..])),
            None => Err(error_at(ParseErrorKind::UnknownType(name.clone()), tokens)),
        },
        _ => Err(error_at(ParseErrorKind::Expected("type"), tokens)),
    }
}

fn statement<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    match tokens.first().map(|t| &t.token_type) {
        Some(TokenType::For) => for_statement(session, &tokens[1..]),
        Some(TokenType::If) => if_statement(session, &tokens[1..]),
        Some(TokenType::Return) => return_statement(session, tokens[0].line, &tokens[1..]),
        Some(TokenType::While) => while_statement(session, &tokens[1..]),
        Some(TokenType::Print) => print_statement(session, &tokens[1..]),
        Some(TokenType::Loop) => {
            let (statements, tokens) = block(session, &tokens[1..])?;
            Ok((Stmt::Block(statements), tokens))
        }
        _ => expression_statement(session, tokens),
    }
}

fn for_statement<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let ((name, line), tokens) = match_identifier(tokens, "identifier after 'for'")?;
    let mut tokens = consume(tokens, &TokenType::In, "'in' after identifier")?;

    let reverse = check(tokens, &TokenType::Reverse);
    if reverse {
        tokens = &tokens[1..];
    }

    let (from, tokens) = expression(session, tokens)?;
    let tokens = consume(tokens, &TokenType::DotDot, "'..' after initial value of range")?;
    let (to, tokens) = expression(session, tokens)?;
    let (body, tokens) = statement(session, tokens)?;

    Ok((
        Stmt::For {
            name,
            line,
            reverse,
            range: Range { from, to },
            body: Box::new(body),
        },
        tokens,
    ))
}

fn if_statement<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let (condition, tokens) = expression(session, tokens)?;
    let tokens = consume(tokens, &TokenType::Then, "'then' after if condition")?;
    let (then_branch, mut tokens) = statement(session, tokens)?;

    let else_branch = if check(tokens, &TokenType::Else) {
        let (else_branch, rest) = statement(session, &tokens[1..])?;
        tokens = rest;
        Some(Box::new(else_branch))
    } else {
        None
    };

    let tokens = consume(tokens, &TokenType::End, "'end' after body")?;
    Ok((
        Stmt::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
        },
        tokens,
    ))
}

fn return_statement<'a>(session: &Session, line: usize, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let (value, tokens) = if check(tokens, &TokenType::Semicolon) {
        (None, tokens)
    } else {
        let (value, tokens) = expression(session, tokens)?;
        (Some(value), tokens)
    };

    let tokens = consume(tokens, &TokenType::Semicolon, "';' after return value")?;
    Ok((Stmt::Return { line, value }, tokens))
}

fn while_statement<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let (condition, tokens) = expression(session, tokens)?;
    let (body, tokens) = statement(session, tokens)?;
    Ok((
        Stmt::While {
            condition,
            body: Box::new(body),
        },
        tokens,
    ))
}

fn print_statement<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let (value, tokens) = expression(session, tokens)?;
    let tokens = consume(tokens, &TokenType::Semicolon, "';' or newline after value")?;
    Ok((Stmt::Print(value), tokens))
}

fn expression_statement<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Stmt> {
    let (expr, tokens) = expression(session, tokens)?;
    let tokens = consume(tokens, &TokenType::Semicolon, "';' or newline after expression")?;
    Ok((Stmt::Expression(expr), tokens))
}

/// Statements between here and a closing `end`.
fn block<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Vec<Stmt>> {
    let mut statements = Vec::new();
    let mut tokens = tokens;

    while !check(tokens, &TokenType::End) && !is_at_end(tokens) {
        let (statement, rest) = declaration(session, tokens)?;
        statements.push(statement);
        tokens = rest;
    }

    let tokens = consume(tokens, &TokenType::End, "'end' after body")?;
    Ok((statements, tokens))
}

fn expression<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    assignment(session, tokens)
}

fn assignment<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    let (expr, tokens) = logical_or(session, tokens)?;

    if check(tokens, &TokenType::Walrus) {
        return match expr {
            Expr::Variable { name, line } => {
                let (value, rest) = assignment(session, &tokens[1..])?;
                Ok((
                    Expr::Assign {
                        name,
                        line,
                        value: Box::new(value),
                    },
                    rest,
                ))
            }
            _ => Err(error_at(ParseErrorKind::InvalidAssignmentTarget, tokens)),
        };
    }

    Ok((expr, tokens))
}

fn logical<'a>(
    session: &Session,
    next: fn(&Session, &'a [Token]) -> Parsed<'a, Expr>,
    op_token: &TokenType,
    op: LogicalOp,
    tokens: &'a [Token],
) -> Parsed<'a, Expr> {
    let (mut expr, mut tokens) = next(session, tokens)?;

    while check(tokens, op_token) {
        let (right, rest) = next(session, &tokens[1..])?;
        expr = Expr::Logical {
            left: Box::new(expr),
            op,
            right: Box::new(right),
        };
        tokens = rest;
    }

    Ok((expr, tokens))
}

fn logical_or<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    logical(session, logical_and, &TokenType::Or, LogicalOp::Or, tokens)
}

fn logical_and<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    logical(session, logical_xor, &TokenType::And, LogicalOp::And, tokens)
}

fn logical_xor<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    logical(session, equality, &TokenType::Xor, LogicalOp::Xor, tokens)
}

fn binary<'a>(
    session: &Session,
    next: fn(&Session, &'a [Token]) -> Parsed<'a, Expr>,
    operator: fn(&TokenType) -> Option<BinaryOp>,
    tokens: &'a [Token],
) -> Parsed<'a, Expr> {
    let (mut expr, mut tokens) = next(session, tokens)?;

    while let Some(token) = tokens.first() {
        let op = match operator(&token.token_type) {
            Some(op) => op,
            None => break,
        };
        let line = token.line;
        let (right, rest) = next(session, &tokens[1..])?;
        expr = Expr::Binary {
            left: Box::new(expr),
            op,
            line,
            right: Box::new(right),
        };
        tokens = rest;
    }

    Ok((expr, tokens))
}

fn equality<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    binary(
        session,
        comparison,
        |token_type| match token_type {
            TokenType::Equal | TokenType::EqualEqual => Some(BinaryOp::Equal),
            TokenType::SlashEqual => Some(BinaryOp::NotEqual),
            _ => None,
        },
        tokens,
    )
}

fn comparison<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    binary(
        session,
        addition,
        |token_type| match token_type {
            TokenType::Greater => Some(BinaryOp::Greater),
            TokenType::GreaterEqual => Some(BinaryOp::GreaterEqual),
            TokenType::Less => Some(BinaryOp::Less),
            TokenType::LessEqual => Some(BinaryOp::LessEqual),
            _ => None,
        },
        tokens,
    )
}

fn addition<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    binary(
        session,
        multiplication,
        |token_type| match token_type {
            TokenType::Plus => Some(BinaryOp::Add),
            TokenType::Minus => Some(BinaryOp::Subtract),
            _ => None,
        },
        tokens,
    )
}

fn multiplication<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    binary(
        session,
        unary,
        |token_type| match token_type {
            TokenType::Star => Some(BinaryOp::Multiply),
            TokenType::Slash => Some(BinaryOp::Divide),
            TokenType::Percent => Some(BinaryOp::Modulo),
            _ => None,
        },
        tokens,
    )
}

fn unary<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    let (op, line) = match tokens.first() {
        Some(token) => match token.token_type {
            TokenType::Not => (UnaryOp::Not, token.line),
            TokenType::Minus => (UnaryOp::Negate, token.line),
            _ => return call(session, tokens),
        },
        None => return call(session, tokens),
    };

    let (right, rest) = unary(session, &tokens[1..])?;
    Ok((
        Expr::Unary {
            op,
            line,
            right: Box::new(right),
        },
        rest,
    ))
}

/// Postfix operators chained left-associatively: whichever of `(...)`,
/// `.name` or `[n]` appears first after the primary binds first.
fn call<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    let (mut expr, mut tokens) = primary(session, tokens)?;

    loop {
        match tokens.first().map(|t| &t.token_type) {
            Some(TokenType::LeftParen) => {
                let line = tokens[0].line;
                let (arguments, rest) = finish_call(session, &tokens[1..])?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    line,
                    arguments,
                };
                tokens = rest;
            }
            Some(TokenType::Dot) => {
                let ((name, line), rest) = match_identifier(&tokens[1..], "property name after '.'")?;
                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                    line,
                };
                tokens = rest;
            }
            Some(TokenType::LeftBracket) => {
                let (index, line, rest) = match_integer(&tokens[1..], "integer index")?;
                let rest = consume(rest, &TokenType::RightBracket, "enclosing ']' after index")?;
                expr = Expr::GetIndex {
                    array: Box::new(expr),
                    index: index as usize,
                    line,
                };
                tokens = rest;
            }
            _ => break,
        }
    }

    Ok((expr, tokens))
}

fn finish_call<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Vec<Expr>> {
    let mut arguments = Vec::new();
    let mut tokens = tokens;

    if !check(tokens, &TokenType::RightParen) {
        loop {
            if arguments.len() >= MAX_ARITY {
                return Err(error_at(ParseErrorKind::TooManyArguments, tokens));
            }
            let (argument, rest) = expression(session, tokens)?;
            arguments.push(argument);
            tokens = rest;
            match tokens.first().map(|t| &t.token_type) {
                Some(TokenType::Comma) => tokens = &tokens[1..],
                _ => break,
            }
        }
    }

    let tokens = consume(tokens, &TokenType::RightParen, "')' after arguments")?;
    Ok((arguments, tokens))
}

fn primary<'a>(session: &Session, tokens: &'a [Token]) -> Parsed<'a, Expr> {
    let Some(token) = tokens.first() else {
        return Err(error_at(ParseErrorKind::ExpectedExpression, tokens));
    };

    match &token.token_type {
        TokenType::False => Ok((Expr::Literal(Literal::Boolean(false)), &tokens[1..])),
        TokenType::True => Ok((Expr::Literal(Literal::Boolean(true)), &tokens[1..])),
        TokenType::Integer(n) => Ok((Expr::Literal(Literal::Integer(*n)), &tokens[1..])),
        TokenType::Real(n) => Ok((Expr::Literal(Literal::Real(*n)), &tokens[1..])),
        TokenType::Identifier(name) => Ok((
            Expr::Variable {
                name: name.clone(),
                line: token.line,
            },
            &tokens[1..],
        )),
        TokenType::LeftParen => {
            let (expr, rest) = expression(session, &tokens[1..])?;
            let tokens = consume(rest, &TokenType::RightParen, "')' after expression")?;
            Ok((Expr::Grouping(Box::new(expr)), tokens))
        }
        _ => Err(error_at(ParseErrorKind::ExpectedExpression, tokens)),
    }
}

fn check(tokens: &[Token], token_type: &TokenType) -> bool {
    tokens.first().map(|t| &t.token_type) == Some(token_type)
}

fn consume<'a>(
    tokens: &'a [Token],
    token_type: &TokenType,
    what: &'static str,
) -> Result<&'a [Token], ParseError> {
    if check(tokens, token_type) {
        Ok(&tokens[1..])
    } else {
        Err(error_at(ParseErrorKind::Expected(what), tokens))
    }
}

fn match_identifier<'a>(tokens: &'a [Token], what: &'static str) -> Parsed<'a, (String, usize)> {
    match tokens.first() {
        Some(Token {
            token_type: TokenType::Identifier(name),
            line,
            ..
        }) => Ok(((name.clone(), *line), &tokens[1..])),
        _ => Err(error_at(ParseErrorKind::Expected(what), tokens)),
    }
}

fn match_integer<'a>(
    tokens: &'a [Token],
    what: &'static str,
) -> Result<(i32, usize, &'a [Token]), ParseError> {
    match tokens.first() {
        Some(Token {
            token_type: TokenType::Integer(n),
            line,
            ..
        }) => Ok((*n, *line, &tokens[1..])),
        _ => Err(error_at(ParseErrorKind::Expected(what), tokens)),
    }
}

fn error_at(kind: ParseErrorKind, tokens: &[Token]) -> ParseError {
    match tokens.first() {
        Some(token) if token.token_type != TokenType::Eof => ParseError {
            kind,
            line: token.line,
            location: Some(token.lexeme.clone()),
        },
        Some(token) => ParseError {
            kind,
            line: token.line,
            location: None,
        },
        None => ParseError {
            kind,
            line: 0,
            location: None,
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scanner;

    fn parse_source(source: &str) -> Result<Program, Vec<ParseError>> {
        let session = Session::new();
        let (tokens, errors) = scanner::scan(source);
        assert!(errors.is_empty(), "unexpected scan errors: {:?}", errors);
        parse(&session, &tokens)
    }

    #[test]
    fn test_precedence() {
        let program = parse_source("print 1 + 2 * 3 = 7;").unwrap();
        assert_eq!(program.to_string(), "print (= (+ 1 (* 2 3)) 7);\n");
    }

    #[test]
    fn test_postfix_chain_binds_in_source_order() {
        let program = parse_source("a.b[1](2);").unwrap();
        assert_eq!(program.to_string(), "a.b[1](2);\n");
    }

    #[test]
    fn test_var_requires_type_or_initializer() {
        let errors = parse_source("var x;").unwrap_err();
        assert_eq!(errors[0].kind, ParseErrorKind::MissingTypeOrInitializer);
    }

    #[test]
    fn test_resynchronizes_to_next_statement() {
        // Two independent errors from one parse.
        let errors = parse_source("var 1;\nvar y;\nvar ok is 3;").unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errors = parse_source("1 := 2;").unwrap_err();
        assert_eq!(errors[0].kind, ParseErrorKind::InvalidAssignmentTarget);
    }

    #[test]
    fn test_index_must_be_integer_literal() {
        let errors = parse_source("a[b];").unwrap_err();
        assert_eq!(errors[0].kind, ParseErrorKind::Expected("integer index"));
    }

    #[test]
    fn test_type_alias_resolves_in_later_annotation() {
        let program = parse_source("type id is integer;\nvar x : id is 1;").unwrap();
        assert_eq!(program.0.len(), 2);
    }

    #[test]
    fn test_unknown_type_annotation() {
        let errors = parse_source("var x : mystery;").unwrap_err();
        assert_eq!(
            errors[0].kind,
            ParseErrorKind::UnknownType("mystery".to_string())
        );
    }

    #[test]
    fn test_error_reports_line_and_lexeme() {
        let errors = parse_source("print 1\nprint 2;").unwrap_err();
        let rendered = errors[0].to_string();
        assert!(rendered.starts_with("[line 2] Error at 'print'"), "{rendered}");
    }
}
