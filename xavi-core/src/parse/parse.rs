//! Grouping of the flat token stream into instruction statements.
//!
//! A statement is an instruction token followed by its comma-separated
//! operands, ending at the next instruction token or the end of the stream.

use serde::Serialize;
use std::fmt;

use crate::parse::span::Span;
use crate::parse::token::Token;

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    ExpectedInstruction(String),
    ExpectedOperand(String),
    ExpectedComma(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ExpectedInstruction(text) => {
                write!(f, "expected an instruction, found \"{}\"", text)
            }
            ErrorKind::ExpectedOperand(text) => {
                write!(f, "expected an operand, found \"{}\"", text)
            }
            ErrorKind::ExpectedComma(text) => {
                write!(f, "expected a comma, found \"{}\"", text)
            }
        }
    }
}

pub type ParseError = Span<ErrorKind>;
pub type ParseResult<T> = Result<T, ParseError>;

/// One instruction together with its already-lexed operands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub instruction: Token,
    pub operands: Vec<Token>,
}

/// Group a token stream into statements.
pub fn parse(tokens: &[Token]) -> ParseResult<Vec<Statement>> {
    let mut statements = Vec::new();
    let mut cursor = tokens.iter().peekable();

    while let Some(token) = cursor.next() {
        if !token.is_instruction() {
            return Err(Span::new(
                token.src_span.clone(),
                ErrorKind::ExpectedInstruction(token.text.clone()),
            ));
        }

        let mut operands = Vec::new();
        let mut pending_comma: Option<&Token> = None;

        while let Some(next) = cursor.peek().copied() {
            if next.is_instruction() {
                break;
            }

            if pending_comma.is_none() && !operands.is_empty() {
                if !next.is_comma() {
                    return Err(Span::new(
                        next.src_span.clone(),
                        ErrorKind::ExpectedComma(next.text.clone()),
                    ));
                }
                cursor.next();
                pending_comma = Some(next);
                continue;
            }

            if !next.is_operand() {
                return Err(Span::new(
                    next.src_span.clone(),
                    ErrorKind::ExpectedOperand(next.text.clone()),
                ));
            }

            cursor.next();
            operands.push(next.clone());
            pending_comma = None;
        }

        if let Some(comma) = pending_comma {
            return Err(Span::new(
                comma.src_span.clone(),
                ErrorKind::ExpectedOperand(comma.text.clone()),
            ));
        }

        statements.push(Statement {
            instruction: token.clone(),
            operands,
        });
    }

    Ok(statements)
}
