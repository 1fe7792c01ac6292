//! Front-end of an x86-64 AT&T-syntax assembly interpreter: a lexer, a
//! statement parser, and a per-mnemonic instruction validator. The evaluator
//! that executes validated statements lives downstream of this crate.

pub mod constants;
pub mod instruction;
pub mod parse;
pub mod registers;

use std::fmt;

use crate::instruction::validate::{validate, ValidateError};
use crate::parse::lexer::{tokenize, LexError};
use crate::parse::parse::{parse, ParseError, Statement};

#[derive(Debug, PartialEq)]
pub enum FrontEndError {
    Lex(LexError),
    Parse(ParseError),
    Validate(ValidateError),
}

impl fmt::Display for FrontEndError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontEndError::Lex(err) => write!(f, "{}", err),
            FrontEndError::Parse(err) => write!(f, "{}", err),
            FrontEndError::Validate(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FrontEndError {}

impl From<LexError> for FrontEndError {
    fn from(err: LexError) -> Self {
        FrontEndError::Lex(err)
    }
}

impl From<ParseError> for FrontEndError {
    fn from(err: ParseError) -> Self {
        FrontEndError::Parse(err)
    }
}

impl From<ValidateError> for FrontEndError {
    fn from(err: ValidateError) -> Self {
        FrontEndError::Validate(err)
    }
}

/// Run the whole front-end over a source buffer: tokenize, group into
/// statements, and validate each statement. The first error aborts.
pub fn read_program(src: &str) -> Result<Vec<Statement>, FrontEndError> {
    let tokens = tokenize(src)?;
    let statements = parse(&tokens)?;

    for statement in &statements {
        validate(&statement.instruction, &statement.operands)?;
    }

    Ok(statements)
}
