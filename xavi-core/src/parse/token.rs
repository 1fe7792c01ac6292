use serde::Serialize;
use std::fmt;

use crate::instruction::information::{Mnemonic, Variant};
use crate::parse::span::SrcSpan;
use crate::registers::Register;

/// The structured fields of an AT&T memory operand.
///
/// At least one of displacement, base, and index is always set; a scale is
/// only ever present alongside an index. The effective address downstream is
/// `displacement + base + index * scale`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryOperand {
    pub displacement: Option<i128>,
    pub base: Option<Register>,
    pub index: Option<Register>,
    pub scale: Option<i128>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    Instruction {
        mnemonic: Mnemonic,
        variant: Option<Variant>,
    },
    Register(Register),
    Immediate(i128),
    Memory(MemoryOperand),
    Comma,
}

/// A lexed token: its kind, its canonical spelling, and where it came from.
///
/// `text` is the canonical form of the token (uppercased names, tightly
/// packed memory operands, `0x`-prefixed uppercase hex), so re-lexing it
/// yields the same kind again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub src_span: SrcSpan,
}

impl Token {
    pub fn is_instruction(&self) -> bool {
        matches!(self.kind, TokenKind::Instruction { .. })
    }

    pub fn is_comma(&self) -> bool {
        matches!(self.kind, TokenKind::Comma)
    }

    pub fn is_memory(&self) -> bool {
        matches!(self.kind, TokenKind::Memory(_))
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self.kind, TokenKind::Immediate(_))
    }

    /// Whether this token can appear in the operand list of a statement.
    pub fn is_operand(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Register(_) | TokenKind::Immediate(_) | TokenKind::Memory(_)
        )
    }

    pub fn register(&self) -> Option<Register> {
        match self.kind {
            TokenKind::Register(register) => Some(register),
            _ => None,
        }
    }

    pub fn memory(&self) -> Option<&MemoryOperand> {
        match &self.kind {
            TokenKind::Memory(operand) => Some(operand),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
