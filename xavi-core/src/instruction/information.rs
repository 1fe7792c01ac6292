use serde::Serialize;
use std::fmt;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::instruction::validate::ValidateResult;
use crate::parse::token::Token;
use crate::registers::SizeClass;

/// Base instruction mnemonics, without size suffixes.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Mnemonic {
    MOV,
    MOVZ,
    MOVS,
    ADD,
    SUB,
    AND,
    OR,
    XOR,
    CMP,
    TEST,
    INC,
    DEC,
    NEG,
    NOT,
    PUSH,
    POP,
    NOP,
}

impl Mnemonic {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Size suffixes a mnemonic may carry.
///
/// `B`/`W`/`L`/`Q` pin the operand width, `ABSQ` marks the 64-bit absolute
/// move, and the two-letter suffixes encode the source and destination widths
/// of the extending moves (`MOVZBL` reads a byte and writes a long).
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumIter, EnumString, IntoStaticStr,
)]
pub enum Variant {
    B,
    W,
    L,
    Q,
    ABSQ,
    BW,
    BL,
    BQ,
    WL,
    WQ,
    LQ,
}

impl Variant {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The operand width this suffix pins, for the single-letter suffixes.
    pub fn operand_size(self) -> Option<SizeClass> {
        match self {
            Variant::B => Some(SizeClass::Byte),
            Variant::W => Some(SizeClass::Word),
            Variant::L => Some(SizeClass::Long),
            Variant::Q => Some(SizeClass::Quad),
            _ => None,
        }
    }

    /// `(source, destination)` widths for the extension suffixes.
    pub fn extension_sizes(self) -> Option<(SizeClass, SizeClass)> {
        match self {
            Variant::BW => Some((SizeClass::Byte, SizeClass::Word)),
            Variant::BL => Some((SizeClass::Byte, SizeClass::Long)),
            Variant::BQ => Some((SizeClass::Byte, SizeClass::Quad)),
            Variant::WL => Some((SizeClass::Word, SizeClass::Long)),
            Variant::WQ => Some((SizeClass::Word, SizeClass::Quad)),
            Variant::LQ => Some((SizeClass::Long, SizeClass::Quad)),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pure predicate over an instruction token and its operand list.
pub type Validator = fn(&Token, &[Token]) -> ValidateResult<()>;

/// The validation schema for one mnemonic.
///
/// The validator searches `INSTRUCTION_TABLE` by mnemonic and then runs the
/// operand-level validators followed by the instruction-level validators, in
/// declared order, stopping at the first failure.
pub struct InstructionInformation {
    pub mnemonic: Mnemonic,
    pub supported_variants: &'static [Variant],
    pub operand_counts: &'static [usize],
    pub operand_validators: &'static [Validator],
    pub instruction_validators: &'static [Validator],
}

impl PartialEq for InstructionInformation {
    fn eq(&self, other: &Self) -> bool {
        self.mnemonic == other.mnemonic
    }
}

impl fmt::Debug for InstructionInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstructionInformation")
            .field("mnemonic", &self.mnemonic)
            .field("supported_variants", &self.supported_variants)
            .field("operand_counts", &self.operand_counts)
            .finish_non_exhaustive()
    }
}
