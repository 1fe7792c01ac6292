//! The rule engine that certifies a lexed instruction against its schema,
//! plus the library of reusable validators the schemas are built from.
//!
//! Every validator is a pure predicate over `(instruction, operands)`; the
//! engine runs them in declared order and reports the first violation.

use std::fmt;

use crate::instruction::information::Variant;
use crate::instruction::instruction_set::INSTRUCTION_TABLE;
use crate::parse::token::{Token, TokenKind};
use crate::registers::SizeClass;

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    UnknownInstruction(String),
    UnsupportedVariant {
        instruction: &'static str,
        variant: &'static str,
    },
    WrongOperandCount {
        expected: &'static [usize],
        found: usize,
    },
    MemoryToMemory {
        source: String,
        destination: String,
    },
    ExpectedImmediateSource(String),
    ExpectedRegisterDestination(String),
    RegisterSizeMismatch {
        register: String,
        expected: SizeClass,
    },
    OperandSizeConflict {
        first: String,
        second: String,
    },
    MalformedMemoryOperand(String),
    InvalidScale {
        operand: String,
        scale: i128,
    },
    DisplacementOutOfRange {
        operand: String,
        displacement: i128,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnknownInstruction(text) => {
                write!(f, "unknown instruction \"{}\"", text)
            }
            ErrorKind::UnsupportedVariant {
                instruction,
                variant,
            } => write!(
                f,
                "instruction \"{}\" does not support variant \"{}\"",
                instruction, variant
            ),
            ErrorKind::WrongOperandCount { expected, found } => {
                write!(f, "expected {:?} operands, found {}", expected, found)
            }
            ErrorKind::MemoryToMemory {
                source,
                destination,
            } => write!(
                f,
                "memory-to-memory operands \"{}\" and \"{}\"",
                source, destination
            ),
            ErrorKind::ExpectedImmediateSource(text) => {
                write!(f, "expected an immediate source, found \"{}\"", text)
            }
            ErrorKind::ExpectedRegisterDestination(text) => {
                write!(f, "expected a register destination, found \"{}\"", text)
            }
            ErrorKind::RegisterSizeMismatch { register, expected } => {
                write!(f, "register \"{}\" is not {}", register, expected)
            }
            ErrorKind::OperandSizeConflict { first, second } => write!(
                f,
                "operand size conflict between \"{}\" and \"{}\"",
                first, second
            ),
            ErrorKind::MalformedMemoryOperand(text) => {
                write!(f, "malformed memory operand \"{}\"", text)
            }
            ErrorKind::InvalidScale { operand, scale } => {
                write!(f, "invalid scale {} in \"{}\"", scale, operand)
            }
            ErrorKind::DisplacementOutOfRange {
                operand,
                displacement,
            } => write!(
                f,
                "displacement {} out of range in \"{}\"",
                displacement, operand
            ),
        }
    }
}

pub type ValidateResult<T> = Result<T, ErrorKind>;

/// A validation failure, carrying the instruction token for context.
#[derive(Debug, PartialEq)]
pub struct ValidateError {
    pub instruction: Token,
    pub kind: ErrorKind,
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: \"{}\": {}",
            self.instruction.src_span, self.instruction.text, self.kind
        )
    }
}

impl std::error::Error for ValidateError {}

/// Certify one instruction statement against the schema for its mnemonic.
///
/// Checks run in a fixed order: schema lookup, variant membership, operand
/// count, then the schema's operand-level and instruction-level validators.
/// The first violation wins; later validators never run.
pub fn validate(instruction: &Token, operands: &[Token]) -> Result<(), ValidateError> {
    run_schema(instruction, operands).map_err(|kind| ValidateError {
        instruction: instruction.clone(),
        kind,
    })
}

fn run_schema(instruction: &Token, operands: &[Token]) -> ValidateResult<()> {
    let TokenKind::Instruction { mnemonic, variant } = &instruction.kind else {
        return Err(ErrorKind::UnknownInstruction(instruction.text.clone()));
    };

    let info = INSTRUCTION_TABLE
        .get(mnemonic)
        .ok_or_else(|| ErrorKind::UnknownInstruction(instruction.text.clone()))?;

    if let Some(variant) = variant {
        if !info.supported_variants.contains(variant) {
            return Err(ErrorKind::UnsupportedVariant {
                instruction: mnemonic.name(),
                variant: variant.name(),
            });
        }
    }

    if !info.operand_counts.contains(&operands.len()) {
        return Err(ErrorKind::WrongOperandCount {
            expected: info.operand_counts,
            found: operands.len(),
        });
    }

    for validator in info.operand_validators {
        validator(instruction, operands)?;
    }

    for validator in info.instruction_validators {
        validator(instruction, operands)?;
    }

    Ok(())
}

fn variant_of(instruction: &Token) -> Option<Variant> {
    match instruction.kind {
        TokenKind::Instruction { variant, .. } => variant,
        _ => None,
    }
}

/// The `ABSQ` form moves a 64-bit immediate into a 64-bit register; nothing
/// else is encodable.
pub fn absq_operands(instruction: &Token, operands: &[Token]) -> ValidateResult<()> {
    if variant_of(instruction) != Some(Variant::ABSQ) {
        return Ok(());
    }

    let [source, destination] = operands else {
        return Err(ErrorKind::WrongOperandCount {
            expected: &[2],
            found: operands.len(),
        });
    };

    if !source.is_immediate() {
        return Err(ErrorKind::ExpectedImmediateSource(source.text.clone()));
    }

    match destination.register() {
        None => Err(ErrorKind::ExpectedRegisterDestination(
            destination.text.clone(),
        )),
        Some(register) if register.size_class() != SizeClass::Quad => {
            Err(ErrorKind::RegisterSizeMismatch {
                register: destination.text.clone(),
                expected: SizeClass::Quad,
            })
        }
        Some(_) => Ok(()),
    }
}

/// Extending moves widen: the destination register must match the suffix's
/// destination width, and a register source must match its source width.
pub fn mov_extension_operands(instruction: &Token, operands: &[Token]) -> ValidateResult<()> {
    let Some((source_size, destination_size)) =
        variant_of(instruction).and_then(Variant::extension_sizes)
    else {
        return Ok(());
    };

    let [source, destination] = operands else {
        return Err(ErrorKind::WrongOperandCount {
            expected: &[2],
            found: operands.len(),
        });
    };

    match destination.register() {
        None => {
            return Err(ErrorKind::ExpectedRegisterDestination(
                destination.text.clone(),
            ))
        }
        Some(register) if register.size_class() != destination_size => {
            return Err(ErrorKind::RegisterSizeMismatch {
                register: destination.text.clone(),
                expected: destination_size,
            })
        }
        Some(_) => {}
    }

    if let Some(register) = source.register() {
        if register.size_class() != source_size {
            return Err(ErrorKind::RegisterSizeMismatch {
                register: source.text.clone(),
                expected: source_size,
            });
        }
    }

    Ok(())
}

/// x86-64 has no encoding for moving memory to memory.
pub fn no_memory_to_memory(_instruction: &Token, operands: &[Token]) -> ValidateResult<()> {
    let mut memories = operands.iter().filter(|operand| operand.is_memory());

    if let (Some(first), Some(second)) = (memories.next(), memories.next()) {
        return Err(ErrorKind::MemoryToMemory {
            source: first.text.clone(),
            destination: second.text.clone(),
        });
    }

    Ok(())
}

/// Structural checks on every memory operand: the field combination must be
/// one of the addressable shapes, the scale one of {1, 2, 4, 8}, and the
/// displacement encodable (32-bit signed, or 64-bit for the `ABSQ` form).
pub fn valid_memory_operands(instruction: &Token, operands: &[Token]) -> ValidateResult<()> {
    let absolute = variant_of(instruction) == Some(Variant::ABSQ);

    for operand in operands {
        let Some(memory) = operand.memory() else {
            continue;
        };

        if memory.displacement.is_none() && memory.base.is_none() && memory.index.is_none() {
            return Err(ErrorKind::MalformedMemoryOperand(operand.text.clone()));
        }

        if memory.scale.is_some() && memory.index.is_none() {
            return Err(ErrorKind::MalformedMemoryOperand(operand.text.clone()));
        }

        if let Some(scale) = memory.scale {
            if !matches!(scale, 1 | 2 | 4 | 8) {
                return Err(ErrorKind::InvalidScale {
                    operand: operand.text.clone(),
                    scale,
                });
            }
        }

        if let Some(displacement) = memory.displacement {
            let limit = if absolute {
                i128::from(i64::MIN)..=i128::from(i64::MAX)
            } else {
                i128::from(i32::MIN)..=i128::from(i32::MAX)
            };
            if !limit.contains(&displacement) {
                return Err(ErrorKind::DisplacementOutOfRange {
                    operand: operand.text.clone(),
                    displacement,
                });
            }
        }
    }

    Ok(())
}

/// For the width suffixes every register operand must have exactly the
/// suffix's width; with no suffix at all, the register operands must agree
/// among themselves.
pub fn variant_register_operand_size(
    instruction: &Token,
    operands: &[Token],
) -> ValidateResult<()> {
    let variant = variant_of(instruction);

    if let Some(size) = variant.and_then(Variant::operand_size) {
        for operand in operands {
            if let Some(register) = operand.register() {
                if register.size_class() != size {
                    return Err(ErrorKind::RegisterSizeMismatch {
                        register: operand.text.clone(),
                        expected: size,
                    });
                }
            }
        }
        return Ok(());
    }

    if variant.is_some() {
        // ABSQ and the extension suffixes carry their own size rules.
        return Ok(());
    }

    let mut registers = operands
        .iter()
        .filter_map(|operand| operand.register().map(|register| (operand, register)));

    if let Some((first, first_register)) = registers.next() {
        for (operand, register) in registers {
            if register.size_class() != first_register.size_class() {
                return Err(ErrorKind::OperandSizeConflict {
                    first: first.text.clone(),
                    second: operand.text.clone(),
                });
            }
        }
    }

    Ok(())
}
