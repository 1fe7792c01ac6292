//! The supported instruction set and its lookup table.
//!
//! One `InstructionInformation` entry per mnemonic. The catalog deliberately
//! covers only what the evaluator executes: data movement and the ALU
//! operations a label-free program can reach. Control flow needs symbols,
//! which the front-end does not model.

use std::{collections::HashMap, sync::LazyLock};

use crate::instruction::information::{InstructionInformation, Mnemonic, Variant};
use crate::instruction::validate::{
    absq_operands, mov_extension_operands, no_memory_to_memory, valid_memory_operands,
    variant_register_operand_size,
};

const WIDTH_VARIANTS: &[Variant] = &[Variant::B, Variant::W, Variant::L, Variant::Q];

const EXTENSION_VARIANTS: &[Variant] = &[
    Variant::BW,
    Variant::BL,
    Variant::BQ,
    Variant::WL,
    Variant::WQ,
];

macro_rules! two_operand_alu {
    ($mnemonic:ident) => {
        InstructionInformation {
            mnemonic: Mnemonic::$mnemonic,
            supported_variants: WIDTH_VARIANTS,
            operand_counts: &[2],
            operand_validators: &[valid_memory_operands, variant_register_operand_size],
            instruction_validators: &[no_memory_to_memory],
        }
    };
}

macro_rules! one_operand_alu {
    ($mnemonic:ident) => {
        InstructionInformation {
            mnemonic: Mnemonic::$mnemonic,
            supported_variants: WIDTH_VARIANTS,
            operand_counts: &[1],
            operand_validators: &[valid_memory_operands, variant_register_operand_size],
            instruction_validators: &[],
        }
    };
}

pub static INSTRUCTION_SET: &[InstructionInformation] = &[
    InstructionInformation {
        mnemonic: Mnemonic::MOV,
        supported_variants: &[
            Variant::B,
            Variant::W,
            Variant::L,
            Variant::Q,
            Variant::ABSQ,
        ],
        operand_counts: &[2],
        operand_validators: &[valid_memory_operands, variant_register_operand_size],
        instruction_validators: &[absq_operands, no_memory_to_memory],
    },
    InstructionInformation {
        mnemonic: Mnemonic::MOVZ,
        supported_variants: EXTENSION_VARIANTS,
        operand_counts: &[2],
        operand_validators: &[valid_memory_operands],
        instruction_validators: &[mov_extension_operands, no_memory_to_memory],
    },
    InstructionInformation {
        mnemonic: Mnemonic::MOVS,
        supported_variants: &[
            Variant::BW,
            Variant::BL,
            Variant::BQ,
            Variant::WL,
            Variant::WQ,
            Variant::LQ,
        ],
        operand_counts: &[2],
        operand_validators: &[valid_memory_operands],
        instruction_validators: &[mov_extension_operands, no_memory_to_memory],
    },
    two_operand_alu!(ADD),
    two_operand_alu!(SUB),
    two_operand_alu!(AND),
    two_operand_alu!(OR),
    two_operand_alu!(XOR),
    two_operand_alu!(CMP),
    two_operand_alu!(TEST),
    one_operand_alu!(INC),
    one_operand_alu!(DEC),
    one_operand_alu!(NEG),
    one_operand_alu!(NOT),
    InstructionInformation {
        mnemonic: Mnemonic::PUSH,
        supported_variants: &[Variant::W, Variant::Q],
        operand_counts: &[1],
        operand_validators: &[valid_memory_operands, variant_register_operand_size],
        instruction_validators: &[],
    },
    InstructionInformation {
        mnemonic: Mnemonic::POP,
        supported_variants: &[Variant::W, Variant::Q],
        operand_counts: &[1],
        operand_validators: &[valid_memory_operands, variant_register_operand_size],
        instruction_validators: &[],
    },
    InstructionInformation {
        mnemonic: Mnemonic::NOP,
        supported_variants: &[],
        operand_counts: &[0],
        operand_validators: &[],
        instruction_validators: &[],
    },
];

// Construct the instruction table for looking up schemas by mnemonic.
pub static INSTRUCTION_TABLE: LazyLock<HashMap<Mnemonic, &'static InstructionInformation>> =
    LazyLock::new(|| {
        let mut map = HashMap::new();

        for info in INSTRUCTION_SET {
            map.insert(info.mnemonic, info);
        }

        map
    });
