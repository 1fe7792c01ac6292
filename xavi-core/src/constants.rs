//! Read-only catalogs of everything the front-end understands.
//!
//! The enums in `registers` and `instruction::information` are the canonical
//! in-memory representation; these string tables are the published surface
//! for callers that want to display or enumerate the supported sets without
//! touching the enums. Tests assert the two stay in sync.

/// Base mnemonics, without size suffixes.
pub const SUPPORTED_INSTRUCTIONS: [&str; 17] = [
    "MOV", "MOVZ", "MOVS", "ADD", "SUB", "AND", "OR", "XOR", "CMP", "TEST", "INC", "DEC", "NEG",
    "NOT", "PUSH", "POP", "NOP",
];

/// Every size suffix some mnemonic accepts. `B`/`W`/`L`/`Q` denote operand
/// width, `ABSQ` the 64-bit absolute move, and the two-letter suffixes the
/// source/destination widths of the extending moves.
pub const SUPPORTED_VARIANTS: [&str; 11] = [
    "B", "W", "L", "Q", "ABSQ", "BW", "BL", "BQ", "WL", "WQ", "LQ",
];

/// General-purpose registers with their width in bits, grouped by size class.
pub const SUPPORTED_REGISTERS: [(&str, u32); 68] = [
    // 8-bit
    ("AL", 8),
    ("BL", 8),
    ("CL", 8),
    ("DL", 8),
    ("SIL", 8),
    ("DIL", 8),
    ("BPL", 8),
    ("SPL", 8),
    ("R8B", 8),
    ("R9B", 8),
    ("R10B", 8),
    ("R11B", 8),
    ("R12B", 8),
    ("R13B", 8),
    ("R14B", 8),
    ("R15B", 8),
    ("AH", 8),
    ("BH", 8),
    ("CH", 8),
    ("DH", 8),
    // 16-bit
    ("AX", 16),
    ("BX", 16),
    ("CX", 16),
    ("DX", 16),
    ("SI", 16),
    ("DI", 16),
    ("BP", 16),
    ("SP", 16),
    ("R8W", 16),
    ("R9W", 16),
    ("R10W", 16),
    ("R11W", 16),
    ("R12W", 16),
    ("R13W", 16),
    ("R14W", 16),
    ("R15W", 16),
    // 32-bit
    ("EAX", 32),
    ("EBX", 32),
    ("ECX", 32),
    ("EDX", 32),
    ("ESI", 32),
    ("EDI", 32),
    ("EBP", 32),
    ("ESP", 32),
    ("R8D", 32),
    ("R9D", 32),
    ("R10D", 32),
    ("R11D", 32),
    ("R12D", 32),
    ("R13D", 32),
    ("R14D", 32),
    ("R15D", 32),
    // 64-bit
    ("RAX", 64),
    ("RBX", 64),
    ("RCX", 64),
    ("RDX", 64),
    ("RSI", 64),
    ("RDI", 64),
    ("RBP", 64),
    ("RSP", 64),
    ("R8", 64),
    ("R9", 64),
    ("R10", 64),
    ("R11", 64),
    ("R12", 64),
    ("R13", 64),
    ("R14", 64),
    ("R15", 64),
];
