//! The general-purpose register file, grouped by size class.

use serde::Serialize;
use std::fmt;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Width of a general-purpose register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SizeClass {
    Byte,
    Word,
    Long,
    Quad,
}

impl SizeClass {
    pub fn bits(self) -> u32 {
        match self {
            SizeClass::Byte => 8,
            SizeClass::Word => 16,
            SizeClass::Long => 32,
            SizeClass::Quad => 64,
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Enumeration of the supported general-purpose register set.
///
/// Names match the AT&T spelling without the `%` sigil; parsing is
/// case-insensitive so that `%rax` and `%RAX` resolve to the same register.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Register {
    // 8-bit
    AL,
    BL,
    CL,
    DL,
    SIL,
    DIL,
    BPL,
    SPL,
    R8B,
    R9B,
    R10B,
    R11B,
    R12B,
    R13B,
    R14B,
    R15B,
    AH,
    BH,
    CH,
    DH,
    // 16-bit
    AX,
    BX,
    CX,
    DX,
    SI,
    DI,
    BP,
    SP,
    R8W,
    R9W,
    R10W,
    R11W,
    R12W,
    R13W,
    R14W,
    R15W,
    // 32-bit
    EAX,
    EBX,
    ECX,
    EDX,
    ESI,
    EDI,
    EBP,
    ESP,
    R8D,
    R9D,
    R10D,
    R11D,
    R12D,
    R13D,
    R14D,
    R15D,
    // 64-bit
    RAX,
    RBX,
    RCX,
    RDX,
    RSI,
    RDI,
    RBP,
    RSP,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl Register {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn size_class(self) -> SizeClass {
        use Register::*;
        match self {
            AL | BL | CL | DL | SIL | DIL | BPL | SPL | R8B | R9B | R10B | R11B | R12B | R13B
            | R14B | R15B | AH | BH | CH | DH => SizeClass::Byte,
            AX | BX | CX | DX | SI | DI | BP | SP | R8W | R9W | R10W | R11W | R12W | R13W
            | R14W | R15W => SizeClass::Word,
            EAX | EBX | ECX | EDX | ESI | EDI | EBP | ESP | R8D | R9D | R10D | R11D | R12D
            | R13D | R14D | R15D => SizeClass::Long,
            RAX | RBX | RCX | RDX | RSI | RDI | RBP | RSP | R8 | R9 | R10 | R11 | R12 | R13
            | R14 | R15 => SizeClass::Quad,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SUPPORTED_REGISTERS;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn size_classes() {
        assert_eq!(Register::AL.size_class(), SizeClass::Byte);
        assert_eq!(Register::AH.size_class(), SizeClass::Byte);
        assert_eq!(Register::R10W.size_class(), SizeClass::Word);
        assert_eq!(Register::ESP.size_class(), SizeClass::Long);
        assert_eq!(Register::R15.size_class(), SizeClass::Quad);
        assert_eq!(SizeClass::Quad.bits(), 64);
    }

    #[test]
    fn size_classes_are_ordered_by_width() {
        assert!(SizeClass::Byte < SizeClass::Word);
        assert!(SizeClass::Word < SizeClass::Long);
        assert!(SizeClass::Long < SizeClass::Quad);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(Register::from_str("rax"), Ok(Register::RAX));
        assert_eq!(Register::from_str("Rax"), Ok(Register::RAX));
        assert_eq!(Register::from_str("r8d"), Ok(Register::R8D));
        assert!(Register::from_str("raz").is_err());
    }

    #[test]
    fn catalog_matches_enum() {
        assert_eq!(SUPPORTED_REGISTERS.len(), Register::iter().count());
        for (name, bits) in SUPPORTED_REGISTERS {
            let register = Register::from_str(name).unwrap();
            assert_eq!(register.name(), name);
            assert_eq!(register.size_class().bits(), bits);
        }
    }
}
