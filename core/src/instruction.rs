use std::fmt;

use crate::opcode::Opcode;

/// # Instructions
/// The 35 instructions of the base Chip-8 instruction set with their operands already pulled out
/// of the opcode.
///
/// Register operands are always 0..=F, addresses are always 12 bits and sprite heights are always
/// 0..=F, since each is read from a single nibble (or three).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `0nnn` jump to a machine code routine; ignored by interpreters
    Sys { addr: u16 },
    /// `00E0`
    Cls,
    /// `00EE`
    Ret,
    /// `1nnn`
    Jp { addr: u16 },
    /// `2nnn`
    Call { addr: u16 },
    /// `3xkk`
    SeImm { x: u8, kk: u8 },
    /// `4xkk`
    SneImm { x: u8, kk: u8 },
    /// `5xy0`
    SeReg { x: u8, y: u8 },
    /// `6xkk`
    LdImm { x: u8, kk: u8 },
    /// `7xkk`
    AddImm { x: u8, kk: u8 },
    /// `8xy0`
    LdReg { x: u8, y: u8 },
    /// `8xy1`
    Or { x: u8, y: u8 },
    /// `8xy2`
    And { x: u8, y: u8 },
    /// `8xy3`
    Xor { x: u8, y: u8 },
    /// `8xy4`
    AddReg { x: u8, y: u8 },
    /// `8xy5`
    Sub { x: u8, y: u8 },
    /// `8xy6`; `y` only matters with the shift quirk enabled
    Shr { x: u8, y: u8 },
    /// `8xy7`
    Subn { x: u8, y: u8 },
    /// `8xyE`; `y` only matters with the shift quirk enabled
    Shl { x: u8, y: u8 },
    /// `9xy0`
    SneReg { x: u8, y: u8 },
    /// `Annn`
    LdI { addr: u16 },
    /// `Bnnn`
    JpV0 { addr: u16 },
    /// `Cxkk`
    Rnd { x: u8, kk: u8 },
    /// `Dxyn`
    Drw { x: u8, y: u8, n: u8 },
    /// `Ex9E`
    Skp { x: u8 },
    /// `ExA1`
    Sknp { x: u8 },
    /// `Fx07`
    LdVxDt { x: u8 },
    /// `Fx0A`
    LdVxK { x: u8 },
    /// `Fx15`
    LdDtVx { x: u8 },
    /// `Fx18`
    LdStVx { x: u8 },
    /// `Fx1E`
    AddI { x: u8 },
    /// `Fx29`
    LdF { x: u8 },
    /// `Fx33`
    LdB { x: u8 },
    /// `Fx55`
    StoreRegs { x: u8 },
    /// `Fx65`
    LoadRegs { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given opcode, or None if it isn't one
    pub fn decode(op: u16) -> Option<Self> {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jp { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SeImm { x, kk },
            (0x4, ..) => SneImm { x, kk },
            (0x5, .., 0x0) => SeReg { x, y },
            (0x6, ..) => LdImm { x, kk },
            (0x7, ..) => AddImm { x, kk },
            (0x8, .., 0x0) => LdReg { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => Shr { x, y },
            (0x8, .., 0x7) => Subn { x, y },
            (0x8, .., 0xE) => Shl { x, y },
            (0x9, .., 0x0) => SneReg { x, y },
            (0xA, ..) => LdI { addr },
            (0xB, ..) => JpV0 { addr },
            (0xC, ..) => Rnd { x, kk },
            (0xD, ..) => Drw { x, y, n },
            (0xE, .., 0x9, 0xE) => Skp { x },
            (0xE, .., 0xA, 0x1) => Sknp { x },
            (0xF, .., 0x0, 0x7) => LdVxDt { x },
            (0xF, .., 0x0, 0xA) => LdVxK { x },
            (0xF, .., 0x1, 0x5) => LdDtVx { x },
            (0xF, .., 0x1, 0x8) => LdStVx { x },
            (0xF, .., 0x1, 0xE) => AddI { x },
            (0xF, .., 0x2, 0x9) => LdF { x },
            (0xF, .., 0x3, 0x3) => LdB { x },
            (0xF, .., 0x5, 0x5) => StoreRegs { x },
            (0xF, .., 0x6, 0x5) => LoadRegs { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// The canonical opcode for this instruction.
    ///
    /// Shifts keep their `y` nibble, so any decoded word encodes back to itself.
    pub fn opcode(&self) -> u16 {
        use Instruction::*;

        fn xy(family: u16, x: u8, y: u8, n: u16) -> u16 {
            family << 12 | u16::from(x & 0xF) << 8 | u16::from(y & 0xF) << 4 | n
        }
        fn xkk(family: u16, x: u8, kk: u8) -> u16 {
            family << 12 | u16::from(x & 0xF) << 8 | u16::from(kk)
        }
        fn nnn(family: u16, addr: u16) -> u16 {
            family << 12 | (addr & 0x0FFF)
        }

        match *self {
            Sys { addr } => nnn(0x0, addr),
            Cls => 0x00E0,
            Ret => 0x00EE,
            Jp { addr } => nnn(0x1, addr),
            Call { addr } => nnn(0x2, addr),
            SeImm { x, kk } => xkk(0x3, x, kk),
            SneImm { x, kk } => xkk(0x4, x, kk),
            SeReg { x, y } => xy(0x5, x, y, 0x0),
            LdImm { x, kk } => xkk(0x6, x, kk),
            AddImm { x, kk } => xkk(0x7, x, kk),
            LdReg { x, y } => xy(0x8, x, y, 0x0),
            Or { x, y } => xy(0x8, x, y, 0x1),
            And { x, y } => xy(0x8, x, y, 0x2),
            Xor { x, y } => xy(0x8, x, y, 0x3),
            AddReg { x, y } => xy(0x8, x, y, 0x4),
            Sub { x, y } => xy(0x8, x, y, 0x5),
            Shr { x, y } => xy(0x8, x, y, 0x6),
            Subn { x, y } => xy(0x8, x, y, 0x7),
            Shl { x, y } => xy(0x8, x, y, 0xE),
            SneReg { x, y } => xy(0x9, x, y, 0x0),
            LdI { addr } => nnn(0xA, addr),
            JpV0 { addr } => nnn(0xB, addr),
            Rnd { x, kk } => xkk(0xC, x, kk),
            Drw { x, y, n } => xy(0xD, x, y, u16::from(n & 0xF)),
            Skp { x } => xkk(0xE, x, 0x9E),
            Sknp { x } => xkk(0xE, x, 0xA1),
            LdVxDt { x } => xkk(0xF, x, 0x07),
            LdVxK { x } => xkk(0xF, x, 0x0A),
            LdDtVx { x } => xkk(0xF, x, 0x15),
            LdStVx { x } => xkk(0xF, x, 0x18),
            AddI { x } => xkk(0xF, x, 0x1E),
            LdF { x } => xkk(0xF, x, 0x29),
            LdB { x } => xkk(0xF, x, 0x33),
            StoreRegs { x } => xkk(0xF, x, 0x55),
            LoadRegs { x } => xkk(0xF, x, 0x65),
        }
    }
}

/// Conventional assembler mnemonics, e.g. `DRW V0, V1, 5`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SeImm { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SneImm { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdImm { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddImm { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x, .. } => write!(f, "SHR V{:X}", x),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x, .. } => write!(f, "SHL V{:X}", x),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI { addr } => write!(f, "LD I, {:#05X}", addr),
            JpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdVxDt { x } => write!(f, "LD V{:X}, DT", x),
            LdVxK { x } => write!(f, "LD V{:X}, K", x),
            LdDtVx { x } => write!(f, "LD DT, V{:X}", x),
            LdStVx { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdF { x } => write!(f, "LD F, V{:X}", x),
            LdB { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x00E0, Cls)]
    #[case(0x00EE, Ret)]
    #[case(0x0123, Sys { addr: 0x123 })]
    #[case(0x1ABC, Jp { addr: 0xABC })]
    #[case(0x2123, Call { addr: 0x123 })]
    #[case(0x3111, SeImm { x: 0x1, kk: 0x11 })]
    #[case(0x4111, SneImm { x: 0x1, kk: 0x11 })]
    #[case(0x5120, SeReg { x: 0x1, y: 0x2 })]
    #[case(0x6122, LdImm { x: 0x1, kk: 0x22 })]
    #[case(0x7122, AddImm { x: 0x1, kk: 0x22 })]
    #[case(0x8120, LdReg { x: 0x1, y: 0x2 })]
    #[case(0x8121, Or { x: 0x1, y: 0x2 })]
    #[case(0x8122, And { x: 0x1, y: 0x2 })]
    #[case(0x8123, Xor { x: 0x1, y: 0x2 })]
    #[case(0x8124, AddReg { x: 0x1, y: 0x2 })]
    #[case(0x8125, Sub { x: 0x1, y: 0x2 })]
    #[case(0x8106, Shr { x: 0x1, y: 0x0 })]
    #[case(0x8127, Subn { x: 0x1, y: 0x2 })]
    #[case(0x810E, Shl { x: 0x1, y: 0x0 })]
    #[case(0x9120, SneReg { x: 0x1, y: 0x2 })]
    #[case(0xAABC, LdI { addr: 0xABC })]
    #[case(0xBABC, JpV0 { addr: 0xABC })]
    #[case(0xC10F, Rnd { x: 0x1, kk: 0x0F })]
    #[case(0xD015, Drw { x: 0x0, y: 0x1, n: 0x5 })]
    #[case(0xE19E, Skp { x: 0x1 })]
    #[case(0xE1A1, Sknp { x: 0x1 })]
    #[case(0xF107, LdVxDt { x: 0x1 })]
    #[case(0xF10A, LdVxK { x: 0x1 })]
    #[case(0xF115, LdDtVx { x: 0x1 })]
    #[case(0xF118, LdStVx { x: 0x1 })]
    #[case(0xF11E, AddI { x: 0x1 })]
    #[case(0xF129, LdF { x: 0x1 })]
    #[case(0xF133, LdB { x: 0x1 })]
    #[case(0xF455, StoreRegs { x: 0x4 })]
    #[case(0xF465, LoadRegs { x: 0x4 })]
    fn test_decodes(#[case] op: u16, #[case] expected: Instruction) {
        assert_eq!(Instruction::decode(op), Some(expected));
        assert_eq!(expected.opcode(), op);
    }

    #[rstest]
    #[case(0x5121)]
    #[case(0x8128)]
    #[case(0x812F)]
    #[case(0x9121)]
    #[case(0xE100)]
    #[case(0xE19F)]
    #[case(0xF100)]
    #[case(0xF166)]
    #[case(0xFFFF)]
    fn test_unknown_opcodes(#[case] op: u16) {
        assert_eq!(Instruction::decode(op), None);
    }

    #[rstest]
    #[case(0x00E0, "CLS")]
    #[case(0x1228, "JP 0x228")]
    #[case(0x6A02, "LD VA, 0x02")]
    #[case(0x8AB4, "ADD VA, VB")]
    #[case(0x8A06, "SHR VA")]
    #[case(0xA22A, "LD I, 0x22A")]
    #[case(0xD01F, "DRW V0, V1, 15")]
    #[case(0xF30A, "LD V3, K")]
    #[case(0xF255, "LD [I], V2")]
    #[case(0xF265, "LD V2, [I]")]
    fn test_mnemonics(#[case] op: u16, #[case] expected: &str) {
        let instruction = Instruction::decode(op).unwrap();
        assert_eq!(instruction.to_string(), expected);
    }

    proptest! {
        #[test]
        fn prop_decoded_words_encode_back(op in any::<u16>()) {
            if let Some(instruction) = Instruction::decode(op) {
                prop_assert_eq!(instruction.opcode(), op);
            }
        }

        #[test]
        fn prop_families_without_selectors_always_decode(family in 0u16..0x10, rest in 0u16..0x1000) {
            let op = family << 12 | rest;
            if matches!(family, 0x0 | 0x1 | 0x2 | 0x3 | 0x4 | 0x6 | 0x7 | 0xA | 0xB | 0xC | 0xD) {
                prop_assert!(Instruction::decode(op).is_some());
            }
        }
    }
}
