/// # Opcode fields
///
/// Every instruction is a single big-endian 16-bit word. Which of its nibbles mean what depends
/// on the instruction family, but the slices themselves are always in the same place:
/// ```text
/// F... family      the leading nibble, selects the instruction (or instruction group)
/// .X.. x           a register index Vx, or the last register of V0..=Vx
/// ..Y. y           a second register index Vy
/// ...N n           a sprite height, or the selector within the 0x8 family
/// ..KK kk          an immediate byte, or the selector within the 0x0/0xE/0xF families
/// .NNN nnn         a 12-bit address
/// ```
///
/// Extraction is pure; nothing here knows which instruction the word is.
pub trait Opcode {
    /// All four nibbles, most significant first
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[F___]`
    fn family(&self) -> u8;

    /// `[_X__]`
    fn x(&self) -> u8;

    /// `[__Y_]`
    fn y(&self) -> u8;

    /// `[___N]`
    fn n(&self) -> u8;

    /// `[__KK]`
    fn kk(&self) -> u8;

    /// `[_NNN]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    fn family(&self) -> u8 {
        (self >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self >> 8) & 0xF) as u8
    }

    fn y(&self) -> u8 {
        ((self >> 4) & 0xF) as u8
    }

    fn n(&self) -> u8 {
        (self & 0xF) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0xFF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fields() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
        assert_eq!(op.family(), 0xA);
        assert_eq!(op.x(), 0xB);
        assert_eq!(op.y(), 0xC);
        assert_eq!(op.n(), 0xD);
        assert_eq!(op.kk(), 0xCD);
        assert_eq!(op.nnn(), 0xBCD);
    }

    proptest! {
        #[test]
        fn prop_fields_reassemble(op in any::<u16>()) {
            let (f, x, y, n) = op.nibbles();
            let rebuilt = u16::from(f) << 12 | u16::from(x) << 8 | u16::from(y) << 4 | u16::from(n);
            prop_assert_eq!(rebuilt, op);
            prop_assert_eq!(u16::from(op.family()) << 12 | op.nnn(), op);
            prop_assert_eq!(u16::from(op.x()) << 8 | u16::from(op.kk()), op.nnn());
        }
    }
}
