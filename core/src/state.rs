use log::debug;

use crate::constants::{
    ADDRESS_MASK, FLAG_REGISTER, FONT_START, KEY_COUNT, MEMORY_SIZE, PROGRAM_START,
    REGISTER_COUNT, SPRITE_SHEET, STACK_SIZE,
};
use crate::fault::Fault;
use crate::framebuffer::FrameBuffer;
use crate::timers::Timers;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of occupied stack slots, 0..=16
///
/// Timers
/// - 2 8-bit timers (delay & sound), ticked from outside at a fixed rate
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory, addresses are masked to 12 bits
/// - 64x32 frame buffer
///
/// ## Input
/// - Emulation is parked while `awaiting_key` holds the register waiting for a key
///
/// Fields are public for the instruction set and for tests, but anything indexed through an
/// opcode-derived value should go through the masking accessors below.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub timers: Timers,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub awaiting_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            timers: Timers::default(),
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            awaiting_key: None,
        }
    }

    /// Vx, with `x` masked to 0..=F
    pub fn register(&self, x: u8) -> u8 {
        self.v[(x & 0xF) as usize]
    }

    /// Vx = value, with `x` masked to 0..=F
    pub fn set_register(&mut self, x: u8, value: u8) {
        self.v[(x & 0xF) as usize] = value;
    }

    /// VF = 1 if `set` else 0
    pub fn set_flag(&mut self, set: bool) {
        self.set_register(FLAG_REGISTER, u8::from(set));
    }

    /// The byte at `address` masked to 12 bits
    pub fn read(&self, address: u16) -> u8 {
        self.memory[(address & ADDRESS_MASK) as usize]
    }

    /// Writes `value` at `address` masked to 12 bits
    ///
    /// The font table is read-only to programs; writes landing in it are dropped.
    pub fn write(&mut self, address: u16, value: u8) {
        let address = address & ADDRESS_MASK;
        if is_font_address(address) {
            debug!("dropped write of {value:#04X} to font table at {address:#05X}");
            return;
        }
        self.memory[address as usize] = value;
    }

    /// Reads `len` bytes starting at `address`, wrapping around the top of memory
    pub fn read_range(&self, address: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|offset| self.read(address.wrapping_add(offset as u16)))
            .collect()
    }

    /// The big-endian word at `address`; both bytes are masked independently
    pub fn read_word(&self, address: u16) -> u16 {
        u16::from_be_bytes([self.read(address), self.read(address.wrapping_add(1))])
    }

    /// Pushes a return address onto the call stack
    pub fn push(&mut self, address: u16) -> Result<(), Fault> {
        let sp = self.sp as usize;
        if sp >= STACK_SIZE {
            return Err(Fault::StackOverflow {
                address: self.pc.wrapping_sub(2),
            });
        }
        self.stack[sp] = address;
        self.sp += 1;
        Ok(())
    }

    /// Pops the most recent return address off the call stack
    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow {
                address: self.pc.wrapping_sub(2),
            });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }
}

/// Whether a masked address falls inside the resident font table
fn is_font_address(address: u16) -> bool {
    (FONT_START..FONT_START + SPRITE_SHEET.len() as u16).contains(&address)
}

/// The pressed status of keys 0..F, indexed by key
pub type Keypad = [bool; KEY_COUNT];

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.sp, 0);
        assert_eq!(state.v, [0; 16]);
        assert_eq!(state.timers, Timers::default());
        assert_eq!(state.memory[0x50..0xA0], SPRITE_SHEET);
        assert!(state.memory[..0x50].iter().all(|&b| b == 0));
        assert!(state.memory[0xA0..].iter().all(|&b| b == 0));
        assert_eq!(state.frame_buffer.lit_count(), 0);
        assert_eq!(state.awaiting_key, None);
    }

    #[test]
    fn test_addresses_are_masked() {
        let mut state = State::new();
        state.write(0x1234, 0xAB);
        assert_eq!(state.memory[0x234], 0xAB);
        assert_eq!(state.read(0xF234), 0xAB);
    }

    #[test]
    fn test_font_table_is_write_protected() {
        let mut state = State::new();
        state.write(0x50, 0x00);
        state.write(0x9F, 0x00);
        // masked into the font table from above
        state.write(0x1050, 0x00);
        assert_eq!(state.memory[0x50..0xA0], SPRITE_SHEET);

        state.write(0x4F, 0xAB);
        state.write(0xA0, 0xCD);
        assert_eq!(state.memory[0x4F], 0xAB);
        assert_eq!(state.memory[0xA0], 0xCD);
    }

    #[test]
    fn test_read_word_wraps_at_top_of_memory() {
        let mut state = State::new();
        state.memory[0xFFF] = 0x12;
        state.memory[0x000] = 0x34;
        assert_eq!(state.read_word(0xFFF), 0x1234);
    }

    #[test]
    fn test_read_range() {
        let state = State::new();
        assert_eq!(state.read_range(0x50, 5), vec![0xF0, 0x90, 0x90, 0x90, 0xF0]);
    }

    #[test]
    fn test_register_index_is_masked() {
        let mut state = State::new();
        state.set_register(0x12, 0x7);
        assert_eq!(state.v[0x2], 0x7);
        assert_eq!(state.register(0xF2), 0x7);
    }

    #[test]
    fn test_set_flag() {
        let mut state = State::new();
        state.set_flag(true);
        assert_eq!(state.v[0xF], 1);
        state.set_flag(false);
        assert_eq!(state.v[0xF], 0);
    }

    #[test]
    fn test_push_pop() {
        let mut state = State::new();
        state.push(0x0ABC).unwrap();
        state.push(0x0DEF).unwrap();
        assert_eq!(state.sp, 2);
        assert_eq!(state.pop(), Ok(0x0DEF));
        assert_eq!(state.pop(), Ok(0x0ABC));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_push_overflow() {
        let mut state = State::new();
        for n in 0..16 {
            state.push(n).unwrap();
        }
        assert!(matches!(state.push(0x300), Err(Fault::StackOverflow { .. })));
        assert_eq!(state.sp, 16);
        assert_eq!(state.stack[15], 15);
    }

    #[test]
    fn test_pop_underflow() {
        let mut state = State::new();
        assert!(matches!(state.pop(), Err(Fault::StackUnderflow { .. })));
        assert_eq!(state.sp, 0);
    }
}
