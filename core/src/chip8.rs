use std::collections::VecDeque;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{KEY_COUNT, MAX_ROM_SIZE, MAX_SAVED_STATES, PROGRAM_START};
use crate::fault::Fault;
use crate::framebuffer::FrameBuffer;
use crate::instruction::Instruction;
use crate::operations::{execute, Context};
use crate::quirks::Quirks;
use crate::state::{Keypad, State};

/// What a successful step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction ran and the program moved on
    Advanced,
    /// The machine is parked on a key wait for `register` and will retry on the next step
    AwaitingKey { register: u8 },
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - `keys` with public interfaces for manipulating them
///  - the random source used by `RND`
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing and reversing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8<R: RngCore = StdRng> {
    state: State,
    previous_states: VecDeque<State>,
    keys: Keypad,
    rng: R,
    quirks: Quirks,
}

impl Chip8<StdRng> {
    /// A machine whose random numbers come from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A machine whose `RND` results are reproducible from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> Chip8<R> {
    pub fn with_rng(rng: R) -> Self {
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::with_capacity(MAX_SAVED_STATES),
            keys: [false; KEY_COUNT],
            rng,
            quirks: Quirks::default(),
        }
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Copies a rom into memory at 0x200
    ///
    /// Roms that would run past the end of memory are rejected before anything is written.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Fault> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Fault::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte rom at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Advances the CPU by a single instruction
    /// - fetches the word at pc and moves pc past it
    /// - decodes and executes it against the current keys
    ///
    /// An unknown opcode keeps the pc advance and nothing else. Any other fault leaves the state
    /// exactly as it was before the step.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        let before = self.state;
        let address = before.pc;
        let op = before.read_word(address);
        let fetched = State {
            pc: address.wrapping_add(2),
            ..before
        };

        let instruction = match Instruction::decode(op) {
            Some(instruction) => instruction,
            None => {
                let fault = Fault::UnknownOpcode {
                    opcode: op,
                    address,
                };
                warn!("{fault}, skipping");
                self.commit(before, fetched);
                return Err(fault);
            }
        };
        trace!("{address:#05X}  {op:04X}  {instruction}");

        let mut ctx = Context {
            keys: &self.keys,
            rng: &mut self.rng,
            quirks: self.quirks,
        };
        let next = execute(instruction, &fetched, &mut ctx)?;
        self.commit(before, next);

        match next.awaiting_key {
            Some(register) => {
                if before.awaiting_key.is_none() {
                    debug!("parked at {address:#05X} waiting for a key into V{register:X}");
                }
                Ok(StepOutcome::AwaitingKey { register })
            }
            None => Ok(StepOutcome::Advanced),
        }
    }

    /// Replaces the current state, remembering the old one unless nothing changed
    fn commit(&mut self, before: State, next: State) {
        if next != before {
            self.save_state(before);
        }
        self.state = next;
    }

    /// Reverses the CPU by a single step if possible
    /// - if there are previous_states, pops the last one and restores it
    pub fn reverse_cpu(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = State {
                    draw_flag: true,
                    ..state
                };
                true
            }
            None => false,
        }
    }

    /// Puts a state in previous_states
    /// - if there are already MAX_SAVED_STATES saved then the oldest is dropped
    fn save_state(&mut self, state: State) {
        if self.previous_states.len() == MAX_SAVED_STATES {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(state);
    }

    /// Decrements the delay and sound timers; call at the timer rate, independent of `step`
    pub fn tick_timers(&mut self) {
        self.state.timers.tick();
    }

    pub fn sound_active(&self) -> bool {
        self.state.timers.sound_active()
    }

    /// Set the pressed status of key; only the low nibble selects the key
    pub fn key_press(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = true;
    }

    /// Unset the pressed status of key; only the low nibble selects the key
    pub fn key_release(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = false;
    }

    /// Replaces the whole keypad at once
    pub fn set_keys(&mut self, keys: Keypad) {
        self.keys = keys;
    }

    pub fn keys(&self) -> &Keypad {
        &self.keys
    }

    /// The current frame, whether or not it changed
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the redraw flag
    pub fn get_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// The number of steps that can currently be rewound
    pub fn history_len(&self) -> usize {
        self.previous_states.len()
    }
}

impl Default for Chip8<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}
