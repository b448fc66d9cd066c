pub use chip8::{Chip8, StepOutcome};
pub use constants::{CPU_HZ, DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, PIXEL_ON, TIMER_HZ};
pub use fault::Fault;
pub use framebuffer::FrameBuffer;
pub use instruction::Instruction;
pub use quirks::Quirks;
pub use state::{Keypad, State};
pub use timers::Timers;

mod chip8;
pub mod constants;
mod fault;
mod framebuffer;
mod instruction;
mod opcode;
mod operations;
mod quirks;
pub mod state;
mod timers;
