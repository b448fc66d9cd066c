use rand::{Rng, RngCore};

use crate::constants::{FONT_GLYPH_SIZE, FONT_START};
use crate::fault::Fault;
use crate::instruction::Instruction;
use crate::quirks::Quirks;
use crate::state::{Keypad, State};

/// Everything an instruction may look at besides the machine state itself
pub struct Context<'a> {
    pub keys: &'a Keypad,
    pub rng: &'a mut dyn RngCore,
    pub quirks: Quirks,
}

/// Executes a single instruction against a state whose pc has already been moved past it.
///
/// Returns the next state; on a fault the given state is left as it was.
pub fn execute(
    instruction: Instruction,
    state: &State,
    ctx: &mut Context<'_>,
) -> Result<State, Fault> {
    use Instruction::*;

    let next = match instruction {
        Sys { .. } => *state,
        Cls => cls(state),
        Ret => ret(state)?,
        Jp { addr } => jp(state, addr),
        Call { addr } => call(state, addr)?,
        SeImm { x, kk } => skip_if(state, state.register(x) == kk),
        SneImm { x, kk } => skip_if(state, state.register(x) != kk),
        SeReg { x, y } => skip_if(state, state.register(x) == state.register(y)),
        LdImm { x, kk } => ld(state, x, kk),
        AddImm { x, kk } => ld(state, x, state.register(x).wrapping_add(kk)),
        LdReg { x, y } => ld(state, x, state.register(y)),
        Or { x, y } => ld(state, x, state.register(x) | state.register(y)),
        And { x, y } => ld(state, x, state.register(x) & state.register(y)),
        Xor { x, y } => ld(state, x, state.register(x) ^ state.register(y)),
        AddReg { x, y } => add(state, x, y),
        Sub { x, y } => sub(state, x, y),
        Shr { x, y } => shr(state, x, y, ctx.quirks),
        Subn { x, y } => subn(state, x, y),
        Shl { x, y } => shl(state, x, y, ctx.quirks),
        SneReg { x, y } => skip_if(state, state.register(x) != state.register(y)),
        LdI { addr } => State { i: addr, ..*state },
        JpV0 { addr } => jp(state, addr.wrapping_add(u16::from(state.register(0x0)))),
        Rnd { x, kk } => rnd(state, x, kk, ctx.rng),
        Drw { x, y, n } => drw(state, x, y, n),
        Skp { x } => skip_if(state, key_pressed(ctx.keys, state.register(x))),
        Sknp { x } => skip_if(state, !key_pressed(ctx.keys, state.register(x))),
        LdVxDt { x } => ld(state, x, state.timers.delay),
        LdVxK { x } => await_key(state, x, ctx.keys),
        LdDtVx { x } => set_timers(state, Some(state.register(x)), None),
        LdStVx { x } => set_timers(state, None, Some(state.register(x))),
        AddI { x } => State {
            i: state.i.wrapping_add(u16::from(state.register(x))),
            ..*state
        },
        LdF { x } => State {
            i: FONT_START + FONT_GLYPH_SIZE * u16::from(state.register(x)),
            ..*state
        },
        LdB { x } => bcd(state, x),
        StoreRegs { x } => store(state, x),
        LoadRegs { x } => read(state, x),
    };
    Ok(next)
}

/// clear
pub fn cls(state: &State) -> State {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    State {
        frame_buffer,
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop()
pub fn ret(state: &State) -> Result<State, Fault> {
    let mut next = *state;
    next.pc = next.pop()?;
    Ok(next)
}

/// PC = addr
pub fn jp(state: &State, addr: u16) -> State {
    State { pc: addr, ..*state }
}

/// STACK.push(PC); PC = addr
///
/// The pc pushed is the one already moved past the CALL, so RET resumes after it.
pub fn call(state: &State, addr: u16) -> Result<State, Fault> {
    let mut next = *state;
    next.push(state.pc)?;
    next.pc = addr;
    Ok(next)
}

/// if condition then pc += 2
pub fn skip_if(state: &State, condition: bool) -> State {
    if condition {
        State {
            pc: state.pc.wrapping_add(2),
            ..*state
        }
    } else {
        *state
    }
}

/// Vx = value
pub fn ld(state: &State, x: u8, value: u8) -> State {
    let mut next = *state;
    next.set_register(x, value);
    next
}

/// Vx += Vy; VF = carry
pub fn add(state: &State, x: u8, y: u8) -> State {
    let (sum, carry) = state.register(x).overflowing_add(state.register(y));
    let mut next = ld(state, x, sum);
    next.set_flag(carry);
    next
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(state: &State, x: u8, y: u8) -> State {
    let (vx, vy) = (state.register(x), state.register(y));
    let mut next = ld(state, x, vx.wrapping_sub(vy));
    next.set_flag(vx > vy);
    next
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(state: &State, x: u8, y: u8) -> State {
    let (vx, vy) = (state.register(x), state.register(y));
    let mut next = ld(state, x, vy.wrapping_sub(vx));
    next.set_flag(vy > vx);
    next
}

/// The value a shift operates on
fn shift_source(state: &State, x: u8, y: u8, quirks: Quirks) -> u8 {
    if quirks.shift_reads_vy {
        state.register(y)
    } else {
        state.register(x)
    }
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &State, x: u8, y: u8, quirks: Quirks) -> State {
    let source = shift_source(state, x, y, quirks);
    let mut next = ld(state, x, source >> 1);
    next.set_flag(source & 0x1 == 0x1);
    next
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &State, x: u8, y: u8, quirks: Quirks) -> State {
    let source = shift_source(state, x, y, quirks);
    let mut next = ld(state, x, source << 1);
    next.set_flag(source & 0x80 == 0x80);
    next
}

/// Vx = rand_byte & kk
pub fn rnd(state: &State, x: u8, kk: u8, rng: &mut dyn RngCore) -> State {
    let rand_byte: u8 = rng.gen();
    ld(state, x, rand_byte & kk)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the n byte sprite at memory I onto the FrameBuffer at Vx, Vy.
/// Sets VF if any pixels were erased
pub fn drw(state: &State, x: u8, y: u8, n: u8) -> State {
    let sprite = state.read_range(state.i, n as usize);
    let mut next = *state;
    let collided = next
        .frame_buffer
        .draw_sprite(state.register(x), state.register(y), &sprite);
    next.set_flag(collided);
    next.draw_flag = true;
    next
}

/// Keys are numbered 0..F so only the low nibble of a register selects one
fn key_pressed(keys: &Keypad, key: u8) -> bool {
    keys[(key & 0xF) as usize]
}

/// await keypress for Vx
///
/// Takes the lowest numbered key that is down. With nothing down the pc is wound back onto this
/// instruction so it runs again on the next step, and the register is recorded as waiting.
pub fn await_key(state: &State, x: u8, keys: &Keypad) -> State {
    match keys.iter().position(|&pressed| pressed) {
        Some(key) => {
            let mut next = ld(state, x, key as u8);
            next.awaiting_key = None;
            next
        }
        None => State {
            pc: state.pc.wrapping_sub(2),
            awaiting_key: Some(x),
            ..*state
        },
    }
}

/// DT = delay; ST = sound
pub fn set_timers(state: &State, delay: Option<u8>, sound: Option<u8>) -> State {
    let mut timers = state.timers;
    if let Some(delay) = delay {
        timers.delay = delay;
    }
    if let Some(sound) = sound {
        timers.sound = sound;
    }
    State { timers, ..*state }
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(state: &State, x: u8) -> State {
    let vx = state.register(x);
    let mut next = *state;
    for (offset, digit) in [vx / 100, vx / 10 % 10, vx % 10].into_iter().enumerate() {
        next.write(state.i.wrapping_add(offset as u16), digit);
    }
    next
}

/// mem[I..=I+x] = V0..=Vx
pub fn store(state: &State, x: u8) -> State {
    let mut next = *state;
    for register in 0..=x {
        next.write(
            state.i.wrapping_add(u16::from(register)),
            state.register(register),
        );
    }
    next
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &State, x: u8) -> State {
    let mut next = *state;
    for register in 0..=x {
        next.set_register(register, state.read(state.i.wrapping_add(u16::from(register))));
    }
    next
}
