use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info};
use sdl2::event::Event;

use emu8_core::{Chip8, Quirks};
use emu8_display::Display;

use crate::cadence::Cadence;
use crate::error::RunError;
use crate::keymap::{hotkey, keymap, Hotkey};

/// How much faster than the configured clocks fast-forward runs
const FAST_FORWARD_FACTOR: u32 = 8;

/// How long the loop sleeps between polls
const IDLE: Duration = Duration::from_millis(1);

/// Everything the control loop needs to know about a session
#[derive(Debug, Clone)]
pub struct Options {
    pub rom: PathBuf,
    pub scale: u32,
    pub cpu_hz: u32,
    pub timer_hz: u32,
    pub seed: Option<u64>,
    pub quirks: Quirks,
    pub strict: bool,
}

pub fn run(options: Options) -> Result<(), RunError> {
    let mut chip8 = match options.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    }
    .with_quirks(options.quirks);

    // Load ROM
    let rom = std::fs::read(&options.rom).map_err(|source| RunError::Rom {
        path: options.rom.clone(),
        source,
    })?;
    chip8.load_rom(&rom)?;
    info!("loaded {} ({} bytes)", options.rom.display(), rom.len());
    info!(
        "running at {} Hz, timers at {} Hz, {:?}",
        options.cpu_hz,
        options.timer_hz,
        chip8.quirks()
    );

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, options.scale)?;
    let mut events = sdl.event_pump()?;

    let start = Instant::now();
    let mut cpu = Cadence::from_hz(options.cpu_hz, start);
    let mut timers = Cadence::from_hz(options.timer_hz, start);

    // Whether or not the configured clock speed should be respected
    let mut fast_forward = false;
    // Whether the game's state should be cycled forwards or backwards
    let mut rewind = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key),
                    ..
                } => match (keymap(key), hotkey(key)) {
                    (Some(kc), _) => chip8.key_press(kc),
                    (_, Some(Hotkey::FastForward)) => fast_forward = true,
                    (_, Some(Hotkey::Rewind)) => rewind = true,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key),
                    ..
                } => match (keymap(key), hotkey(key)) {
                    (Some(kc), _) => chip8.key_release(kc),
                    (_, Some(Hotkey::FastForward)) => fast_forward = false,
                    (_, Some(Hotkey::Rewind)) => rewind = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        let now = Instant::now();
        let factor = if fast_forward { FAST_FORWARD_FACTOR } else { 1 };
        let steps = cpu.due(now) * factor;
        let ticks = timers.due(now) * factor;
        if rewind {
            for _ in 0..steps {
                if !chip8.reverse_cpu() {
                    break;
                }
            }
        } else {
            for _ in 0..steps {
                advance(&mut chip8, options.strict)?;
            }
            for _ in 0..ticks {
                chip8.tick_timers();
            }
        }

        // Handle output
        display.set_buzzer(chip8.sound_active())?;
        if let Some(frame) = chip8.get_frame() {
            display.render(&frame)?;
        }

        std::thread::sleep(IDLE);
    }

    debug!("window closed after {:?}", start.elapsed());
    Ok(())
}

/// Runs one step, deciding whether a fault ends the session
fn advance(chip8: &mut Chip8, strict: bool) -> Result<(), RunError> {
    match chip8.step() {
        Ok(_) => Ok(()),
        Err(fault) if fault.is_fatal() || strict => Err(fault.into()),
        // already reported by the core
        Err(_) => Ok(()),
    }
}
