mod cadence;
mod error;
mod keymap;
mod run;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, LevelFilter};

use emu8_core::{Quirks, CPU_HZ, TIMER_HZ};

use crate::cadence::MAX_HZ;
use crate::run::Options;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// A Chip-8 interpreter.
///
/// Keys 1234/QWER/ASDF/ZXCV are the hex keypad. Hold Space to fast-forward and Escape to rewind.
struct Cli {
    /// The binary ROM file to run
    #[arg(value_name = "ROM")]
    rom: PathBuf,

    /// Window pixels per Chip-8 pixel
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
    scale: u32,

    /// Instructions executed per second
    #[arg(long, default_value_t = CPU_HZ, value_parser = clap::value_parser!(u32).range(1..=MAX_HZ as i64))]
    cpu_hz: u32,

    /// Delay and sound timer decrements per second
    #[arg(long, default_value_t = TIMER_HZ, value_parser = clap::value_parser!(u32).range(1..=MAX_HZ as i64))]
    timer_hz: u32,

    /// Seed for RND, making runs reproducible
    #[arg(long)]
    seed: Option<u64>,

    /// SHR/SHL shift Vy into Vx, as the COSMAC VIP did
    #[arg(long)]
    shift_quirk: bool,

    /// Stop on unknown opcodes as well as fatal faults
    #[arg(long)]
    strict: bool,

    /// Specify up to three times to increase the verbosity of output.
    #[arg(short, long, action = clap::ArgAction::Count, value_parser = clap::value_parser!(u8).range(..=3))]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            rom: self.rom.clone(),
            scale: self.scale,
            cpu_hz: self.cpu_hz,
            timer_hz: self.timer_hz,
            seed: self.seed,
            quirks: if self.shift_quirk {
                Quirks::vip()
            } else {
                Quirks::default()
            },
            strict: self.strict,
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn logging_format(formatter: &mut env_logger::fmt::Formatter, record: &log::Record) -> io::Result<()> {
    let style = formatter.default_level_style(record.level());
    writeln!(formatter, "{:>7}  {}", style.value(record.level()), record.args())
}

/// Logging setup for normal build (not testing).
#[cfg(not(test))]
fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format(logging_format)
        .init();
}

/// Logging setup for testing build (properly captures stdout and ignores
/// multiple invocations).
#[cfg(test)]
fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(logging_format)
        .is_test(true)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match run::run(cli.options()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
