use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use emu8_core::constants::PROGRAM_START;
use emu8_core::Instruction;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// A Chip-8 disassembler.
struct Cli {
    /// The binary ROM file to disassemble
    #[arg(value_name = "ROM")]
    rom: PathBuf,
}

/// One listing line per big-endian word, addressed as if loaded at 0x200
fn disassemble(rom: &[u8], out: &mut impl Write) -> io::Result<()> {
    for (index, chunk) in rom.chunks(2).enumerate() {
        let address = PROGRAM_START as usize + index * 2;
        match *chunk {
            [hi, lo] => {
                let word = u16::from_be_bytes([hi, lo]);
                match Instruction::decode(word) {
                    Some(instruction) => writeln!(out, "{address:03X}  {word:04X}  {instruction}")?,
                    None => writeln!(out, "{address:03X}  {word:04X}  ???")?,
                }
            }
            // trailing odd byte
            [byte] => writeln!(out, "{address:03X}  {byte:02X}")?,
            _ => unreachable!("chunks(2) yields one or two bytes"),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let bytes = match fs::read(&args.rom) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error reading Chip-8 ROM: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut out = BufWriter::new(io::stdout().lock());
    match disassemble(&bytes, &mut out).and_then(|()| out.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error writing listing: {e}");
            ExitCode::FAILURE
        }
    }
}
