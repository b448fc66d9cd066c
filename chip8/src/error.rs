use std::io;
use std::path::PathBuf;

use emu8_core::Fault;
use emu8_display::DisplayError;
use thiserror::Error;

/// Everything that can end a session early
#[derive(Debug, Error)]
pub enum RunError {
    #[error("unable to read rom '{}': {source}", path.display())]
    Rom { path: PathBuf, source: io::Error },
    #[error("sdl error: {0}")]
    Sdl(String),
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error("halted: {0}")]
    Fault(#[from] Fault),
}

impl From<String> for RunError {
    fn from(message: String) -> Self {
        RunError::Sdl(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let error = RunError::Rom {
            path: PathBuf::from("pong.ch8"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(error.to_string().starts_with("unable to read rom 'pong.ch8': "));

        let error: RunError = Fault::StackUnderflow { address: 0x2AE }.into();
        assert_eq!(error.to_string(), "halted: call stack underflow at 0x2AE");
    }
}
