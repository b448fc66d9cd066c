use thiserror::Error;

/// # Faults
/// Conditions that stop a step (or a ROM load) from completing normally.
///
/// Only an unknown opcode is survivable; the others mean the program has gone off the rails
/// and the front end should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// The fetched word isn't any of the 35 instructions
    #[error("unknown opcode {opcode:#06X} at {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },

    /// CALL with all 16 stack slots in use
    #[error("call stack overflow at {address:#05X}")]
    StackOverflow { address: u16 },

    /// RET with nothing on the stack
    #[error("call stack underflow at {address:#05X}")]
    StackUnderflow { address: u16 },

    /// The ROM doesn't fit between 0x200 and the end of memory
    #[error("rom is {size} bytes but at most {max} bytes fit in memory")]
    RomTooLarge { size: usize, max: usize },
}

impl Fault {
    /// Whether the session can't sensibly continue after this fault.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Fault::UnknownOpcode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unknown_opcode_is_survivable() {
        assert!(!Fault::UnknownOpcode {
            opcode: 0xFFFF,
            address: 0x200
        }
        .is_fatal());
        assert!(Fault::StackOverflow { address: 0x200 }.is_fatal());
        assert!(Fault::StackUnderflow { address: 0x200 }.is_fatal());
        assert!(Fault::RomTooLarge {
            size: 4000,
            max: 3584
        }
        .is_fatal());
    }

    #[test]
    fn test_messages_include_context() {
        let fault = Fault::UnknownOpcode {
            opcode: 0x5AB1,
            address: 0x2F4,
        };
        assert_eq!(fault.to_string(), "unknown opcode 0x5AB1 at 0x2F4");
        assert_eq!(
            Fault::RomTooLarge {
                size: 4000,
                max: 3584
            }
            .to_string(),
            "rom is 4000 bytes but at most 3584 bytes fit in memory"
        );
    }
}
