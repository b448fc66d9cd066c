/// # Quirks
/// Behaviours that historically differ between Chip-8 interpreters.
///
/// The defaults match the single-operand behaviour most ROMs written since the 90s expect.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Quirks {
    /// SHR/SHL copy Vy into Vx before shifting, as the COSMAC VIP interpreter did
    pub shift_reads_vy: bool,
}

impl Quirks {
    /// The COSMAC VIP behaviour
    pub fn vip() -> Self {
        Quirks {
            shift_reads_vy: true,
        }
    }
}
