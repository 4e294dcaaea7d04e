use core::fmt;

/// Errors reported by the TI GPIO controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Pin index out of range, or its bank is not mapped.
    InvalidPin,
    /// Trigger or polarity missing (`Conform`) or not realizable.
    UnsupportedConfig,
    /// Pin flag combination not realizable.
    UnsupportedFlags,
    /// A bank reported an unexpected module revision.
    RevisionMismatch { bank: usize, found: u32 },
    /// A required resource could not be obtained.
    ResourceUnavailable,
    /// The handle does not name a registered interrupt handler.
    HandlerNotFound,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::InvalidPin => f.write_str("invalid pin"),
            GpioError::UnsupportedConfig => f.write_str("unsupported interrupt configuration"),
            GpioError::UnsupportedFlags => f.write_str("unsupported pin flags"),
            GpioError::RevisionMismatch { bank, found } => {
                write!(f, "GPIO bank {bank} has unknown revision {found:#010x}")
            }
            GpioError::ResourceUnavailable => f.write_str("resource unavailable"),
            GpioError::HandlerNotFound => f.write_str("interrupt handler not found"),
        }
    }
}
