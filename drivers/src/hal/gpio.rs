//! GPIO (General Purpose Input/Output) Hardware Abstraction Layer.
//!
//! This module defines the pin-level interface a GPIO controller exposes to
//! the pin bus above it.

use alloc::string::String;

bitflags::bitflags! {
    /// Pin configuration and capability flags.
    ///
    /// The same set describes what a pin can do (capabilities) and how it is
    /// currently configured (flags). Bit values follow the usual GPIO bus
    /// numbering.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct PinFlags: u32 {
        /// Pin is (or can be) an input.
        const INPUT = 0x0001;
        /// Pin is (or can be) an output.
        const OUTPUT = 0x0002;
        /// Internal pull-up resistor.
        const PULLUP = 0x0020;
        /// Internal pull-down resistor.
        const PULLDOWN = 0x0040;
    }
}

/// Pin logic level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinLevel {
    /// Logic low.
    Low,
    /// Logic high.
    High,
}

impl PinLevel {
    /// The opposite level.
    pub const fn toggled(self) -> Self {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }
}

impl From<bool> for PinLevel {
    fn from(value: bool) -> Self {
        if value { PinLevel::High } else { PinLevel::Low }
    }
}

impl From<PinLevel> for bool {
    fn from(level: PinLevel) -> bool {
        matches!(level, PinLevel::High)
    }
}

/// GPIO controller trait.
///
/// Pins are addressed by a flat, zero-based index. Every method takes
/// `&self`: a controller is shared between pin consumers and its own
/// interrupt handler, and serialises hardware access internally.
pub trait GpioController {
    /// Error type for GPIO operations.
    type Error: core::fmt::Debug;

    /// Number of pins addressable on this controller.
    fn pin_count(&self) -> u32;

    /// Highest addressable pin index.
    fn pin_max(&self) -> u32 {
        self.pin_count().saturating_sub(1)
    }

    /// What the pin can be configured as.
    fn capabilities(&self, pin: u32) -> Result<PinFlags, Self::Error>;

    /// Human-readable pin name.
    fn name(&self, pin: u32) -> Result<String, Self::Error>;

    /// Current pin configuration.
    fn flags(&self, pin: u32) -> Result<PinFlags, Self::Error>;

    /// Configure direction and pull resistors.
    fn set_flags(&self, pin: u32, flags: PinFlags) -> Result<(), Self::Error>;

    /// Read the current logic level of a pin.
    fn level(&self, pin: u32) -> Result<PinLevel, Self::Error>;

    /// Drive the pin to a specific level.
    fn set_level(&self, pin: u32, level: PinLevel) -> Result<(), Self::Error>;

    /// Invert the driven level of the pin.
    fn toggle(&self, pin: u32) -> Result<(), Self::Error>;

    /// Set a pin to logic high.
    fn set_high(&self, pin: u32) -> Result<(), Self::Error> {
        self.set_level(pin, PinLevel::High)
    }

    /// Set a pin to logic low.
    fn set_low(&self, pin: u32) -> Result<(), Self::Error> {
        self.set_level(pin, PinLevel::Low)
    }

    /// Check if the pin currently reads high.
    fn is_high(&self, pin: u32) -> Result<bool, Self::Error> {
        Ok(self.level(pin)? == PinLevel::High)
    }
}
