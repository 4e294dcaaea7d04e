//! Interfaces a driver consumes from the layers around it.
//!
//! The resource layer maps register windows and interrupt lines and owns
//! clocks; the pad-configuration layer knows how each pad is wired. Both
//! are supplied by the platform at attach time.

use super::gpio::PinFlags;

/// A mapped window of 32-bit device registers.
pub trait RegisterWindow {
    /// Read the register at byte offset `offset`.
    fn read(&self, offset: usize) -> u32;

    /// Write the register at byte offset `offset`.
    fn write(&mut self, offset: usize, value: u32);
}

/// Error from the resource layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResourceError;

/// Memory, interrupt and clock resources for one GPIO controller.
pub trait GpioResources {
    /// Mapped register window of one bank.
    type Window: RegisterWindow + Send;

    /// A physical interrupt line.
    type Line;

    /// Map the register window of `bank`, if present.
    fn allocate_memory_window(&mut self, bank: usize) -> Option<Self::Window>;

    /// Give back a window returned by `allocate_memory_window`.
    fn release_memory_window(&mut self, bank: usize, window: Self::Window);

    /// Claim interrupt line `index`, if present.
    fn allocate_interrupt_line(&mut self, index: usize) -> Option<Self::Line>;

    /// Give back a line returned by `allocate_interrupt_line`.
    fn release_interrupt_line(&mut self, index: usize, line: Self::Line);

    /// Route `line` to the controller's interrupt entry point.
    fn setup_interrupt(&mut self, index: usize, line: &Self::Line) -> Result<(), ResourceError>;

    /// Undo `setup_interrupt`.
    fn teardown_interrupt(&mut self, index: usize, line: &Self::Line);

    /// Enable interface and functional clocks of GPIO module `module`.
    fn enable_clock(&mut self, module: usize) -> Result<(), ResourceError>;

    /// Disable the clocks enabled by `enable_clock`.
    fn disable_clock(&mut self, module: usize);
}

/// Error from the pad-configuration layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PadError;

/// Pad (pinmux) configuration side channel.
///
/// Direction and pull resistors live in the pad controller, not in the GPIO
/// bank.
pub trait PadConfig {
    /// Current direction and pull configuration of `pin`.
    fn pad_flags(&self, pin: u32) -> PinFlags;

    /// Program direction and pull configuration of `pin`.
    fn set_pad_flags(&mut self, pin: u32, flags: PinFlags) -> Result<(), PadError>;
}
