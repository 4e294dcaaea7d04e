//! TI OMAP4 / AM335x GPIO controller.
//!
//! Up to six banks of 32 pins, each with its own register window. Pins are
//! numbered flat across banks; pin `n` lives in bank `n / 32`, bit `n % 32`.
//! Bank interrupt lines are demultiplexed to per-pin handler chains by
//! [`TiGpio::handle_interrupt`].
//!
//! # Usage
//!
//! ```ignore
//! let gpio = TiGpio::<Resources, Pads, Event>::attach(Chip::Am335x, resources, pads)?;
//! gpio.set_flags(53, PinFlags::OUTPUT)?;
//! gpio.set_high(53)?;
//! let handle = gpio.add_interrupt_handler(60, Trigger::Edge, Polarity::High, handler)?;
//! ```

mod bank;
mod chip;
mod controller;
mod demux;
mod error;
mod irq;
mod lifecycle;
mod pins;

#[cfg(test)]
mod mock;

pub use bank::BankRegisterFile;
pub use chip::{Chip, ChipProfile};
pub use controller::{PIN_CAPABILITIES, TiGpio};
pub use demux::DemuxReport;
pub use error::GpioError;
pub use irq::IrqSense;
pub use pins::{Pin, PinMap, bank_of, mask_of};
