//! GPIO Driver Subsystem
//!
//! # Module Organization
//!
//! - [`hal`]: platform-independent traits, both the ones a GPIO controller
//!   implements and the ones it needs from the platform
//! - [`hw`]: raw register maps and MMIO access
//! - [`platform`]: controller drivers built from the two
//!
//! # Usage Example
//!
//! ```ignore
//! use drivers::platform::ti::{Chip, TiGpio};
//! use drivers::{GpioController, PinFlags, PinLevel};
//!
//! let gpio = TiGpio::<_, _, Event>::attach(Chip::Am335x, resources, pads)?;
//! gpio.set_flags(21, PinFlags::OUTPUT)?;
//! gpio.set_level(21, PinLevel::High)?;
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod hal;
pub mod hw;
pub mod platform;

// Re-export commonly used types
pub use hal::gpio::{GpioController, PinFlags, PinLevel};
pub use hal::interrupt::{GpioInterrupts, InterruptEvent, IrqHandle, Polarity, Trigger};
pub use hal::resource::{GpioResources, PadConfig, RegisterWindow};
