//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! These traits describe what a GPIO controller offers to consumers
//! ([`gpio`], [`interrupt`]) and what it needs from the platform
//! ([`resource`]). Platform drivers implement the former on top of the
//! latter.
//!
//! # Available Interfaces
//!
//! - [`gpio`]: pin configuration and level control
//! - [`interrupt`]: pin interrupt configuration and handler chains
//! - [`resource`]: register windows, interrupt lines, clocks and pads

pub mod gpio;
pub mod interrupt;
pub mod resource;
