//! Platform drivers.
//!
//! Each SoC family gets a module implementing the [`crate::hal`] traits on
//! top of its registers. The chip variant inside a family is picked at
//! attach time, not at build time.

pub mod ti;
