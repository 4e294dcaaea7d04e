//! Architecture glue and synchronisation primitives shared by the drivers.

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod sync;
