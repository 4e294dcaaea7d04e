//! Per-architecture implementations of the interrupt masking interface.
//!
//! [`LocalIrq`] names the implementation for the architecture being built,
//! so drivers can default their lock type to it.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        pub mod arm;
        pub type LocalIrq = arm::irq::ArmIrq;
    } else {
        pub type LocalIrq = crate::sync::irq::NoIrq;
    }
}
