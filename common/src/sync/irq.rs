use core::fmt::Debug;

/// Architecture-specific local interrupt masking.
///
/// Implemented once per architecture in [`crate::arch`].
pub trait IrqControl {
    /// Saved interrupt state, handed back to [`IrqControl::restore`].
    type State: Copy + Debug;

    /// Disable local interrupts and return the previous state.
    fn disable() -> Self::State;

    /// Return local interrupts to a state saved by [`IrqControl::disable`].
    fn restore(state: Self::State);
}

/// Interrupt control for hosted builds, where there is nothing to mask.
#[derive(Debug)]
pub struct NoIrq;

impl IrqControl for NoIrq {
    type State = ();

    #[inline(always)]
    fn disable() {}

    #[inline(always)]
    fn restore(_state: ()) {}
}
