//! Interrupt-context entry point: fan one physical line out to pins.

use alloc::sync::Arc;

use common::sync::IrqControl;

use super::controller::TiGpio;
use crate::hal::interrupt::InterruptEvent;
use crate::hal::resource::{GpioResources, PadConfig};
use crate::hw::ti::gpio::PINS_PER_BANK;

/// Outcome of one demultiplexing pass.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DemuxReport {
    /// Pins whose handler chain ran.
    pub dispatched: u32,
    /// Pins that were pending with no handler registered.
    pub stray: u32,
}

impl<R, P, E, I> TiGpio<R, P, E, I>
where
    R: GpioResources,
    P: PadConfig,
    E: InterruptEvent,
    I: IrqControl,
{
    /// Service every pending pin interrupt.
    ///
    /// The host calls this whenever one of the controller's interrupt lines
    /// fires. Every mapped bank is scanned, in ascending pin order, and
    /// every pending pin is dispatched and acknowledged in the same pass.
    ///
    /// The driver lock is not held while a handler chain runs, so handlers
    /// may call back into the controller.
    pub fn handle_interrupt(&self) -> DemuxReport {
        let mut report = DemuxReport::default();

        for bank in self.pins.mapped_banks() {
            let mut pending = self.state.lock().banks.intr_status(bank);

            while pending != 0 {
                let bit = pending.trailing_zeros();
                let mask = 1 << bit;
                pending &= !mask;
                let pin = bank as u32 * PINS_PER_BANK + bit;

                let event = self.state.lock().events[pin as usize].as_ref().map(Arc::clone);
                match event {
                    Some(event) if event.has_handlers() => {
                        event.handle();
                        report.dispatched += 1;
                    }
                    _ => {
                        log::warn!("{}: stray interrupt on gpio_{}", self.profile.name, pin);
                        report.stray += 1;
                    }
                }

                // Ack even when stray, or a level source fires forever.
                self.state.lock().banks.intr_ack(bank, mask);
            }
        }

        report
    }
}
