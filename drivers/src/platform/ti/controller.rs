//! The controller instance and its pin operations.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use common::arch::LocalIrq;
use common::sync::{IrqControl, IrqSpinLock};

use super::bank::BankRegisterFile;
use super::chip::ChipProfile;
use super::error::GpioError;
use super::irq::IrqSense;
use super::pins::PinMap;
use crate::hal::gpio::{GpioController, PinFlags, PinLevel};
use crate::hal::interrupt::InterruptEvent;
use crate::hal::resource::{GpioResources, PadConfig, RegisterWindow};
use crate::hw::ti::gpio::Register;

/// Every pin offers the same capabilities.
pub const PIN_CAPABILITIES: PinFlags = PinFlags::INPUT
    .union(PinFlags::OUTPUT)
    .union(PinFlags::PULLUP)
    .union(PinFlags::PULLDOWN);

/// Everything the driver lock protects.
pub(crate) struct State<W, P, E> {
    pub(crate) banks: BankRegisterFile<W>,
    pub(crate) pads: P,
    /// Interrupt detection mode per pin.
    pub(crate) sense: Vec<IrqSense>,
    /// Handler chain per pin; `None` until the first handler is added.
    pub(crate) events: Vec<Option<Arc<E>>>,
}

impl<W: RegisterWindow, P, E> State<W, P, E> {
    pub(crate) fn new(profile: &ChipProfile, pads: P) -> Self {
        let pins = profile.total_pins() as usize;
        Self {
            banks: BankRegisterFile::new(profile.bank_count),
            pads,
            sense: alloc::vec![IrqSense::default(); pins],
            events: (0..pins).map(|_| None).collect(),
        }
    }
}

/// Multi-bank GPIO controller of TI OMAP4 and AM335x SoCs.
///
/// Constructed by [`TiGpio::attach`]. Pin operations, interrupt
/// configuration and [`TiGpio::handle_interrupt`] all take `&self` and
/// serialise on one interrupt-safe spin lock.
pub struct TiGpio<R, P, E, I = LocalIrq>
where
    R: GpioResources,
    P: PadConfig,
    E: InterruptEvent,
    I: IrqControl,
{
    pub(crate) profile: ChipProfile,
    pub(crate) pins: PinMap,
    pub(crate) state: IrqSpinLock<State<R::Window, P, E>, I>,
    pub(crate) resources: R,
    pub(crate) lines: Vec<Option<R::Line>>,
    /// Lines routed to `handle_interrupt` by `setup_interrupt`.
    pub(crate) routed: Vec<bool>,
    /// Banks whose clocks this driver enabled.
    pub(crate) clocks: Vec<bool>,
}

impl<R, P, E, I> TiGpio<R, P, E, I>
where
    R: GpioResources,
    P: PadConfig,
    E: InterruptEvent,
    I: IrqControl,
{
    pub fn pin_map(&self) -> &PinMap {
        &self.pins
    }
}

/// Strobe register that drives a pin to `level`.
const fn strobe(level: PinLevel) -> Register {
    match level {
        PinLevel::High => Register::SetDataOut,
        PinLevel::Low => Register::ClearDataOut,
    }
}

/// Flags `set_flags` can realise: one direction, at most one pull.
fn check_flags(flags: PinFlags) -> Result<(), GpioError> {
    let one_direction = flags.contains(PinFlags::INPUT) != flags.contains(PinFlags::OUTPUT);
    let both_pulls = flags.contains(PinFlags::PULLUP | PinFlags::PULLDOWN);
    if !PIN_CAPABILITIES.contains(flags) || !one_direction || both_pulls {
        return Err(GpioError::UnsupportedFlags);
    }
    Ok(())
}

impl<R, P, E, I> GpioController for TiGpio<R, P, E, I>
where
    R: GpioResources,
    P: PadConfig,
    E: InterruptEvent,
    I: IrqControl,
{
    type Error = GpioError;

    fn pin_count(&self) -> u32 {
        self.pins.total_pins()
    }

    fn capabilities(&self, pin: u32) -> Result<PinFlags, GpioError> {
        self.pins.validate(pin)?;
        Ok(PIN_CAPABILITIES)
    }

    fn name(&self, pin: u32) -> Result<String, GpioError> {
        self.pins.validate(pin)?;
        Ok(format!("gpio_{pin}"))
    }

    /// Reads the pad configuration rather than a cached copy.
    fn flags(&self, pin: u32) -> Result<PinFlags, GpioError> {
        self.pins.validate(pin)?;
        let state = self.state.lock();
        Ok(state.pads.pad_flags(pin))
    }

    fn set_flags(&self, pin: u32, flags: PinFlags) -> Result<(), GpioError> {
        let pin = self.pins.validate(pin)?;
        check_flags(flags)?;

        let mut state = self.state.lock();
        state
            .pads
            .set_pad_flags(pin.index, flags)
            .map_err(|_| GpioError::UnsupportedFlags)?;

        // OE set means input.
        let mut oe = state.banks.read(pin.bank, Register::Oe);
        if flags.contains(PinFlags::INPUT) {
            oe |= pin.mask;
        } else {
            oe &= !pin.mask;
        }
        state.banks.write(pin.bank, Register::Oe, oe);
        log::trace!("gpio_{}: flags {:?}, OE {:#010x}", pin.index, flags, oe);
        Ok(())
    }

    /// Output pins report the latch, not the pad: DATAIN of an output is
    /// not guaranteed to follow the driven value.
    fn level(&self, pin: u32) -> Result<PinLevel, GpioError> {
        let pin = self.pins.validate(pin)?;
        let state = self.state.lock();
        let reg = if state.banks.read(pin.bank, Register::Oe) & pin.mask != 0 {
            Register::DataIn
        } else {
            Register::DataOut
        };
        Ok(PinLevel::from(state.banks.read(pin.bank, reg) & pin.mask != 0))
    }

    fn set_level(&self, pin: u32, level: PinLevel) -> Result<(), GpioError> {
        let pin = self.pins.validate(pin)?;
        self.state.lock().banks.write(pin.bank, strobe(level), pin.mask);
        Ok(())
    }

    fn toggle(&self, pin: u32) -> Result<(), GpioError> {
        let pin = self.pins.validate(pin)?;
        let mut state = self.state.lock();
        let latch = PinLevel::from(state.banks.read(pin.bank, Register::DataOut) & pin.mask != 0);
        state.banks.write(pin.bank, strobe(latch.toggled()), pin.mask);
        Ok(())
    }
}
