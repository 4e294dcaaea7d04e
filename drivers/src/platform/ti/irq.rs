//! Per-pin interrupt detection: trigger/polarity state, detect register
//! selection, masking, and handler registration.

use alloc::sync::Arc;

use common::sync::IrqControl;

use super::controller::{State, TiGpio};
use super::error::GpioError;
use super::pins::Pin;
use crate::hal::interrupt::{GpioInterrupts, InterruptEvent, IrqHandle, Polarity, Trigger};
use crate::hal::resource::{GpioResources, PadConfig, RegisterWindow};
use crate::hw::ti::gpio::Register;

/// Interrupt detection mode of a pin: a concrete (trigger, polarity) pair.
///
/// Each mode is served by exactly one detect register.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum IrqSense {
    /// Level trigger, active low. The mode every pin starts in.
    #[default]
    LevelLow,
    LevelHigh,
    FallingEdge,
    RisingEdge,
}

impl IrqSense {
    /// Resolve a requested configuration. There is no bus default, so
    /// `Conform` is refused.
    pub fn from_config(trigger: Trigger, polarity: Polarity) -> Result<Self, GpioError> {
        match (trigger, polarity) {
            (Trigger::Level, Polarity::Low) => Ok(IrqSense::LevelLow),
            (Trigger::Level, Polarity::High) => Ok(IrqSense::LevelHigh),
            (Trigger::Edge, Polarity::Low) => Ok(IrqSense::FallingEdge),
            (Trigger::Edge, Polarity::High) => Ok(IrqSense::RisingEdge),
            _ => Err(GpioError::UnsupportedConfig),
        }
    }

    pub const fn trigger(self) -> Trigger {
        match self {
            IrqSense::LevelLow | IrqSense::LevelHigh => Trigger::Level,
            IrqSense::FallingEdge | IrqSense::RisingEdge => Trigger::Edge,
        }
    }

    pub const fn polarity(self) -> Polarity {
        match self {
            IrqSense::LevelLow | IrqSense::FallingEdge => Polarity::Low,
            IrqSense::LevelHigh | IrqSense::RisingEdge => Polarity::High,
        }
    }

    pub const fn detect_register(self) -> Register {
        match self {
            IrqSense::LevelLow => Register::LevelDetect0,
            IrqSense::LevelHigh => Register::LevelDetect1,
            IrqSense::FallingEdge => Register::FallingDetect,
            IrqSense::RisingEdge => Register::RisingDetect,
        }
    }
}

impl<W: RegisterWindow, P, E> State<W, P, E> {
    fn update_bit(&mut self, bank: usize, reg: Register, mask: u32, set: bool) {
        let val = self.banks.read(bank, reg);
        let val = if set { val | mask } else { val & !mask };
        self.banks.write(bank, reg, val);
    }

    /// Switch a pin to a new detection mode.
    ///
    /// The new detect register is armed before the old one is disarmed, as
    /// the TRM recommends, so an event arriving mid-switch is not lost.
    pub(crate) fn configure(&mut self, pin: Pin, sense: IrqSense) {
        let old = self.sense[pin.slot()].detect_register();
        self.sense[pin.slot()] = sense;
        let new = sense.detect_register();

        self.update_bit(pin.bank, new, pin.mask, true);
        if new != old {
            self.update_bit(pin.bank, old, pin.mask, false);
        }
        log::trace!("gpio_{}: interrupt sense {:?}", pin.index, sense);
    }

    pub(crate) fn mask(&mut self, pin: Pin) {
        self.banks.intr_clr(pin.bank, pin.mask);
        let reg = self.sense[pin.slot()].detect_register();
        self.update_bit(pin.bank, reg, pin.mask, false);
    }

    pub(crate) fn unmask(&mut self, pin: Pin) {
        let reg = self.sense[pin.slot()].detect_register();
        self.update_bit(pin.bank, reg, pin.mask, true);
        self.banks.intr_set(pin.bank, pin.mask);
    }
}

impl<R, P, E, I> TiGpio<R, P, E, I>
where
    R: GpioResources,
    P: PadConfig,
    E: InterruptEvent,
    I: IrqControl,
{
    /// Current trigger and polarity of a pin's interrupt.
    pub fn irq_config(&self, pin: u32) -> Result<(Trigger, Polarity), GpioError> {
        let pin = self.pins.validate(pin)?;
        let sense = self.state.lock().sense[pin.slot()];
        Ok((sense.trigger(), sense.polarity()))
    }

    /// Whether a handler chain currently exists for the pin.
    pub fn has_event(&self, pin: u32) -> Result<bool, GpioError> {
        let pin = self.pins.validate(pin)?;
        Ok(self.state.lock().events[pin.slot()].is_some())
    }
}

impl<R, P, E, I> GpioInterrupts for TiGpio<R, P, E, I>
where
    R: GpioResources,
    P: PadConfig,
    E: InterruptEvent,
    I: IrqControl,
{
    type Handler = E::Handler;
    type Cookie = E::Cookie;

    fn configure_interrupt(
        &self,
        pin: u32,
        trigger: Trigger,
        polarity: Polarity,
    ) -> Result<(), GpioError> {
        let pin = self.pins.validate(pin)?;
        let sense = IrqSense::from_config(trigger, polarity)?;
        self.state.lock().configure(pin, sense);
        Ok(())
    }

    fn mask_interrupt(&self, pin: u32) -> Result<(), GpioError> {
        let pin = self.pins.validate(pin)?;
        self.state.lock().mask(pin);
        Ok(())
    }

    fn unmask_interrupt(&self, pin: u32) -> Result<(), GpioError> {
        let pin = self.pins.validate(pin)?;
        self.state.lock().unmask(pin);
        Ok(())
    }

    /// The pin's handler chain is created on first use. Adding the first
    /// handler unmasks the pin.
    fn add_interrupt_handler(
        &self,
        pin: u32,
        trigger: Trigger,
        polarity: Polarity,
        handler: E::Handler,
    ) -> Result<IrqHandle<E::Cookie>, GpioError> {
        let pin = self.pins.validate(pin)?;
        let sense = IrqSense::from_config(trigger, polarity)?;

        // The chain is created outside the lock, then installed only if the
        // slot is still empty.
        let mut fresh: Option<Arc<E>> = None;
        let (mut state, event) = loop {
            let mut state = self.state.lock();
            if let Some(event) = &state.events[pin.slot()] {
                let event = Arc::clone(event);
                break (state, event);
            }
            if let Some(event) = fresh.take() {
                state.events[pin.slot()] = Some(Arc::clone(&event));
                break (state, event);
            }
            drop(state);
            let event = E::create(pin.index).ok_or(GpioError::ResourceUnavailable)?;
            fresh = Some(Arc::new(event));
        };

        state.configure(pin, sense);
        let first = !event.has_handlers();
        let cookie = event.add_handler(handler);
        if first {
            state.unmask(pin);
        }
        log::debug!("gpio_{}: handler {:?} added ({:?})", pin.index, cookie, sense);
        Ok(IrqHandle {
            pin: pin.index,
            cookie,
        })
    }

    /// Removing the last handler masks the pin and empties its slot.
    fn remove_interrupt_handler(&self, handle: IrqHandle<E::Cookie>) -> Result<(), GpioError> {
        let pin = self.pins.validate(handle.pin)?;
        let mut state = self.state.lock();
        let event = state.events[pin.slot()]
            .clone()
            .ok_or(GpioError::HandlerNotFound)?;

        if !event.remove_handler(handle.cookie) {
            return Err(GpioError::HandlerNotFound);
        }
        if !event.has_handlers() {
            state.mask(pin);
            state.events[pin.slot()] = None;
        }
        log::debug!("gpio_{}: handler {:?} removed", pin.index, handle.cookie);
        Ok(())
    }
}
