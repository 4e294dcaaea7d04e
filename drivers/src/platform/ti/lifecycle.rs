//! Attach, bank initialisation and teardown.

use alloc::vec::Vec;

use common::sync::{IrqControl, IrqSpinLock};

use super::chip::{Chip, ChipProfile};
use super::controller::{State, TiGpio};
use super::error::GpioError;
use super::pins::PinMap;
use crate::hal::gpio::PinFlags;
use crate::hal::interrupt::InterruptEvent;
use crate::hal::resource::{GpioResources, PadConfig};
use crate::hw::ti::gpio::{PINS_PER_BANK, Register};

impl<R, P, E, I> TiGpio<R, P, E, I>
where
    R: GpioResources,
    P: PadConfig,
    E: InterruptEvent,
    I: IrqControl,
{
    /// Bring up the GPIO controller of `chip`.
    ///
    /// Maps the bank windows and interrupt lines, initialises every mapped
    /// bank and then routes the lines to [`TiGpio::handle_interrupt`].
    /// Window 0 and line 0 are required; the rest are optional. On failure
    /// everything acquired so far is released again.
    pub fn attach(chip: Chip, resources: R, pads: P) -> Result<Self, GpioError> {
        let profile = ChipProfile::for_chip(chip);
        let mut gpio = Self {
            profile,
            pins: PinMap::new(&profile),
            state: IrqSpinLock::new(State::new(&profile, pads)),
            resources,
            lines: (0..profile.interrupt_line_count()).map(|_| None).collect(),
            routed: alloc::vec![false; profile.interrupt_line_count()],
            clocks: alloc::vec![false; profile.bank_count],
        };

        if let Err(err) = gpio.acquire() {
            log::error!("{}: GPIO attach failed: {}", profile.name, err);
            gpio.detach();
            return Err(err);
        }
        log::debug!(
            "{}: GPIO attached, {} pins, banks {:#04x}",
            profile.name,
            gpio.pins.total_pins(),
            gpio.pins.mapped_banks().fold(0u32, |acc, bank| acc | 1 << bank)
        );
        Ok(gpio)
    }

    fn acquire(&mut self) -> Result<(), GpioError> {
        for bank in 0..self.profile.bank_count {
            match self.resources.allocate_memory_window(bank) {
                Some(window) => {
                    self.state.get_mut().banks.install(bank, window);
                    self.pins.set_mapped(bank, true);
                }
                None if bank == 0 => {
                    log::error!("{}: could not map GPIO registers", self.profile.name);
                    return Err(GpioError::ResourceUnavailable);
                }
                None => {}
            }
        }

        for index in 0..self.lines.len() {
            match self.resources.allocate_interrupt_line(index) {
                Some(line) => self.lines[index] = Some(line),
                None if index == 0 => {
                    log::error!("{}: could not allocate GPIO interrupts", self.profile.name);
                    return Err(GpioError::ResourceUnavailable);
                }
                None => {}
            }
        }

        // Banks are silenced before any line is routed to them.
        let banks: Vec<usize> = self.pins.mapped_banks().collect();
        for bank in banks {
            self.init_bank(bank)?;
        }

        // Lines are routed up to the first gap.
        for index in 0..self.lines.len() {
            let Some(line) = &self.lines[index] else { break };
            if self.resources.setup_interrupt(index, line).is_err() {
                log::error!("{}: unable to route interrupt line {}", self.profile.name, index);
                return Err(GpioError::ResourceUnavailable);
            }
            self.routed[index] = true;
        }
        Ok(())
    }

    /// Clock the bank, check its revision, disable its interrupts and load
    /// OE from the pad configuration.
    fn init_bank(&mut self, bank: usize) -> Result<(), GpioError> {
        let module = self.profile.clock_module(bank);
        self.resources
            .enable_clock(module)
            .map_err(|_| GpioError::ResourceUnavailable)?;
        self.clocks[bank] = true;

        let state = self.state.get_mut();
        let found = state.banks.read(bank, Register::Revision);
        if found != self.profile.expected_revision {
            log::warn!(
                "{}: could not determine the revision of GPIO module {} (revision: {:#010x})",
                self.profile.name,
                bank,
                found
            );
            return Err(GpioError::RevisionMismatch { bank, found });
        }

        state.banks.intr_clr(bank, u32::MAX);

        let first = bank as u32 * PINS_PER_BANK;
        let oe = (0..PINS_PER_BANK)
            .filter(|bit| state.pads.pad_flags(first + bit).contains(PinFlags::OUTPUT))
            .fold(u32::MAX, |oe, bit| oe & !(1 << bit));
        state.banks.write(bank, Register::Oe, oe);
        log::debug!("gpio bank {} (module {}): OE {:#010x}", bank, module, oe);
        Ok(())
    }

    /// Release everything `attach` acquired.
    ///
    /// Safe on a partially attached controller and safe to repeat. After
    /// detaching, every pin is invalid.
    pub fn detach(&mut self) {
        let state = self.state.get_mut();
        for bank in self.pins.mapped_banks() {
            state.banks.intr_clr(bank, u32::MAX);
        }
        for slot in state.events.iter_mut() {
            *slot = None;
        }

        for (bank, enabled) in self.clocks.iter_mut().enumerate() {
            if core::mem::take(enabled) {
                self.resources.disable_clock(self.profile.clock_module(bank));
            }
        }

        for (index, line) in self.lines.iter_mut().enumerate() {
            if let Some(line) = line.take() {
                if core::mem::take(&mut self.routed[index]) {
                    self.resources.teardown_interrupt(index, &line);
                }
                self.resources.release_interrupt_line(index, line);
            }
        }

        for bank in 0..self.profile.bank_count {
            if let Some(window) = state.banks.take(bank) {
                self.resources.release_memory_window(bank, window);
            }
            self.pins.set_mapped(bank, false);
        }
    }
}

impl<R, P, E, I> Drop for TiGpio<R, P, E, I>
where
    R: GpioResources,
    P: PadConfig,
    E: InterruptEvent,
    I: IrqControl,
{
    fn drop(&mut self) {
        self.detach();
    }
}
