//! Flat pin numbers to (bank, bit) coordinates.

use super::chip::ChipProfile;
use super::error::GpioError;
use crate::hw::ti::gpio::PINS_PER_BANK;

/// Bank serving `pin`.
#[inline]
pub const fn bank_of(pin: u32) -> usize {
    (pin / PINS_PER_BANK) as usize
}

/// Bit of `pin` within its bank's registers.
#[inline]
pub const fn mask_of(pin: u32) -> u32 {
    1 << (pin % PINS_PER_BANK)
}

/// A validated pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pin {
    pub index: u32,
    pub bank: usize,
    pub mask: u32,
}

impl Pin {
    pub(crate) const fn new(index: u32) -> Self {
        Self {
            index,
            bank: bank_of(index),
            mask: mask_of(index),
        }
    }

    /// Index into per-pin tables.
    pub const fn slot(&self) -> usize {
        self.index as usize
    }
}

/// Which pins are usable on this controller.
///
/// Fixed once the bank windows are mapped, so validation needs no lock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinMap {
    total_pins: u32,
    bank_count: usize,
    /// Bit `n` set when bank `n` has a register window.
    mapped: u32,
}

impl PinMap {
    pub const fn new(profile: &ChipProfile) -> Self {
        Self {
            total_pins: profile.total_pins(),
            bank_count: profile.bank_count,
            mapped: 0,
        }
    }

    pub const fn total_pins(&self) -> u32 {
        self.total_pins
    }

    pub const fn is_mapped(&self, bank: usize) -> bool {
        bank < self.bank_count && self.mapped & (1 << bank) != 0
    }

    pub(crate) fn set_mapped(&mut self, bank: usize, mapped: bool) {
        if mapped {
            self.mapped |= 1 << bank;
        } else {
            self.mapped &= !(1 << bank);
        }
    }

    /// Mapped banks in ascending order.
    pub fn mapped_banks(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.bank_count).filter(|&bank| self.is_mapped(bank))
    }

    pub fn validate(&self, pin: u32) -> Result<Pin, GpioError> {
        if pin >= self.total_pins || !self.is_mapped(bank_of(pin)) {
            return Err(GpioError::InvalidPin);
        }
        Ok(Pin::new(pin))
    }
}
