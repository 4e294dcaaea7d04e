//! Register access for the mapped banks.
//!
//! Whole-register reads and writes only; callers do read-modify-write
//! under the driver lock.

use alloc::vec::Vec;

use crate::hal::resource::RegisterWindow;
use crate::hw::ti::gpio::Register;

pub struct BankRegisterFile<W> {
    windows: Vec<Option<W>>,
}

impl<W: RegisterWindow> BankRegisterFile<W> {
    pub fn new(bank_count: usize) -> Self {
        Self {
            windows: (0..bank_count).map(|_| None).collect(),
        }
    }

    pub(crate) fn install(&mut self, bank: usize, window: W) {
        self.windows[bank] = Some(window);
    }

    pub(crate) fn take(&mut self, bank: usize) -> Option<W> {
        self.windows.get_mut(bank).and_then(Option::take)
    }

    pub fn is_mapped(&self, bank: usize) -> bool {
        matches!(self.windows.get(bank), Some(Some(_)))
    }

    /// Read a register. Unmapped banks read as zero.
    pub fn read(&self, bank: usize, reg: Register) -> u32 {
        match self.windows.get(bank) {
            Some(Some(window)) => window.read(reg.offset()),
            _ => 0,
        }
    }

    /// Write a register. Writes to unmapped banks are dropped.
    pub fn write(&mut self, bank: usize, reg: Register, value: u32) {
        if let Some(Some(window)) = self.windows.get_mut(bank) {
            window.write(reg.offset(), value);
        }
    }

    /// Disable interrupt delivery for `mask` on both register sets.
    pub fn intr_clr(&mut self, bank: usize, mask: u32) {
        self.write(bank, Register::IrqStatusClr0, mask);
        self.write(bank, Register::IrqStatusClr1, mask);
    }

    /// Enable interrupt delivery for `mask`.
    ///
    /// Only the first set is enabled: the MPU copy on OMAP4, the first line
    /// on AM335x.
    pub fn intr_set(&mut self, bank: usize, mask: u32) {
        self.write(bank, Register::IrqStatusSet0, mask);
    }

    /// Acknowledge `mask` on both status registers, even though only the
    /// first set is ever enabled.
    pub fn intr_ack(&mut self, bank: usize, mask: u32) {
        self.write(bank, Register::IrqStatus0, mask);
        self.write(bank, Register::IrqStatus1, mask);
    }

    /// Pending interrupts of both register sets.
    pub fn intr_status(&self, bank: usize) -> u32 {
        self.read(bank, Register::IrqStatus0) | self.read(bank, Register::IrqStatus1)
    }
}
