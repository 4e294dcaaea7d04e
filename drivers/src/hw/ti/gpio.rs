use core::ptr::{read_volatile, write_volatile};

use crate::hal::resource::RegisterWindow;

/// Pins served by one GPIO bank.
pub const PINS_PER_BANK: u32 = 32;

/// Size of one bank's register window in bytes.
pub const BANK_WINDOW_SIZE: usize = 0x200;

/// Registers of one OMAP4/AM335x GPIO module.
///
/// Each discriminant is the register's byte offset in the bank window.
/// There are two copies of the interrupt status/enable registers
/// (`*_0`, `*_1`): on OMAP4 they feed the MPU and the DSP, on AM335x they
/// drive the module's two interrupt lines.
#[repr(usize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    /// Module revision.
    Revision = 0x000,
    /// Raw interrupt status, line 0.
    IrqStatusRaw0 = 0x024,
    /// Raw interrupt status, line 1.
    IrqStatusRaw1 = 0x028,
    /// Enabled interrupt status, line 0. Write 1 to clear.
    IrqStatus0 = 0x02c,
    /// Enabled interrupt status, line 1. Write 1 to clear.
    IrqStatus1 = 0x030,
    /// Interrupt enable, line 0. Write 1 to enable.
    IrqStatusSet0 = 0x034,
    /// Interrupt enable, line 1. Write 1 to enable.
    IrqStatusSet1 = 0x038,
    /// Interrupt enable, line 0. Write 1 to disable.
    IrqStatusClr0 = 0x03c,
    /// Interrupt enable, line 1. Write 1 to disable.
    IrqStatusClr1 = 0x040,
    /// Output enable. A set bit makes the pin an input.
    Oe = 0x134,
    /// Sampled pin levels.
    DataIn = 0x138,
    /// Output latch.
    DataOut = 0x13c,
    /// Low-level detect enable.
    LevelDetect0 = 0x140,
    /// High-level detect enable.
    LevelDetect1 = 0x144,
    /// Rising-edge detect enable.
    RisingDetect = 0x148,
    /// Falling-edge detect enable.
    FallingDetect = 0x14c,
    /// Write 1 to clear output latch bits.
    ClearDataOut = 0x190,
    /// Write 1 to set output latch bits.
    SetDataOut = 0x194,
}

impl Register {
    pub const fn offset(self) -> usize {
        self as usize
    }

    /// The four interrupt detect registers.
    pub const DETECT: [Register; 4] = [
        Register::LevelDetect0,
        Register::LevelDetect1,
        Register::FallingDetect,
        Register::RisingDetect,
    ];
}

/// Bank register window accessed with volatile loads and stores.
#[derive(Debug)]
pub struct MmioWindow {
    base: *mut u32,
}

// SAFETY: the window is plain device memory; callers serialise access.
unsafe impl Send for MmioWindow {}

impl MmioWindow {
    /// Wrap a mapped bank window.
    ///
    /// # Safety
    /// `base` must be the virtual address of a GPIO module's register block,
    /// mapped as device memory for at least [`BANK_WINDOW_SIZE`] bytes and
    /// valid for the lifetime of this object.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            base: base as *mut u32,
        }
    }

    fn reg(&self, offset: usize) -> *mut u32 {
        debug_assert!(offset < BANK_WINDOW_SIZE && offset % 4 == 0);
        // SAFETY: offsets come from `Register` and lie inside the window.
        unsafe { self.base.byte_add(offset) }
    }
}

impl RegisterWindow for MmioWindow {
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: see `MmioWindow::new`.
        unsafe { read_volatile(self.reg(offset)) }
    }

    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: see `MmioWindow::new`.
        unsafe { write_volatile(self.reg(offset), value) }
    }
}
