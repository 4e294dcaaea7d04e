//! SoC variants served by the driver.

use crate::hw::ti::gpio::PINS_PER_BANK;

/// Supported SoC families.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Chip {
    Omap4,
    Am335x,
}

/// Per-chip GPIO geometry, resolved once when the controller attaches.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChipProfile {
    pub name: &'static str,
    /// Number of GPIO modules (banks).
    pub bank_count: usize,
    /// Hardware number of bank 0. The OMAP4 TRM numbers its modules 1-6,
    /// AM335x 0-3; clocks are addressed by the hardware number.
    pub first_bank_index: usize,
    /// Physical interrupt lines wired per bank.
    pub interrupt_lines_per_bank: usize,
    /// Value every bank's REVISION register must hold.
    pub expected_revision: u32,
}

impl ChipProfile {
    pub const OMAP4: ChipProfile = ChipProfile {
        name: "OMAP4",
        bank_count: 6,
        first_bank_index: 1,
        interrupt_lines_per_bank: 1,
        expected_revision: 0x5060_0801,
    };

    pub const AM335X: ChipProfile = ChipProfile {
        name: "AM335x",
        bank_count: 4,
        first_bank_index: 0,
        interrupt_lines_per_bank: 2,
        expected_revision: 0x5060_0801,
    };

    pub const fn for_chip(chip: Chip) -> ChipProfile {
        match chip {
            Chip::Omap4 => Self::OMAP4,
            Chip::Am335x => Self::AM335X,
        }
    }

    pub const fn total_pins(&self) -> u32 {
        self.bank_count as u32 * PINS_PER_BANK
    }

    pub const fn interrupt_line_count(&self) -> usize {
        self.bank_count * self.interrupt_lines_per_bank
    }

    /// Clock module number of `bank`.
    pub const fn clock_module(&self, bank: usize) -> usize {
        self.first_bank_index + bank
    }
}
