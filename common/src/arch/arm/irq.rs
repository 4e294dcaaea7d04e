use crate::sync::irq::IrqControl;

/// IRQ mask bit in the CPSR.
const CPSR_I: u32 = 1 << 7;

/// Local IRQ masking for ARMv7-A cores (Cortex-A8/A9 on AM335x and OMAP4).
///
/// The saved state is whether IRQs were enabled before `disable`. FIQs are
/// left alone.
#[derive(Debug)]
pub struct ArmIrq;

impl IrqControl for ArmIrq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let cpsr: u32;
        // SAFETY: reading the CPSR and setting the I bit has no memory effects.
        unsafe {
            core::arch::asm!(
                "mrs {0}, cpsr",
                "cpsid i",
                out(reg) cpsr,
                options(nostack, preserves_flags)
            );
        }
        cpsr & CPSR_I == 0
    }

    #[inline(always)]
    fn restore(was_enabled: bool) {
        if was_enabled {
            // SAFETY: only re-enables IRQs that were enabled on entry.
            unsafe {
                core::arch::asm!("cpsie i", options(nostack, preserves_flags));
            }
        }
    }
}
