//! Support for the ARMv7-M architecture, independent of any particular SoC.

use core::sync::atomic::{self, Ordering};

pub mod exc;
pub mod image;
pub mod reg;
pub mod scb;

#[cfg(target_os = "none")]
pub mod startup;

/// Masks all configurable-priority exceptions by setting `PRIMASK`.  NMI and
/// HardFault are unaffected.
#[inline]
pub fn mask_interrupts() {
    #[cfg(target_arch = "arm")]
    cortex_m::interrupt::disable();
    atomic::compiler_fence(Ordering::SeqCst);
}

/// Generates an instruction synchronization barrier (`ISB`) instruction.  For
/// other types of barriers, see Rust's fence operations.
#[inline]
pub fn instruction_synchronization_barrier() {
    #[cfg(target_arch = "arm")]
    cortex_m::asm::isb();
    #[cfg(not(target_arch = "arm"))]
    atomic::compiler_fence(Ordering::SeqCst);
}

/// Generates a data synchronization barrier (`DSB`) instruction.  Unlike a
/// `DMB` this also waits for outstanding writes to reach the peripheral, which
/// matters when a write changes what the next access will observe.
#[inline]
pub fn data_synchronization_barrier() {
    #[cfg(target_arch = "arm")]
    cortex_m::asm::dsb();
    #[cfg(not(target_arch = "arm"))]
    atomic::fence(Ordering::SeqCst);
}
