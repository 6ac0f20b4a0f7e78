//! Support for memory-mapped registers.

use core::cell::UnsafeCell;
use core::ptr;

/// A register whose contents can be represented as `T`.  The contents are
/// accessed using `volatile` operations only, ensuring that apparently dead
/// loads and stores are not optimized away.
///
/// Memory-mapped registers are the ultimate ambient authority, and are
/// inherently shared.  Thus, registers (like cells) can be mutated through a
/// shared reference `&`, and a unique reference `&mut` to a register is not
/// particularly meaningful.  Transitively, the same applies to structs that
/// group registers together, as in a memory-mapped peripheral.
#[repr(transparent)]
pub struct Reg<T> {
    value: UnsafeCell<T>,
}

impl<T: Copy> Reg<T> {
    /// Creates a register cell in ordinary memory.  Real registers are never
    /// constructed; they are reached by casting a peripheral's base address.
    pub const fn new(value: T) -> Reg<T> {
        Reg { value: UnsafeCell::new(value) }
    }

    /// Reads the contents of the register using a volatile load.
    #[inline]
    pub fn get(&self) -> T {
        unsafe { ptr::read_volatile(self.value.get()) }
    }

    /// Replaces the contents of the register using a volatile store.
    #[inline]
    pub fn set(&self, value: T) {
        unsafe { ptr::write_volatile(self.value.get(), value) }
    }

    pub fn update<F: FnOnce(T) -> T>(&self, f: F) {
        self.set(f(self.get()))
    }
}

/// Additional features that become available when a register contains a
/// hardware-supported atomic type.
pub trait AtomicReg {
    type Type;

    /// Clears any bits in the register that are also set in `clear`.
    fn atomic_nand(&self, clear: Self::Type);

    /// Sets any bits in the register that are also set in `set`.
    fn atomic_or(&self, set: Self::Type);

    /// Clears any bits in the register that are also set in `clear`, and sets
    /// any bits set in `set`, in that order.
    ///
    /// The effect is atomic from the perspective of interrupts; if there is a
    /// race the update sequence will restart.  This means this function can
    /// produce many volatile loads, but only one store with the final result.
    fn atomic_nand_and_or(&self, clear: Self::Type, set: Self::Type);
}

impl AtomicReg for Reg<u32> {
    type Type = u32;

    #[inline]
    fn atomic_nand(&self, clear: u32) {
        self.atomic_nand_and_or(clear, 0)
    }

    #[inline]
    fn atomic_or(&self, set: u32) {
        self.atomic_nand_and_or(0, set)
    }

    #[cfg(target_arch = "arm")]
    fn atomic_nand_and_or(&self, clear: u32, set: u32) {
        loop {
            let failed: u32;
            unsafe {
                core::arch::asm!(
                    "ldrex {v}, [{p}]",
                    "bics {v}, {c}",
                    "orrs {v}, {s}",
                    "strex {f}, {v}, [{p}]",
                    p = in(reg) self.value.get(),
                    c = in(reg) clear,
                    s = in(reg) set,
                    v = out(reg) _,
                    f = out(reg) failed,
                    options(nostack),
                );
            }
            if failed == 0 { break }
        }
    }

    // Nothing preempts us here the way an ISR does on the target; this is
    // what lets drivers run against register blocks in ordinary memory.
    #[cfg(not(target_arch = "arm"))]
    fn atomic_nand_and_or(&self, clear: u32, set: u32) {
        self.update(|v| (v & !clear) | set)
    }
}
