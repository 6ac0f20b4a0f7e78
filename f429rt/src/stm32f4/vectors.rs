//! The complete STM32F429 vector table: the ARMv7-M exception table followed
//! directly by the vendor interrupt table.
//!
//! Binding works like weak symbols in a C startup file, just resolved by the
//! compiler instead of the linker: every slot starts out pointing at
//! `default_trap`, and the application's `static` rebinds the slots it cares
//! about.
//!
//! ```ignore
//! #[link_section = ".isr_vector"]
//! #[no_mangle]
//! pub static ISR_VECTORS: VectorTable = VectorTable::standard(_reset_vector)
//!     .with_exception(Exception::HardFault, on_hard_fault)
//!     .with_interrupt(Interrupt::Exti0, on_button);
//! ```

use core::mem;

use crate::arm_m::exc::{
    Exception, ExceptionTable, Handler, ResetHandler, EXCEPTION_TABLE_WORDS,
};
use super::irq::{Interrupt, InterruptTable, IRQ_COUNT};
use super::memory;

/// Number of entries in the table, including the initial stack pointer.
pub const VECTOR_COUNT: usize = EXCEPTION_TABLE_WORDS + IRQ_COUNT;

#[derive(Copy, Clone)]
#[repr(C)]
pub struct VectorTable {
    pub exceptions: ExceptionTable,
    pub interrupts: InterruptTable,
}

const WORD: usize = mem::size_of::<usize>();

const _: () = assert!(mem::size_of::<VectorTable>() == VECTOR_COUNT * WORD);
const _: () = assert!(
    mem::offset_of!(VectorTable, interrupts) == EXCEPTION_TABLE_WORDS * WORD);

impl VectorTable {
    /// A table with every exception and interrupt bound to `default_trap`.
    pub const fn new(initial_stack: *const u32,
                     reset: ResetHandler) -> VectorTable {
        VectorTable {
            exceptions: ExceptionTable::new(initial_stack, reset),
            interrupts: InterruptTable::new(),
        }
    }

    /// Like `new`, with the initial stack at the top of SRAM.
    pub const fn standard(reset: ResetHandler) -> VectorTable {
        VectorTable::new(memory::STACK_TOP as *const u32, reset)
    }

    pub const fn with_exception(mut self,
                                exc: Exception,
                                handler: Handler) -> Self {
        self.exceptions = self.exceptions.with(exc, handler);
        self
    }

    pub const fn with_interrupt(mut self,
                                irq: Interrupt,
                                handler: Handler) -> Self {
        self.interrupts = self.interrupts.with(irq, handler);
        self
    }

    pub fn initial_stack(&self) -> *const u32 {
        self.exceptions.initial_stack
    }

    pub fn reset(&self) -> ResetHandler {
        self.exceptions.reset
    }

    /// The handler the processor would enter for vector `n`.  The stack and
    /// reset entries, the reserved entries, and anything past the end give
    /// `None`.
    pub fn handler(&self, n: usize) -> Option<Handler> {
        if n < EXCEPTION_TABLE_WORDS {
            Exception::from_vector_number(n)
                .map(|exc| self.exceptions.handler(exc))
        } else {
            Interrupt::from_irqn(n - EXCEPTION_TABLE_WORDS)
                .map(|irq| self.interrupts.handler(irq))
        }
    }

    /// The table as the hardware sees it.
    pub fn as_words(&self) -> &[usize; VECTOR_COUNT] {
        // Every field is a pointer-sized word, and the size is checked above.
        unsafe { &*(self as *const VectorTable as *const [usize; VECTOR_COUNT]) }
    }
}
