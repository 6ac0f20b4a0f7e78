/// ARMvx-M interrupt and exception handlers are merely functions conforming to
/// the C ABI.
pub type Handler = extern "C" fn();

/// The reset vector is special: it must not return.  We can model this nicely
/// in Rust's type system as a diverging function.  We additionally mark the
/// reset handler as `unsafe` because it must do scary stuff, including zeroing
/// BSS.  Allowing a safe program to call it directly would be bad.
pub type ResetHandler = unsafe extern "C" fn() -> !;

/// A vector table slot the architecture or vendor has reserved.  The only
/// value it can hold is zero, so nothing can ever be dispatched through it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct Reserved(usize);

impl Reserved {
    pub const ZERO: Reserved = Reserved(0);
}

/// The fallback bound to every vector slot that the application does not
/// claim.  Arriving here means an exception fired that nobody expected; we
/// stop making forward progress so that it shows up as a hang under the
/// debugger (or a watchdog reset) rather than as a jump into whatever happens
/// to be at address zero.
pub extern "C" fn default_trap() {
    loop {
        core::hint::spin_loop()
    }
}

/// The architecturally defined exceptions that can be bound to a handler.
/// Discriminants are positions in the vector table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Exception {
    Nmi = 2,
    HardFault = 3,
    MemManage = 4,
    BusFault = 5,
    UsageFault = 6,
    SvCall = 11,
    DebugMonitor = 12,
    PendSv = 14,
    SysTick = 15,
}

impl Exception {
    pub const ALL: [Exception; 9] = [
        Exception::Nmi,
        Exception::HardFault,
        Exception::MemManage,
        Exception::BusFault,
        Exception::UsageFault,
        Exception::SvCall,
        Exception::DebugMonitor,
        Exception::PendSv,
        Exception::SysTick,
    ];

    /// Position of this exception's slot in the vector table.
    #[inline]
    pub const fn vector_number(self) -> usize {
        self as usize
    }

    /// Maps a vector table position back to the exception occupying it.
    /// Positions 0 and 1 (stack and reset), the reserved positions, and
    /// anything from 16 upwards (vendor interrupts) give `None`.
    pub const fn from_vector_number(n: usize) -> Option<Exception> {
        match n {
            2 => Some(Exception::Nmi),
            3 => Some(Exception::HardFault),
            4 => Some(Exception::MemManage),
            5 => Some(Exception::BusFault),
            6 => Some(Exception::UsageFault),
            11 => Some(Exception::SvCall),
            12 => Some(Exception::DebugMonitor),
            14 => Some(Exception::PendSv),
            15 => Some(Exception::SysTick),
            _ => None,
        }
    }
}

/// Number of words in the architectural part of the vector table, counting
/// the initial stack pointer and reset vector.
pub const EXCEPTION_TABLE_WORDS: usize = 16;

/// Represents an ARMvx-M exception table.  This is the common table of vectors
/// used for handling interrupts and initializing the processor on -M
/// processors.
///
/// Unlike a table of `Option<Handler>`, every bindable slot here holds a real
/// function: slots start out bound to `default_trap` and are rebound one at a
/// time with `with`.  The reserved slots are `Reserved` and always zero.
///
/// Note that processors will typically have a *two-part* vector table: first
/// come the exception vectors (described here), immediately followed by
/// vendor-specific interrupt vectors handled through the NVIC.  See
/// `stm32f4::vectors` for the concatenation.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct ExceptionTable {
    /// ARMvx-M processors load their initial stack pointer from the first word
    /// of the vector table.  This will be the contents of `sp` on entry to
    /// `reset` below.
    ///
    /// Remember that ARM uses a "full descending" stack, so `sp` points to the
    /// most recently *used* cell of the stack.  Thus, the initial `sp` when the
    /// stack is empty often points just past the end of RAM.  We model it here
    /// as a `const` pointer to discourage such an invalid address from being
    /// dereferenced.
    pub initial_stack: *const u32,

    /// Reset vector.  At reset, the processor loads its stack pointer from
    /// `initial_stack` (above) and then enters this function using the ARM
    /// AAPCS C ABI.
    pub reset: ResetHandler,

    /// Non-Maskable Interrupt handler.
    pub nmi:          Handler,
    /// Hard Fault handler.
    pub hard_fault:   Handler,
    /// Memory Management Fault handler.
    pub mm_fault:     Handler,
    /// Bus Fault handler.
    pub bus_fault:    Handler,
    /// Usage Fault handler.
    pub usage_fault:  Handler,
    pub _reserved0:   Reserved,
    pub _reserved1:   Reserved,
    pub _reserved2:   Reserved,
    pub _reserved3:   Reserved,
    /// Supervisor Call (`SVC`) handler.
    pub sv_call:      Handler,
    /// Debug Monitor handler.
    pub debug_mon:    Handler,
    pub _reserved4:   Reserved,
    /// PendSV handler.
    pub pend_sv:      Handler,
    /// SysTick handler.
    pub sys_tick:     Handler,
}

impl ExceptionTable {
    /// An exception table with every exception bound to `default_trap`.  In
    /// practice, this is used with the builder methods or with functional
    /// struct update syntax like so:
    ///
    /// ```ignore
    /// pub static VECTORS: ExceptionTable = ExceptionTable {
    ///     hard_fault: my_hard_fault_handler,
    ///     .. ExceptionTable::new(stack_pointer, reset_handler)
    /// };
    /// ```
    pub const fn new(initial_stack: *const u32,
                     reset: ResetHandler) -> ExceptionTable {
        ExceptionTable {
            initial_stack,
            reset,

            nmi: default_trap,
            hard_fault: default_trap,
            mm_fault: default_trap,
            bus_fault: default_trap,
            usage_fault: default_trap,
            _reserved0: Reserved::ZERO,
            _reserved1: Reserved::ZERO,
            _reserved2: Reserved::ZERO,
            _reserved3: Reserved::ZERO,
            sv_call: default_trap,
            debug_mon: default_trap,
            _reserved4: Reserved::ZERO,
            pend_sv: default_trap,
            sys_tick: default_trap,
        }
    }

    /// Returns a copy of this table with `exc` rebound to `handler`.  All other
    /// slots are left as they were.
    pub const fn with(mut self, exc: Exception, handler: Handler) -> Self {
        match exc {
            Exception::Nmi => self.nmi = handler,
            Exception::HardFault => self.hard_fault = handler,
            Exception::MemManage => self.mm_fault = handler,
            Exception::BusFault => self.bus_fault = handler,
            Exception::UsageFault => self.usage_fault = handler,
            Exception::SvCall => self.sv_call = handler,
            Exception::DebugMonitor => self.debug_mon = handler,
            Exception::PendSv => self.pend_sv = handler,
            Exception::SysTick => self.sys_tick = handler,
        }
        self
    }

    /// The handler currently bound to `exc`.
    pub fn handler(&self, exc: Exception) -> Handler {
        match exc {
            Exception::Nmi => self.nmi,
            Exception::HardFault => self.hard_fault,
            Exception::MemManage => self.mm_fault,
            Exception::BusFault => self.bus_fault,
            Exception::UsageFault => self.usage_fault,
            Exception::SvCall => self.sv_call,
            Exception::DebugMonitor => self.debug_mon,
            Exception::PendSv => self.pend_sv,
            Exception::SysTick => self.sys_tick,
        }
    }
}

const WORD: usize = core::mem::size_of::<usize>();

const _: () = assert!(
    core::mem::size_of::<ExceptionTable>() == EXCEPTION_TABLE_WORDS * WORD);
const _: () = assert!(core::mem::offset_of!(ExceptionTable, reset) == 1 * WORD);
const _: () = assert!(core::mem::offset_of!(ExceptionTable, nmi) == 2 * WORD);
const _: () = assert!(
    core::mem::offset_of!(ExceptionTable, usage_fault) == 6 * WORD);
const _: () = assert!(
    core::mem::offset_of!(ExceptionTable, _reserved0) == 7 * WORD);
const _: () = assert!(core::mem::offset_of!(ExceptionTable, sv_call) == 11 * WORD);
const _: () = assert!(
    core::mem::offset_of!(ExceptionTable, _reserved4) == 13 * WORD);
const _: () = assert!(core::mem::offset_of!(ExceptionTable, sys_tick) == 15 * WORD);

/// Most programs will have at least one `ExceptionTable` `static`: the one that
/// gets deposited into ROM and read at processor startup.
///
/// To support a `static` `ExceptionTable`, the type must be `Sync`.  It is
/// *almost* `Sync` out of the box.  The exception: the pointer used for the
/// `initial_stack` item, which is never dereferenced by software.
unsafe impl Sync for ExceptionTable {}
