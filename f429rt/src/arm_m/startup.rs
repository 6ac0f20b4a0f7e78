//! Rust runtime startup support for ARMvx-M bare metal targets.
//!
//! To make use of this module, put `_reset_vector` in the reset slot of your
//! vector table, and define your application entry point like so:
//!
//! ```ignore
//! #[no_mangle]
//! fn main() -> ! {
//!     // code here
//!     loop {}
//! }
//! ```
//!
//! Before `main` runs, the FPU has been switched on (on parts that have one),
//! `.data` has been copied out of flash, `.bss` has been zeroed, and every init
//! hook has been called, in that order.  Interrupts are masked the whole time;
//! `PRIMASK` is still set when `main` is entered, and it's up to the
//! application to clear it once it's ready to take interrupts.

use core::{mem, ptr, slice};

use crate::arm_m;
use crate::arm_m::image::{MemoryLayout, Region};
#[cfg(feature = "cpu-cortex-m4f")]
use crate::arm_m::scb::SCB;

/// The startup routine can call functions after data is initialized, but
/// before main.  Functions must be of this type.
pub type InitHook = extern "C" fn();

extern "C" {
    /// Load address of the `.data` image in flash.
    static _sidata: u8;
    static mut _sdata: u8;
    static mut _edata: u8;
    static mut _sbss: u8;
    static mut _ebss: u8;

    static __init_hooks_start: InitHook;
    static __init_hooks_end: InitHook;
}

extern "Rust" {
    /// The application.  It must not return.
    fn main() -> !;
}

/// The memory image described by the linker script.  Only the addresses of
/// the boundary symbols are used; nothing is read through them.
pub fn linked_layout() -> MemoryLayout {
    unsafe {
        MemoryLayout {
            data_load: ptr::addr_of!(_sidata) as usize,
            data: Region::new(ptr::addr_of!(_sdata) as usize,
                              ptr::addr_of!(_edata) as usize),
            bss: Region::new(ptr::addr_of!(_sbss) as usize,
                             ptr::addr_of!(_ebss) as usize),
        }
    }
}

/// This function will be "called" by the processor at reset.  Note that none of
/// the Rust environment has been established --- in particular, nothing in
/// here may touch a `static` in RAM until `initialize` has returned.  The
/// driver statics like `SCB` are immutable and live in flash.
///
/// The FPU comes on first: this is a hard-float target, and the compiler is
/// free to use VFP registers in any code after this point.
#[no_mangle]
pub unsafe extern "C" fn _reset_vector() -> ! {
    arm_m::mask_interrupts();
    #[cfg(feature = "cpu-cortex-m4f")]
    SCB.enable_fpu();
    linked_layout().initialize();
    run_init_hooks();
    main()
}

unsafe fn run_init_hooks() {
    let start = ptr::addr_of!(__init_hooks_start);
    let end = ptr::addr_of!(__init_hooks_end);
    let count = (end as usize).saturating_sub(start as usize)
        / mem::size_of::<InitHook>();

    trace!("running {=usize} init hooks", count);
    for hook in slice::from_raw_parts(start, count) {
        hook()
    }
}

/// Defines one or more init hooks, which are functions that will be called
/// after the basic Rust runtime invariants have been established, but before
/// main.  Hooks run in link order.
///
/// Syntax:
///
/// ```ignore
/// extern "C" fn my_init_hook() {
///     activate_lasers()
/// }
///
/// init_hooks! {
///     pub init_hook MY_INIT_HOOK = my_init_hook;
/// }
/// ```
#[macro_export]
macro_rules! init_hooks {
    (
        $(
            $(#[$m:meta])*
            pub init_hook $name:ident = $f:path;
        )*
    ) => {
        $(
            $(#[$m])*
            #[link_section = ".init_hooks"]
            #[used]
            pub static $name: $crate::arm_m::startup::InitHook = $f;
        )*
    };
}
