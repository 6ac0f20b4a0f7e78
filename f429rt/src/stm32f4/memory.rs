//! The STM32F429 memory map, as far as the runtime cares about it.
//!
//! `memory.x` at the top of the repository describes the same map to the
//! linker.  The two must agree; the linker script checks `_estack` against
//! `STACK_TOP`.

use crate::arm_m::image::Region;
use super::vectors::VECTOR_COUNT;

/// On-chip flash.  The core fetches the vector table from its base at reset,
/// via the boot alias at address zero.
pub const FLASH: Region = Region::new(0x0800_0000, 0x0820_0000);

/// SRAM1, SRAM2 and SRAM3, which are contiguous.  The 64 KiB core-coupled
/// RAM at `0x1000_0000` is not used.
pub const SRAM: Region = Region::new(0x2000_0000, 0x2003_0000);

/// Bytes reserved for the main stack at the top of SRAM.
pub const STACK_SIZE: usize = 8 * 1024;

/// Initial main stack pointer: one past the top of SRAM.  The stack grows
/// down from here.
pub const STACK_TOP: usize = SRAM.end();

pub const STACK: Region = Region::new(STACK_TOP - STACK_SIZE, STACK_TOP);

/// Size of the ROM vector table on the target, where every entry is a
/// 32-bit word.
pub const VECTOR_TABLE_BYTES: usize = VECTOR_COUNT * 4;

pub const VECTORS: Region =
    Region::new(FLASH.start(), FLASH.start() + VECTOR_TABLE_BYTES);

/// At startup, before the RCC has been reconfigured, the STM32F4 runs from the
/// 16MHz HSI.  Nothing in this runtime changes that.
pub const BOOT_CLOCK_HZ: u32 = 16_000_000;

const _: () = assert!(STACK_TOP % 8 == 0);
const _: () = assert!(SRAM.encloses(&STACK));
const _: () = assert!(FLASH.encloses(&VECTORS));
// VTOR alignment: the table size rounded up to a power of two.
const _: () = assert!(
    FLASH.start() % VECTOR_TABLE_BYTES.next_power_of_two() == 0);
