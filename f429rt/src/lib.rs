//! Bare-metal runtime for the STM32F429.
//!
//! The `arm_m` half knows about the ARMv7-M core: the architectural exception
//! table, the memory image established at reset, and the handful of core
//! registers we touch.  The `stm32f4` half knows about the SoC: its interrupt
//! map, memory map, and the peripherals the application drives.

#![cfg_attr(not(test), no_std)]

#![deny(
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_results,
    )]

#[macro_use]
mod fmt;

pub mod arm_m;
pub mod button;
pub mod stm32f4;

#[cfg(all(target_os = "none", not(feature = "app_panic")))]
mod lang;

#[cfg(test)]
mod tests {
    /// The SoC feature names the family, which names the core.
    #[test]
    #[cfg(feature = "soc-stm32f429")]
    fn soc_feature_selects_the_core() {
        assert!(cfg!(feature = "soc_family-stm32f4_23"));
        assert!(cfg!(feature = "soc_family-stm32f4"));
        assert!(cfg!(feature = "cpu-cortex-m4f"));
    }
}
