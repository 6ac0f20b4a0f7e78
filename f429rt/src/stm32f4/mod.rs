//! Support for the STM32F4 series of SoCs, specifically the STM32F42x/43x.

pub mod gpio;
pub mod irq;
pub mod memory;
pub mod rcc;
pub mod vectors;
