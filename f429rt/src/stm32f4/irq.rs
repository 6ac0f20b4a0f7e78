//! Interrupt support for the STM32F42x/43x.
//!
//! This module provides:
//! - `enum Interrupt`, naming each vendor-specific vector by its IRQ number.
//! - `struct InterruptTable` for modeling the vendor-specific vector table.

use core::mem;

use crate::arm_m::exc::{default_trap, Handler};

/// Number of vendor-specific vectors.  RM0090 assigns every position from 0 to
/// 90 on this part, so the table has no reserved holes.
pub const IRQ_COUNT: usize = 91;

/// Enumeration of the STM32F429 interrupts.  This can be used to name an
/// interrupt vector, like an integer, but without the risk of receiving
/// out-of-range values.
///
/// Every discriminant is spelled out so the order can be checked line by line
/// against the vector table in RM0090.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Interrupt {
    Wwdg = 0,
    Pvd = 1,
    TampStamp = 2,
    RtcWkup = 3,
    Flash = 4,
    Rcc = 5,
    Exti0 = 6,
    Exti1 = 7,
    Exti2 = 8,
    Exti3 = 9,
    Exti4 = 10,
    Dma1Stream0 = 11,
    Dma1Stream1 = 12,
    Dma1Stream2 = 13,
    Dma1Stream3 = 14,
    Dma1Stream4 = 15,
    Dma1Stream5 = 16,
    Dma1Stream6 = 17,
    Adc = 18,

    Can1Tx = 19,
    Can1Rx0 = 20,
    Can1Rx1 = 21,
    Can1Sce = 22,
    Exti95 = 23,
    Tim1BrkTim9 = 24,
    Tim1UpTim10 = 25,
    Tim1TrgComTim11 = 26,
    Tim1Cc = 27,
    Tim2 = 28,
    Tim3 = 29,
    Tim4 = 30,
    I2c1Ev = 31,
    I2c1Er = 32,
    I2c2Ev = 33,
    I2c2Er = 34,
    Spi1 = 35,
    Spi2 = 36,
    Usart1 = 37,
    Usart2 = 38,
    Usart3 = 39,
    Exti1510 = 40,
    RtcAlarm = 41,
    OtgFsWkup = 42,
    Tim8BrkTim12 = 43,
    Tim8UpTim13 = 44,
    Tim8TrgComTim14 = 45,
    Tim8Cc = 46,
    Dma1Stream7 = 47,
    Fsmc = 48,
    Sdio = 49,
    Tim5 = 50,
    Spi3 = 51,
    Uart4 = 52,
    Uart5 = 53,
    Tim6Dac = 54,
    Tim7 = 55,
    Dma2Stream0 = 56,
    Dma2Stream1 = 57,
    Dma2Stream2 = 58,
    Dma2Stream3 = 59,
    Dma2Stream4 = 60,
    Eth = 61,
    EthWkup = 62,
    Can2Tx = 63,
    Can2Rx0 = 64,
    Can2Rx1 = 65,
    Can2Sce = 66,
    OtgFs = 67,
    Dma2Stream5 = 68,
    Dma2Stream6 = 69,
    Dma2Stream7 = 70,
    Usart6 = 71,
    I2c3Ev = 72,
    I2c3Er = 73,
    OtgHsEp1Out = 74,
    OtgHsEp1In = 75,
    OtgHsWkup = 76,
    OtgHs = 77,
    Dcmi = 78,
    Cryp = 79,
    HashRng = 80,
    Fpu = 81,

    Uart7 = 82,
    Uart8 = 83,
    Spi4 = 84,
    Spi5 = 85,
    Spi6 = 86,
    Sai1 = 87,
    Ltdc = 88,
    LtdcEr = 89,
    Dma2d = 90,
}

const _: () = assert!(Interrupt::Dma2d as usize == IRQ_COUNT - 1);

impl Interrupt {
    /// The IRQ number, as used by the NVIC.
    #[inline]
    pub const fn irqn(self) -> usize {
        self as usize
    }

    /// Position of this interrupt's slot in the full vector table, which
    /// starts with the sixteen architectural entries.
    #[inline]
    pub const fn vector_number(self) -> usize {
        crate::arm_m::exc::EXCEPTION_TABLE_WORDS + self as usize
    }

    pub const fn from_irqn(n: usize) -> Option<Interrupt> {
        if n < IRQ_COUNT {
            // The discriminants are dense from 0, checked above.
            Some(unsafe { mem::transmute::<u8, Interrupt>(n as u8) })
        } else {
            None
        }
    }

    /// Every interrupt, in IRQ number order.
    pub fn iter() -> impl Iterator<Item = Interrupt> {
        (0..IRQ_COUNT).filter_map(Interrupt::from_irqn)
    }
}

/// The STM32F4's vendor-specific (NVIC) vector table.  This is separate from
/// the ARMv7-M Exception Table, and must be placed immediately after it in ROM
/// or RAM.
///
/// Every slot starts out bound to `default_trap`; use `with` to claim one.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct InterruptTable {
    vectors: [Handler; IRQ_COUNT],
}

impl InterruptTable {
    /// An `InterruptTable` with all vectors defaulted.  This can be combined
    /// with `with` to easily declare a vector table containing only a few
    /// entries:
    ///
    /// ```ignore
    /// static VECTOR_TABLE: InterruptTable = InterruptTable::new()
    ///     .with(Interrupt::Adc, my_adc_handler);
    /// ```
    pub const fn new() -> InterruptTable {
        InterruptTable { vectors: [default_trap as Handler; IRQ_COUNT] }
    }

    /// Returns a copy of this table with `irq` rebound to `handler`.
    pub const fn with(mut self, irq: Interrupt, handler: Handler) -> Self {
        self.vectors[irq as usize] = handler;
        self
    }

    /// The handler currently bound to `irq`.
    #[inline]
    pub fn handler(&self, irq: Interrupt) -> Handler {
        self.vectors[irq as usize]
    }
}

impl Default for InterruptTable {
    fn default() -> Self {
        InterruptTable::new()
    }
}

const _: () = assert!(
    mem::size_of::<InterruptTable>() == IRQ_COUNT * mem::size_of::<usize>());
