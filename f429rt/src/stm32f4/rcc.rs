//! Reset and Clock Control (RCC) support.
//!
//! Only clock gating for the AHB buses is modeled.  The clock tree itself is
//! left as reset configured it; see `memory::BOOT_CLOCK_HZ`.

use crate::arm_m;
use crate::arm_m::reg::{AtomicReg, Reg};

const RCC_ADDRESS: usize = 0x4002_3800;

/// The RCC's hardware register layout, up to the AHB enable registers.
#[repr(C)]
pub struct Registers {
    pub cr:            Reg<u32>,
    pub pllcfgr:       Reg<u32>,
    pub cfgr:          Reg<u32>,
    pub cir:           Reg<u32>,
    /// AHB peripheral reset registers AHB1RSTR - AHB3RSTR.
    pub ahb_rstr:      [Reg<u32>; 3],
    pub _reserved_1c:  Reg<u32>,
    /// APB peripheral reset registers APB1RSTR - APB2RSTR.
    pub apb_rstr:      [Reg<u32>; 2],
    pub _reserved_28:  Reg<u32>,
    pub _reserved_2c:  Reg<u32>,
    /// AHB clock enable registers AHB1ENR - AHB3ENR.
    ///
    /// Note that they are numbered from zero in this array.
    pub ahb_enr:       [Reg<u32>; 3],
}

const _: () = assert!(core::mem::offset_of!(Registers, ahb_enr) == 0x30);

/// Names the processor's AHB buses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AhbBus {
    Ahb1 = 0,
    Ahb2 = 1,
    Ahb3 = 2,
}

/// Names the AHB-connected peripherals whose clocks can be gated.  The
/// discriminant packs the bus into the low byte and the enable bit index into
/// the next.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum AhbPeripheral {
    GpioA = (AhbBus::Ahb1 as u32) | (0 << 8),
    GpioB = (AhbBus::Ahb1 as u32) | (1 << 8),
    GpioC = (AhbBus::Ahb1 as u32) | (2 << 8),
    GpioD = (AhbBus::Ahb1 as u32) | (3 << 8),
    GpioE = (AhbBus::Ahb1 as u32) | (4 << 8),
    GpioF = (AhbBus::Ahb1 as u32) | (5 << 8),
    GpioG = (AhbBus::Ahb1 as u32) | (6 << 8),
    GpioH = (AhbBus::Ahb1 as u32) | (7 << 8),
    GpioI = (AhbBus::Ahb1 as u32) | (8 << 8),
    GpioJ = (AhbBus::Ahb1 as u32) | (9 << 8),
    GpioK = (AhbBus::Ahb1 as u32) | (10 << 8),
    Crc = (AhbBus::Ahb1 as u32) | (12 << 8),
    Dma1 = (AhbBus::Ahb1 as u32) | (21 << 8),
    Dma2 = (AhbBus::Ahb1 as u32) | (22 << 8),
    Dma2d = (AhbBus::Ahb1 as u32) | (23 << 8),

    Dcmi = (AhbBus::Ahb2 as u32) | (0 << 8),
    Rng = (AhbBus::Ahb2 as u32) | (6 << 8),

    Fmc = (AhbBus::Ahb3 as u32) | (0 << 8),
}

impl AhbPeripheral {
    #[inline]
    pub fn bus_index(self) -> usize {
        ((self as u32) & 0xFF) as usize
    }

    #[inline]
    pub fn bit_index(self) -> u32 {
        ((self as u32) >> 8) & 0x1F
    }
}

/// RCC driver.
pub struct Rcc {
    reg: *const Registers,
}

unsafe impl Sync for Rcc {}

pub static RCC: Rcc = Rcc { reg: RCC_ADDRESS as *const Registers };

impl Rcc {
    /// A driver for a register block somewhere other than the real RCC.
    pub const fn at(reg: *const Registers) -> Rcc {
        Rcc { reg }
    }

    fn reg(&self) -> &Registers {
        unsafe { &*self.reg }
    }

    /// Enables clock to peripheral `p`.
    ///
    /// The implementation uses barriers to ensure that the clock is enabled
    /// before return.  This works around ST's erratum 2.1.13.
    pub fn enable_clock(&self, p: AhbPeripheral) {
        trace!("clock on: {}", p);
        self.reg().ahb_enr[p.bus_index()].atomic_or(1 << p.bit_index());
        arm_m::data_synchronization_barrier();
    }

    pub fn is_clock_enabled(&self, p: AhbPeripheral) -> bool {
        self.reg().ahb_enr[p.bus_index()].get() & (1 << p.bit_index()) != 0
    }
}
