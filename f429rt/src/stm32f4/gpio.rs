//! General Purpose I/O (GPIO) support.
//!
//! The STM32F4 GPIO unit is responsible for the pin-twiddling we usually
//! imagine as "GPIO," but also for routing peripheral functions to the outside
//! world.  Only the pin-twiddling is modeled here.

use bitflags::bitflags;

use crate::arm_m::reg::{AtomicReg, Reg};

/// A GPIO port's memory mapped registers.
#[repr(C)]
pub struct Registers {
    pub moder:   Reg<u32>,
    pub otyper:  Reg<u32>,
    pub ospeedr: Reg<u32>,
    pub pupdr:   Reg<u32>,
    pub idr:     Reg<u32>,
    pub odr:     Reg<u32>,
    pub bsrr:    Reg<u32>,
    pub lckr:    Reg<u32>,
    pub afrl:    Reg<u32>,
    pub afrh:    Reg<u32>,
}

/// Possible modes of a GPIO pin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// High-impedance state with a Schmitt trigger input filter.  `OutputType`
    /// and `Speed` are ignored in `Input` state, but `Pull` can be applied.
    Input     = 0b00,
    /// Digital output state, controlled through the GPIO port.
    Gpio      = 0b01,
    /// Peripheral alternate functions.
    Alternate = 0b10,
    /// Analog mode for use with the DAC and ADC.
    Analog    = 0b11,
}

/// Available pin output drive types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputType {
    /// Pin is driven both high and low.
    PushPull = 0,
    /// Pin is only pulled low, high side drive transistor is disabled.
    OpenDrain = 1,
}

/// Available pin output speeds.  This controls output slew rate filtering.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Speed {
    Low       = 0b00,
    Medium    = 0b01,
    High      = 0b10,
    VeryHigh  = 0b11,
}

/// Pull up/down resistor configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pull {
    /// No internal pull resistors enabled.
    None      = 0b00,
    /// Internal pull-up resistor enabled.
    Up        = 0b01,
    /// Internal pull-down resistor enabled.
    Down      = 0b10,
    /* 0b11 is reserved */
}

bitflags! {
    /// Names a group of pins on a single GPIO port.  The STM32F4 GPIO is
    /// designed so that most operations can be applied to any subset of pins
    /// for the same cost as a single pin, so we expose that oddity here.
    /// All pin configuration/alteration methods take a `PinMask` to select
    /// the affected pins.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct PinMask: u16 {
        const P0 = 1 << 0;
        const P1 = 1 << 1;
        const P2 = 1 << 2;
        const P3 = 1 << 3;
        const P4 = 1 << 4;
        const P5 = 1 << 5;
        const P6 = 1 << 6;
        const P7 = 1 << 7;
        const P8 = 1 << 8;
        const P9 = 1 << 9;
        const P10 = 1 << 10;
        const P11 = 1 << 11;
        const P12 = 1 << 12;
        const P13 = 1 << 13;
        const P14 = 1 << 14;
        const P15 = 1 << 15;
    }
}

/// GPIO port driver.
pub struct GpioPort {
    reg: *const Registers,
}

unsafe impl Sync for GpioPort {}

impl GpioPort {
    /// A driver for a register block somewhere other than a real port.
    pub const fn at(reg: *const Registers) -> GpioPort {
        GpioPort { reg }
    }

    /// Changes the mode of the pins selected by `pins` to `mode`.
    pub fn set_mode(&self, pins: PinMask, mode: Mode) {
        Self::update_2(pins, mode as u32, &self.reg().moder)
    }

    /// Changes the output type of the pins selected by `pins` to `ot`.
    pub fn set_output_type(&self, pins: PinMask, ot: OutputType) {
        Self::update_1(pins, ot as u32, &self.reg().otyper)
    }

    /// Changes the output speed of the pins selected by `pins` to `speed`.
    pub fn set_speed(&self, pins: PinMask, speed: Speed) {
        Self::update_2(pins, speed as u32, &self.reg().ospeedr)
    }

    /// Changes the pull up/down configuration of the pins selected by `pins` to
    /// `pull`.
    pub fn set_pull(&self, pins: PinMask, pull: Pull) {
        Self::update_2(pins, pull as u32, &self.reg().pupdr)
    }

    /// Reads the state of pins selected by `pins`.  The returned `PinMask`
    /// contains those pins that were observed as logic high.
    #[inline]
    pub fn get(&self, pins: PinMask) -> PinMask {
        PinMask::from_bits_truncate(self.reg().idr.get() as u16) & pins
    }

    /// Sets pins selected by `pins` to logic high.
    #[inline]
    pub fn set(&self, pins: PinMask) {
        self.reg().bsrr.set(u32::from(pins.bits()))
    }

    /// Clears pins selected by `pins` to logic low.
    #[inline]
    pub fn clear(&self, pins: PinMask) {
        self.reg().bsrr.set(u32::from(pins.bits()) << 16)
    }

    /// Inverts the output level of the pins selected by `pins`.  The new
    /// levels land in a single `BSRR` write, so pins outside `pins` are never
    /// disturbed even if an ISR changes them between our read and write.
    pub fn toggle(&self, pins: PinMask) {
        let odr = self.reg().odr.get() as u16;
        let to_set = !odr & pins.bits();
        let to_clear = odr & pins.bits();
        self.reg().bsrr.set(u32::from(to_set) | (u32::from(to_clear) << 16))
    }

    /// Internal shorthand for dereferencing our raw pointer.  The registers
    /// are only ever touched through volatile cells, so handing out shared
    /// references is fine.
    fn reg(&self) -> &Registers {
        unsafe { &*self.reg }
    }

    /// Updates a word-packed array of 1-bit fields with `val`.  The elements
    /// that are updated are those included in `pins`; others are preserved.
    fn update_1(pins: PinMask, val: u32, reg: &Reg<u32>) {
        let mask = u32::from(pins.bits());
        reg.atomic_nand_and_or(mask, mask * val)
    }

    /// Updates a word-packed array of 2-bit fields with `val`.  The elements
    /// that are updated are those included in `pins`; others are preserved.
    fn update_2(pins: PinMask, val: u32, reg: &Reg<u32>) {
        let (mask, setting) = {
            // We exploit the fact that 32-bit integer multiplication acts like
            // 32 integer adds, each controlled by one bit in the multiplicand.
            // Since multiplication is super cheap on the M4, we can construct
            // the mask and settings values efficiently by generating `0b01` in
            // each affected 2-bit field and then multiplying.
            let pins = u32::from(pins.bits());
            let mut places = 0u32;

            for i in 0..16 {
                places |= (pins & (1 << i)) << i;
            }

            (0b11 * places, val * places)
        };

        reg.atomic_nand_and_or(mask, setting)
    }
}

macro_rules! static_gpio {
    ($name:ident, $addr:expr) => {
        pub static $name: GpioPort = GpioPort {
            reg: $addr as *const Registers,
        };
    };
}

static_gpio!(GPIOA, 0x4002_0000);
static_gpio!(GPIOG, 0x4002_1800);

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_port() -> Registers {
        Registers {
            moder: Reg::new(0),
            otyper: Reg::new(0),
            ospeedr: Reg::new(0),
            pupdr: Reg::new(0),
            idr: Reg::new(0),
            odr: Reg::new(0),
            bsrr: Reg::new(0),
            lckr: Reg::new(0),
            afrl: Reg::new(0),
            afrh: Reg::new(0),
        }
    }

    #[test]
    fn mode_touches_only_selected_fields() {
        let block = fake_port();
        block.moder.set(0xffff_ffff);
        let port = GpioPort::at(&block);
        port.set_mode(PinMask::P13, Mode::Gpio);
        assert_eq!(block.moder.get(), 0xf7ff_ffff);
        port.set_mode(PinMask::P0, Mode::Input);
        assert_eq!(block.moder.get(), 0xf7ff_fffc);
    }

    #[test]
    fn speed_and_pull_are_two_bits_per_pin() {
        let block = fake_port();
        let port = GpioPort::at(&block);
        port.set_speed(PinMask::P13 | PinMask::P2, Speed::VeryHigh);
        assert_eq!(block.ospeedr.get(), (0b11 << 26) | (0b11 << 4));
        port.set_speed(PinMask::P13, Speed::Low);
        assert_eq!(block.ospeedr.get(), 0b11 << 4);
        port.set_pull(PinMask::P0, Pull::Down);
        assert_eq!(block.pupdr.get(), 0b10);
    }

    #[test]
    fn output_type_is_one_bit_per_pin() {
        let block = fake_port();
        let port = GpioPort::at(&block);
        port.set_output_type(PinMask::P13 | PinMask::P1, OutputType::OpenDrain);
        assert_eq!(block.otyper.get(), (1 << 13) | (1 << 1));
        port.set_output_type(PinMask::P13, OutputType::PushPull);
        assert_eq!(block.otyper.get(), 1 << 1);
    }

    #[test]
    fn get_masks_input_data() {
        let block = fake_port();
        block.idr.set(0b1010);
        let port = GpioPort::at(&block);
        assert_eq!(port.get(PinMask::P1 | PinMask::P0), PinMask::P1);
        assert!(port.get(PinMask::P0).is_empty());
    }

    #[test]
    fn set_and_clear_use_bsrr_halves() {
        let block = fake_port();
        let port = GpioPort::at(&block);
        port.set(PinMask::P13);
        assert_eq!(block.bsrr.get(), 1 << 13);
        port.clear(PinMask::P13);
        assert_eq!(block.bsrr.get(), 1 << 29);
    }

    #[test]
    fn toggle_inverts_from_output_latch() {
        let block = fake_port();
        let port = GpioPort::at(&block);
        block.odr.set(1 << 13);
        port.toggle(PinMask::P13 | PinMask::P14);
        assert_eq!(block.bsrr.get(), (1 << 14) | (1 << (13 + 16)));
    }
}
