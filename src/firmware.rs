use defmt_rtt as _;
use panic_probe as _;

use f429rt::arm_m::exc::Exception;
use f429rt::init_hooks;
use f429rt::arm_m::startup::{self, _reset_vector};
use f429rt::button::{Debounce, Event, Polarity};
use f429rt::stm32f4::gpio::{self, PinMask, GPIOA, GPIOG};
use f429rt::stm32f4::memory;
use f429rt::stm32f4::rcc::{AhbPeripheral, RCC};
use f429rt::stm32f4::vectors::VectorTable;

/// User button.  The board wiring pulls the line low while it's held; flip
/// `BUTTON_POLARITY` for a button that drives it high instead.
const BUTTON: PinMask = PinMask::P0;
const BUTTON_POLARITY: Polarity = Polarity::ActiveLow;

/// Green user LED, LD3.
const LED: PinMask = PinMask::P13;

/// Time between button samples: 10ms at the boot clock.  Longer than the
/// switch bounces, short enough that a press feels immediate.
const POLL_DELAY_CYCLES: u32 = memory::BOOT_CLOCK_HZ / 100;

/// The application entry point, called once the runtime is established.
/// Interrupts are still masked, and this loop never unmasks them.
#[no_mangle]
fn main() -> ! {
    let layout = startup::linked_layout();
    defmt::info!("up: {=usize}B .data, {=usize}B .bss",
                 layout.data.len(), layout.bss.len());
    if let Err(e) = layout.validate(memory::FLASH,
                                    memory::SRAM,
                                    memory::VECTORS,
                                    memory::STACK) {
        defmt::panic!("linked image is unsound: {}", e);
    }

    let mut button = Debounce::new(BUTTON_POLARITY);

    loop {
        let level = GPIOA.get(BUTTON).contains(BUTTON);
        if let Some(event) = button.sample(level) {
            defmt::debug!("button: {}", event);
            if event == Event::Pressed {
                GPIOG.toggle(LED);
            }
        }
        cortex_m::asm::delay(POLL_DELAY_CYCLES);
    }
}

/// Brings up the two GPIO ports and configures the pins, before `main`.
extern "C" fn configure_pins() {
    RCC.enable_clock(AhbPeripheral::GpioA);
    RCC.enable_clock(AhbPeripheral::GpioG);

    GPIOA.set_mode(BUTTON, gpio::Mode::Input);
    GPIOA.set_pull(BUTTON, gpio::Pull::None);

    GPIOG.set_mode(LED, gpio::Mode::Gpio);
    GPIOG.set_output_type(LED, gpio::OutputType::PushPull);
    GPIOG.set_speed(LED, gpio::Speed::Low);
    GPIOG.set_pull(LED, gpio::Pull::None);
}

init_hooks! {
    pub init_hook CONFIGURE_PINS = configure_pins;
}

/// Faults here are bugs, not conditions to recover from.  We say so over RTT
/// and stop in the debugger; every other vector stays on the runtime's silent
/// trap.
extern "C" fn hard_fault() {
    defmt::error!("HardFault");
    cortex_m::asm::bkpt();
    loop {
        cortex_m::asm::nop()
    }
}

/// The ROM vector table.  `link.x` places `.isr_vector` at the base of flash,
/// where the processor reads it after reset, and keeps it alive with
/// `EXTERN(ISR_VECTORS)`.
#[no_mangle]
#[link_section = ".isr_vector"]
pub static ISR_VECTORS: VectorTable = VectorTable::standard(_reset_vector)
    .with_exception(Exception::HardFault, hard_fault);
