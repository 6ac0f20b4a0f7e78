//! Button-controlled LED for the STM32F429I-DISCO: each press of the button
//! on PA0 toggles the LED on PG13.
//!
//! The firmware is only built for `thumbv7em-none-eabihf` (see `cargo fw`).
//! Any other target gets a stub, so that `cargo test --workspace` can run
//! the runtime's host tests.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware;

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("f429-button runs on the STM32F429; \
               build it with --target thumbv7em-none-eabihf");
    std::process::exit(1);
}
