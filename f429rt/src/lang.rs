use core::panic::PanicInfo;

/// This will be invoked on `panic!`.  Applications can override this by
/// adding the `app_panic` feature and supplying their own handler.
#[panic_handler]
fn panic(_info: &PanicInfo<'_>) -> ! {
    loop {
        core::hint::spin_loop()
    }
}
