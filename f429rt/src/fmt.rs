//! Logging shim.  With the `defmt` feature `trace!` forwards to `defmt`;
//! without it it evaluates nothing, so host builds need no global logger.
//!
//! Nothing may log before the reset sequence has finished: the RTT logger
//! keeps its state in `.data` and `.bss`.

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(not(feature = "defmt"))]
        { $( let _ = &$x; )* }
    }};
}
