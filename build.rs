//! Puts the linker scripts where the linker can find them.  Which scripts are
//! used is decided by the rustflags in `.cargo/config.toml`.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR unset"));

    for script in ["memory.x", "link.x"] {
        fs::copy(script, out.join(script))
            .unwrap_or_else(|e| panic!("copying {}: {}", script, e));
        println!("cargo:rerun-if-changed={}", script);
    }

    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=build.rs");
}
