//! Build script for keypad-game.

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rustc-check-cfg=cfg(rust_analyzer)");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
    let target = env::var("TARGET").expect("cargo sets TARGET");

    // Pick the linker memory layout for the board we are building for.
    // Host builds (tests) need no memory.x at all.
    let memory_file = if target.starts_with("thumbv8m") {
        Some("memory-pico2.x")
    } else if target.starts_with("thumbv6m") {
        Some("memory-pico1.x")
    } else {
        None
    };

    if let Some(memory_file) = memory_file {
        let memory_x =
            fs::read_to_string(memory_file).unwrap_or_else(|_| panic!("Failed to read {memory_file}"));
        let dest = out_dir.join("memory.x");
        fs::write(&dest, memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rerun-if-changed={memory_file}");

        // Linker scripts used by cortex-m-rt, defmt, and the rp boot2 section.
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        if target.starts_with("thumbv6m") {
            println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
        }
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}
