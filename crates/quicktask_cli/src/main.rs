//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quicktask_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // Flutter/FFI runtime setup.
    println!("quicktask_core ping={}", quicktask_core::ping());
    println!("quicktask_core version={}", quicktask_core::core_version());
}
