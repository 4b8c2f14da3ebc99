// Timer functions for Rust interface.

pub use std::time::Duration as RustDuration;
pub use std::time::Instant as RustInstant;

pub fn starttimer() -> RustInstant {
    RustInstant::now()
}

pub fn readtimer(start: RustInstant) -> RustDuration {
    start.elapsed()
}
