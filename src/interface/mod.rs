//! Module definitions for the kernel-call interface
//!
//! ## Interface Module
//!
//! Every call into the host kernel goes through this module. The conformance
//! cases never touch `libc` directly; they use the wrappers here, which
//! return the raw errno as their error so assertions can name it.
//!
//! The module also owns the helpers cases lean on: scoped descriptor
//! ownership, unique local-domain path allocation, and the probe that tells
//! the reference host apart from an emulated one.

mod comm;
pub mod errnos;
mod file;
mod misc;
mod timer;
pub use comm::*;
pub use errnos::*;
pub use file::*;
pub use misc::*;
pub use timer::*;
