//! Host ABI constants the cases use, named as the C headers name them.

pub mod fs_constants;
pub mod net_constants;
pub use fs_constants::*;
pub use net_constants::*;
