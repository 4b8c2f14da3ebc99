#![allow(clippy::needless_return, clippy::redundant_field_names)]

// interface is public so the runner binary and the cases share one path to
// the kernel.
pub mod conformance;
pub mod interface;
#[cfg(test)]
mod tests;
