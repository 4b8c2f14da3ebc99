//! Conformance cases for socket creation and early-lifecycle syscalls, and
//! the harness that runs them.
//!
//! ## top-level features:
//!
//! - ### Cases:
//!     - Fixed-matrix creation checks for local-domain and internet-domain
//!       (family, type, protocol) triples, plus socketpair with an explicit
//!       local-domain protocol.
//!     - recv on an unconnected stream socket, per socket kind.
//!     - open(2) on the path of a bound local-domain socket, per open mode.
//!       Skipped on an emulated host.
//!
//! - ### Harness:
//!     - Precondition (`assert_*`) and expectation (`expect_*`) assertions,
//!       Pass/Fail/Skip verdicts, and parameterized instantiation with
//!       sanitized case names.
//!
//! - ### Runner:
//!     - gtest-style filters, optional parallel execution, text and JSON
//!       reports.

pub mod constants;
pub mod error;
pub mod harness;
pub mod kinds;
pub mod runner;
pub mod socket_cases;
