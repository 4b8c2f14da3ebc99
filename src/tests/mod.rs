mod harness_tests;
mod runner_tests;

use crate::conformance::constants::*;
use crate::interface;
use parking_lot::Mutex;

// Held by tests that allocate tracked socket paths or inspect the tracked set
pub static UNIX_PATH_LOCK: Mutex<()> = Mutex::new(());

// Non-blocking connected pair, so a recv on either end never hangs
pub fn nonblocking_pair() -> (interface::FileDescriptor, interface::FileDescriptor) {
    interface::socketpair(AF_UNIX, SOCK_STREAM | SOCK_NONBLOCK, 0).unwrap()
}

// True once the peer of `end` has been closed: recv reports EOF instead of
// EAGAIN.
pub fn peer_closed(end: &interface::FileDescriptor) -> bool {
    let mut buf = sizecbuf(1);
    match interface::recv(end, &mut buf, 0) {
        Ok(0) => true,
        Err(errno) if errno == interface::Errno::EAGAIN as i32 => false,
        other => panic!("unexpected recv result on probe end: {:?}", other),
    }
}

pub fn sizecbuf(size: usize) -> Box<[u8]> {
    let v = vec![0u8; size];
    v.into_boxed_slice()
}
