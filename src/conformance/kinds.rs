//! Socket kinds: a description plus a factory for fresh, unconnected
//! endpoints of one variant.

use std::fmt;
use std::sync::Arc;

use crate::conformance::constants::*;
use crate::interface;

type SocketFactory = Arc<dyn Fn() -> Result<interface::FileDescriptor, i32> + Send + Sync>;

#[derive(Clone)]
pub struct SocketKind {
    pub description: String,
    create: SocketFactory,
}

impl SocketKind {
    pub fn new<F>(description: impl Into<String>, create: F) -> SocketKind
    where
        F: Fn() -> Result<interface::FileDescriptor, i32> + Send + Sync + 'static,
    {
        SocketKind {
            description: description.into(),
            create: Arc::new(create),
        }
    }

    /// Each call yields a new descriptor owned by the caller.
    pub fn create(&self) -> Result<interface::FileDescriptor, i32> {
        (self.create)()
    }
}

impl fmt::Debug for SocketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketKind")
            .field("description", &self.description)
            .finish()
    }
}

/// Prefix naming the creation flags folded into a socket type.
pub fn describe_socket_type(socktype: i32) -> String {
    let mut description = String::new();
    if socktype & SOCK_NONBLOCK != 0 {
        description.push_str("non-blocking ");
    }
    if socktype & SOCK_CLOEXEC != 0 {
        description.push_str("close-on-exec ");
    }
    description
}

fn unbound_socket_kind(label: &str, domain: i32, socktype: i32, protocol: i32) -> SocketKind {
    SocketKind::new(
        format!("{}{}", describe_socket_type(socktype), label),
        move || interface::socket(domain, socktype, protocol),
    )
}

/// `flags` may carry SOCK_NONBLOCK and SOCK_CLOEXEC.
pub fn ipv4_tcp_unbound_socket(flags: i32) -> SocketKind {
    unbound_socket_kind("IPv4 TCP socket", AF_INET, SOCK_STREAM | flags, IPPROTO_TCP)
}

pub fn ipv6_tcp_unbound_socket(flags: i32) -> SocketKind {
    unbound_socket_kind("IPv6 TCP socket", AF_INET6, SOCK_STREAM | flags, IPPROTO_TCP)
}

pub fn unix_domain_socket(socktype: i32) -> SocketKind {
    let base = match socktype & SOCK_TYPE_MASK {
        SOCK_STREAM => "stream",
        SOCK_DGRAM => "datagram",
        SOCK_SEQPACKET => "seqpacket",
        _ => "unknown",
    };
    unbound_socket_kind(
        &format!("UDS {} socket", base),
        AF_UNIX,
        socktype,
        PF_UNIX,
    )
}
