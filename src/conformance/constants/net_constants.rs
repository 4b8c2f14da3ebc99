// Network related constants

pub const SOCK_STREAM: i32 = libc::SOCK_STREAM; //stream socket
pub const SOCK_DGRAM: i32 = libc::SOCK_DGRAM; //datagram socket
pub const SOCK_SEQPACKET: i32 = libc::SOCK_SEQPACKET; //sequenced packet stream
pub const SOCK_CLOEXEC: i32 = libc::SOCK_CLOEXEC;
pub const SOCK_NONBLOCK: i32 = libc::SOCK_NONBLOCK;
pub const SOCK_TYPE_MASK: i32 = 0xf;

pub const AF_UNIX: i32 = libc::AF_UNIX; /* Unix domain sockets   */
pub const AF_INET: i32 = libc::AF_INET; /* Internet IP Protocol  */
pub const AF_INET6: i32 = libc::AF_INET6; /* IP version 6   */

/* Protocol families, same as address families. */
pub const PF_UNIX: i32 = libc::PF_UNIX;

pub const IPPROTO_TCP: i32 = libc::IPPROTO_TCP;
pub const IPPROTO_UDP: i32 = libc::IPPROTO_UDP;

pub fn domain_name(domain: i32) -> String {
    match domain {
        AF_UNIX => "AF_UNIX".to_string(),
        AF_INET => "AF_INET".to_string(),
        AF_INET6 => "AF_INET6".to_string(),
        other => other.to_string(),
    }
}

// Base type name plus any creation flags, e.g. SOCK_STREAM|SOCK_NONBLOCK
pub fn socktype_name(socktype: i32) -> String {
    let mut name = match socktype & SOCK_TYPE_MASK {
        SOCK_STREAM => "SOCK_STREAM".to_string(),
        SOCK_DGRAM => "SOCK_DGRAM".to_string(),
        SOCK_SEQPACKET => "SOCK_SEQPACKET".to_string(),
        other => other.to_string(),
    };
    if socktype & SOCK_NONBLOCK != 0 {
        name.push_str("|SOCK_NONBLOCK");
    }
    if socktype & SOCK_CLOEXEC != 0 {
        name.push_str("|SOCK_CLOEXEC");
    }
    name
}

// Protocol values depend on the family: PF_UNIX (== 1) is also IPPROTO_ICMP
pub fn protocol_name(domain: i32, protocol: i32) -> String {
    match (domain, protocol) {
        (AF_UNIX, PF_UNIX) => "PF_UNIX".to_string(),
        (AF_INET | AF_INET6, IPPROTO_TCP) => "IPPROTO_TCP".to_string(),
        (AF_INET | AF_INET6, IPPROTO_UDP) => "IPPROTO_UDP".to_string(),
        (_, other) => other.to_string(),
    }
}
