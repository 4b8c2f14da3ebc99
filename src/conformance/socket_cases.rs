//! Socket creation and early-lifecycle cases.

use std::fmt;

use crate::conformance::constants::*;
use crate::conformance::harness::{case_name, instantiate, CaseContext, CaseResult, TestCase};
use crate::conformance::kinds::{self, SocketKind};
use crate::interface::{self, Errno};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triple {
    pub domain: i32,
    pub socktype: i32,
    pub protocol: i32,
}

impl Triple {
    pub const fn new(domain: i32, socktype: i32, protocol: i32) -> Triple {
        Triple {
            domain,
            socktype,
            protocol,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            domain_name(self.domain),
            socktype_name(self.socktype),
            protocol_name(self.domain, self.protocol)
        )
    }
}

pub const UNIX_TRIPLES: [Triple; 3] = [
    Triple::new(AF_UNIX, SOCK_STREAM, PF_UNIX),
    Triple::new(AF_UNIX, SOCK_SEQPACKET, PF_UNIX),
    Triple::new(AF_UNIX, SOCK_DGRAM, PF_UNIX),
];

pub const INET_TRIPLES: [Triple; 2] = [
    Triple::new(AF_INET, SOCK_DGRAM, IPPROTO_UDP),
    Triple::new(AF_INET, SOCK_STREAM, IPPROTO_TCP),
];

pub const OPEN_MODES: [i32; 2] = [O_RDONLY, O_RDWR];

/// Every case in the suite, in registration order.
pub fn all_cases() -> Vec<TestCase> {
    let mut cases = vec![
        TestCase::new(case_name("SocketTest", "UnixSocketPairProtocol"), unix_socket_pair_protocol),
        TestCase::new(case_name("SocketTest", "ProtocolUnix"), protocol_unix),
        TestCase::new(case_name("SocketTest", "ProtocolInet"), protocol_inet),
    ];
    cases.extend(instantiate(
        "TCPSocketTest",
        "TCPSocketTest",
        "RecvOnClosedSocket",
        tcp_socket_kinds(),
        |_, kind: &SocketKind| kind.description.clone(),
        recv_on_closed_socket,
    ));
    cases.extend(instantiate(
        "OpenModes",
        "SocketOpenTest",
        "Unix",
        OPEN_MODES.to_vec(),
        |_, mode: &i32| open_mode_name(*mode),
        unix_socket_open,
    ));
    cases
}

pub fn tcp_socket_kinds() -> Vec<SocketKind> {
    vec![
        kinds::ipv4_tcp_unbound_socket(0),
        kinds::ipv6_tcp_unbound_socket(0),
    ]
}

/// Each triple must create a socket; the descriptor is dropped right away.
pub fn check_triples_create(ctx: &mut CaseContext, triples: &[Triple]) -> CaseResult {
    for triple in triples {
        let call = format!("socket({})", triple);
        let _sock = ctx.assert_succeeds(
            &call,
            interface::socket(triple.domain, triple.socktype, triple.protocol),
        )?;
    }
    Ok(())
}

pub fn protocol_unix(ctx: &mut CaseContext) -> CaseResult {
    check_triples_create(ctx, &UNIX_TRIPLES)
}

pub fn protocol_inet(ctx: &mut CaseContext) -> CaseResult {
    check_triples_create(ctx, &INET_TRIPLES)
}

// The protocol goes through as PF_UNIX, not 0: accepting it is the point.
pub fn unix_socket_pair_protocol(ctx: &mut CaseContext) -> CaseResult {
    let triple = Triple::new(AF_UNIX, SOCK_STREAM, PF_UNIX);
    let (first, second) = ctx.assert_succeeds(
        &format!("socketpair({})", triple),
        interface::socketpair(triple.domain, triple.socktype, triple.protocol),
    )?;

    ctx.expect_true(
        first.get() >= 0 && second.get() >= 0,
        "both socketpair descriptors to be nonnegative",
    );
    ctx.expect_true(
        first.get() != second.get(),
        "socketpair descriptors to be distinct",
    );

    ctx.expect_succeeds("close(socks[0])", first.close());
    ctx.expect_succeeds("close(socks[1])", second.close());
    Ok(())
}

pub fn recv_on_closed_socket(ctx: &mut CaseContext, kind: &SocketKind) -> CaseResult {
    let sock = ctx.assert_succeeds(&format!("create {}", kind.description), kind.create())?;
    let mut buf = [0u8; 1];

    ctx.expect_fails_with("recv(fd, buf, 0, 0)", interface::recv(&sock, &mut buf[..0], 0), Errno::ENOTCONN);
    ctx.expect_fails_with("recv(fd, buf, 1, 0)", interface::recv(&sock, &mut buf[..1], 0), Errno::ENOTCONN);
    Ok(())
}

// Local-domain socket files cannot be opened.
pub fn unix_socket_open(ctx: &mut CaseContext, mode: &i32) -> CaseResult {
    unix_socket_open_on(ctx, *mode, interface::is_running_on_emulated_host())
}

/// Body of the open case once it is known whether the host is emulated. On an
/// emulated host it skips before creating anything.
pub fn unix_socket_open_on(ctx: &mut CaseContext, mode: i32, emulated: bool) -> CaseResult {
    // Open incorrectly succeeds on the emulated host.
    ctx.skip_if(
        emulated,
        "open of a bound local-domain socket succeeds on the emulated host",
    )?;

    let bound = ctx.assert_succeeds(
        "socket(AF_UNIX, SOCK_STREAM, PF_UNIX)",
        kinds::unix_domain_socket(SOCK_STREAM).create(),
    )?;
    let addr = ctx.assert_succeeds(
        "unique_unix_addr(abstract=false)",
        interface::unique_unix_addr(false, AF_UNIX),
    )?;
    ctx.assert_succeeds(
        &format!("bind(fd, {})", addr.path().display()),
        interface::bind_unix(&bound, &addr),
    )?;

    let call = format!("open({}, {})", addr.path().display(), open_mode_name(mode));
    ctx.expect_fails_with(
        &call,
        interface::open(addr.path(), mode).map(|fd| fd.get()),
        Errno::ENXIO,
    );
    Ok(())
}
