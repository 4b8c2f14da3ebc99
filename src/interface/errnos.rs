// Errno values as the host ABI defines them
#![allow(dead_code)]

use std::fmt;
use std::io;

macro_rules! errnos {
    ($($name:ident),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum Errno {
            $($name = libc::$name,)*
        }

        impl Errno {
            pub fn from_discriminant(raw: i32) -> Option<Errno> {
                match raw {
                    $(x if x == libc::$name => Some(Errno::$name),)*
                    _ => None,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(Errno::$name => stringify!($name),)*
                }
            }
        }
    };
}

errnos! {
    EPERM,
    ENOENT,
    ESRCH,
    EINTR,
    EIO,
    ENXIO,
    E2BIG,
    ENOEXEC,
    EBADF,
    ECHILD,
    EAGAIN,
    ENOMEM,
    EACCES,
    EFAULT,
    EBUSY,
    EEXIST,
    EXDEV,
    ENODEV,
    ENOTDIR,
    EISDIR,
    EINVAL,
    ENFILE,
    EMFILE,
    ENOTTY,
    ETXTBSY,
    EFBIG,
    ENOSPC,
    ESPIPE,
    EROFS,
    EMLINK,
    EPIPE,
    EDOM,
    ERANGE,
    EDEADLK,
    ENAMETOOLONG,
    ENOLCK,
    ENOSYS,
    ENOTEMPTY,
    ELOOP,
    ENOTSOCK,
    EDESTADDRREQ,
    EMSGSIZE,
    EPROTOTYPE,
    ENOPROTOOPT,
    EPROTONOSUPPORT,
    ESOCKTNOSUPPORT,
    EOPNOTSUPP,
    EPFNOSUPPORT,
    EAFNOSUPPORT,
    EADDRINUSE,
    EADDRNOTAVAIL,
    ENETDOWN,
    ENETUNREACH,
    ENETRESET,
    ECONNABORTED,
    ECONNRESET,
    ENOBUFS,
    EISCONN,
    ENOTCONN,
    ESHUTDOWN,
    ETIMEDOUT,
    ECONNREFUSED,
    EHOSTDOWN,
    EHOSTUNREACH,
    EALREADY,
    EINPROGRESS,
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", describe_errno(*self as i32))
    }
}

/// Reads the calling thread's errno. Must run before anything else that can
/// touch errno, so wrappers call it right after the libc call returns.
pub fn get_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

// Symbolic name for a raw errno, or the number when the table has no entry
pub fn errno_name(raw: i32) -> String {
    match Errno::from_discriminant(raw) {
        Some(errno) => errno.name().to_string(),
        None => format!("errno {}", raw),
    }
}

/// `ENOTCONN (Transport endpoint is not connected)` style text for reports.
pub fn describe_errno(raw: i32) -> String {
    let message = io::Error::from_raw_os_error(raw).to_string();
    // io::Error appends " (os error N)", which the name already conveys
    let message = match message.rfind(" (os error") {
        Some(idx) => message[..idx].to_string(),
        None => message,
    };
    format!("{} ({})", errno_name(raw), message)
}
