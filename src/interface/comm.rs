// Socket calls and local-domain address layout
//
// Every call returns the raw errno as its error, read before anything else
// can clobber it.

use std::ffi::OsStr;
use std::mem::size_of;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::interface::errnos::{get_errno, Errno};
use crate::interface::FileDescriptor;

pub const UNIX_PATH_MAX: usize = 108;

#[repr(C)]
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct SockaddrUnix {
    pub sun_family: u16,
    pub sun_path: [u8; UNIX_PATH_MAX],
}

/// Builds a local-domain address. A leading NUL in `path` makes it abstract;
/// otherwise the path needs room for its terminating NUL.
pub fn new_sockaddr_unix(family: u16, path: &[u8]) -> Result<SockaddrUnix, i32> {
    let pathlen = path.len();
    let is_abstract = path.first() == Some(&0);
    if pathlen > UNIX_PATH_MAX || (!is_abstract && pathlen >= UNIX_PATH_MAX) {
        return Err(Errno::ENAMETOOLONG as i32);
    }
    let mut array_path: [u8; UNIX_PATH_MAX] = [0; UNIX_PATH_MAX];
    array_path[0..pathlen].copy_from_slice(path);
    Ok(SockaddrUnix {
        sun_family: family,
        sun_path: array_path,
    })
}

impl SockaddrUnix {
    pub fn is_abstract(&self) -> bool {
        self.sun_path[0] == 0 && self.sun_path[1..].iter().any(|b| *b != 0)
    }

    /// Raw bytes of the filesystem path up to the first NUL. Empty for
    /// abstract addresses.
    pub fn path_bytes(&self) -> &[u8] {
        self.sun_path.split(|b| *b == 0).next().unwrap_or(&[])
    }

    /// Filesystem path, byte for byte, whatever its encoding.
    pub fn path(&self) -> &Path {
        Path::new(OsStr::from_bytes(self.path_bytes()))
    }

    /// Name of an abstract address without its leading NUL or zero padding.
    pub fn abstract_name(&self) -> Option<&[u8]> {
        if !self.is_abstract() {
            return None;
        }
        let end = self
            .sun_path
            .iter()
            .rposition(|b| *b != 0)
            .map_or(1, |idx| idx + 1);
        Some(&self.sun_path[1..end])
    }

    fn to_raw(&self) -> libc::sockaddr_un {
        // SAFETY: sockaddr_un is plain old data, all-zero is a valid value
        let mut raw: libc::sockaddr_un = unsafe { std::mem::zeroed() };
        raw.sun_family = self.sun_family as libc::sa_family_t;
        for (dst, src) in raw.sun_path.iter_mut().zip(self.sun_path.iter()) {
            *dst = *src as libc::c_char;
        }
        raw
    }
}

pub fn socket(domain: i32, socktype: i32, protocol: i32) -> Result<FileDescriptor, i32> {
    let fd = unsafe { libc::socket(domain, socktype, protocol) };
    if fd < 0 {
        let errno = get_errno();
        tracing::trace!(domain, socktype, protocol, errno, "socket failed");
        return Err(errno);
    }
    tracing::trace!(domain, socktype, protocol, fd, "socket");
    Ok(FileDescriptor::new(fd))
}

pub fn socketpair(
    domain: i32,
    socktype: i32,
    protocol: i32,
) -> Result<(FileDescriptor, FileDescriptor), i32> {
    let mut sv: [libc::c_int; 2] = [-1, -1];
    let ret = unsafe { libc::socketpair(domain, socktype, protocol, sv.as_mut_ptr()) };
    if ret != 0 {
        let errno = get_errno();
        tracing::trace!(domain, socktype, protocol, errno, "socketpair failed");
        return Err(errno);
    }
    tracing::trace!(domain, socktype, protocol, first = sv[0], second = sv[1], "socketpair");
    Ok((FileDescriptor::new(sv[0]), FileDescriptor::new(sv[1])))
}

/// Binds using the full size of the address record, as the host's
/// `sizeof(struct sockaddr_un)`.
pub fn bind_unix(fd: &FileDescriptor, addr: &SockaddrUnix) -> Result<i32, i32> {
    let raw = addr.to_raw();
    let ret = unsafe {
        libc::bind(
            fd.get(),
            (&raw as *const libc::sockaddr_un).cast::<libc::sockaddr>(),
            size_of::<libc::sockaddr_un>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        let errno = get_errno();
        tracing::trace!(fd = fd.get(), errno, "bind failed");
        return Err(errno);
    }
    tracing::trace!(fd = fd.get(), path = %addr.path().display(), "bind");
    Ok(ret)
}

/// Receives into the whole of `buf`; pass an empty slice for a zero-length
/// receive.
pub fn recv(fd: &FileDescriptor, buf: &mut [u8], flags: i32) -> Result<isize, i32> {
    let ret = unsafe {
        libc::recv(
            fd.get(),
            buf.as_mut_ptr().cast::<libc::c_void>(),
            buf.len(),
            flags,
        )
    };
    if ret < 0 {
        let errno = get_errno();
        tracing::trace!(fd = fd.get(), len = buf.len(), errno, "recv failed");
        return Err(errno);
    }
    tracing::trace!(fd = fd.get(), len = buf.len(), received = ret, "recv");
    Ok(ret)
}
