// File related interface
//
// Descriptor ownership, open(2), and allocation of unique local-domain paths.

use dashmap::DashSet;
use std::env;
use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
pub use std::path::{Path as RustPath, PathBuf as RustPathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
pub use std::sync::LazyLock as RustLazyGlobal;

use crate::interface::comm::{new_sockaddr_unix, SockaddrUnix, UNIX_PATH_MAX};
use crate::interface::errnos::{get_errno, Errno};

// Paths handed out by unique_unix_addr that may still exist on disk
static UNIX_PATHS: RustLazyGlobal<Arc<DashSet<RustPathBuf>>> =
    RustLazyGlobal::new(|| Arc::new(DashSet::new()));

static UD_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Exclusively owns an open descriptor and closes it when dropped, whether
/// the owner returns normally, bails out early, or unwinds.
#[derive(Debug)]
pub struct FileDescriptor {
    fd: i32,
}

impl FileDescriptor {
    pub fn new(fd: i32) -> FileDescriptor {
        FileDescriptor { fd }
    }

    pub fn get(&self) -> i32 {
        self.fd
    }

    /// Gives up ownership; the caller becomes responsible for closing.
    pub fn release(mut self) -> i32 {
        let fd = self.fd;
        self.fd = -1;
        fd
    }

    /// Closes now and reports the result instead of ignoring it on drop.
    pub fn close(mut self) -> Result<i32, i32> {
        let fd = self.fd;
        self.fd = -1;
        close_fd(fd)
    }
}

impl Drop for FileDescriptor {
    fn drop(&mut self) {
        if self.fd >= 0 {
            if let Err(errno) = close_fd(self.fd) {
                tracing::warn!(fd = self.fd, errno, "close on drop failed");
            }
        }
    }
}

fn close_fd(fd: i32) -> Result<i32, i32> {
    let ret = unsafe { libc::close(fd) };
    if ret < 0 {
        return Err(get_errno());
    }
    tracing::trace!(fd, "close");
    Ok(ret)
}

pub fn open<P: AsRef<RustPath>>(path: P, flags: i32) -> Result<FileDescriptor, i32> {
    let path = path.as_ref();
    let cpath =
        CString::new(path.as_os_str().as_bytes()).map_err(|_| Errno::EINVAL as i32)?;
    let fd = unsafe { libc::open(cpath.as_ptr(), flags) };
    if fd < 0 {
        let errno = get_errno();
        tracing::trace!(path = %path.display(), flags, errno, "open failed");
        return Err(errno);
    }
    tracing::trace!(path = %path.display(), flags, fd, "open");
    Ok(FileDescriptor::new(fd))
}

// Directory for generated socket paths. TMPDIR can be too deep for sun_path,
// in which case /tmp is used.
fn unix_path_dir() -> RustPathBuf {
    let tmp = env::temp_dir();
    if tmp.as_os_str().len() + 48 < UNIX_PATH_MAX {
        tmp
    } else {
        RustPathBuf::from("/tmp")
    }
}

pub fn gen_ud_path() -> RustPathBuf {
    let id = UD_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    unix_path_dir().join(format!(
        "sockconform-{}-{}-{:08x}",
        std::process::id(),
        id,
        nanos
    ))
}

/// Returns a local-domain address nobody else in this process has been given.
///
/// Non-abstract addresses name a path that does not exist yet; it is recorded
/// so `remove_unix_paths` can clean it up later. Abstract addresses use the
/// same name behind a leading NUL and never touch the filesystem.
pub fn unique_unix_addr(is_abstract: bool, family: i32) -> Result<SockaddrUnix, i32> {
    let path = gen_ud_path();
    let bytes = path.as_os_str().as_bytes();
    if is_abstract {
        let mut name = Vec::with_capacity(bytes.len() + 1);
        name.push(0);
        name.extend_from_slice(bytes);
        return new_sockaddr_unix(family as u16, &name);
    }
    let addr = new_sockaddr_unix(family as u16, bytes)?;
    UNIX_PATHS.insert(path);
    Ok(addr)
}

pub fn tracked_unix_paths() -> Vec<RustPathBuf> {
    UNIX_PATHS.iter().map(|p| p.key().clone()).collect()
}

/// Unlinks one generated path if it is still on disk and stops tracking it.
/// Returns whether a file was removed.
pub fn remove_unix_path(path: &RustPath) -> bool {
    let removed = match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not remove socket path");
            false
        }
    };
    UNIX_PATHS.remove(path);
    removed
}

/// Unlinks every generated path still on disk and forgets all of them.
/// Returns how many files were removed.
pub fn remove_unix_paths() -> usize {
    tracked_unix_paths()
        .iter()
        .filter(|path| remove_unix_path(path))
        .count()
}
