// File system related constants

pub const O_RDONLY: i32 = libc::O_RDONLY;
pub const O_WRONLY: i32 = libc::O_WRONLY;
pub const O_RDWR: i32 = libc::O_RDWR;
pub const O_ACCMODE: i32 = libc::O_ACCMODE;

pub fn open_mode_name(flags: i32) -> String {
    match flags & O_ACCMODE {
        O_RDONLY => "O_RDONLY".to_string(),
        O_WRONLY => "O_WRONLY".to_string(),
        O_RDWR => "O_RDWR".to_string(),
        other => format!("{:#o}", other),
    }
}
