// Misc functions for interface
// Host platform probe and logging setup.

use serde::Serialize;
use std::env;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

pub const PLATFORM_ENV: &str = "SOCKCONFORM_PLATFORM";
pub const LOG_ENV: &str = "SOCKCONFORM_LOG";
pub const NATIVE_PLATFORM: &str = "native";

static PLATFORM: OnceLock<Platform> = OnceLock::new();

/// The implementation of the syscall interface the suite is running against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    name: String,
    emulated: bool,
}

impl Platform {
    /// Unset, empty, or "native" in any case means the reference host.
    pub fn from_name(name: Option<&str>) -> Platform {
        match name.map(str::trim) {
            None | Some("") => Platform::native(),
            Some(n) if n.eq_ignore_ascii_case(NATIVE_PLATFORM) => Platform::native(),
            Some(n) => Platform {
                name: n.to_string(),
                emulated: true,
            },
        }
    }

    pub fn native() -> Platform {
        Platform {
            name: NATIVE_PLATFORM.to_string(),
            emulated: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_emulated(&self) -> bool {
        self.emulated
    }
}

/// Fixes the platform before anything has queried it. The first selection
/// wins for the life of the process; a later, different one gets the fixed
/// platform back as an error.
pub fn select_platform(name: Option<&str>) -> Result<&'static Platform, &'static Platform> {
    let wanted = match name {
        Some(_) => Platform::from_name(name),
        None => Platform::from_name(env::var(PLATFORM_ENV).ok().as_deref()),
    };
    let mut fresh = false;
    let current = PLATFORM.get_or_init(|| {
        fresh = true;
        wanted.clone()
    });
    if fresh || *current == wanted {
        Ok(current)
    } else {
        tracing::warn!(
            fixed = current.name(),
            requested = wanted.name(),
            "platform already fixed, ignoring new selection"
        );
        Err(current)
    }
}

pub fn current_platform() -> &'static Platform {
    PLATFORM.get_or_init(|| Platform::from_name(env::var(PLATFORM_ENV).ok().as_deref()))
}

pub fn is_running_on_emulated_host() -> bool {
    current_platform().is_emulated()
}

/// Installs the global subscriber. `SOCKCONFORM_LOG` takes precedence over the
/// verbosity-derived default. Returns false if a subscriber already exists.
pub fn init_logging(verbosity: u8, json: bool) -> bool {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
