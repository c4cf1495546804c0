//! Python interpreter resolution
//!
//! The engine runs inside a project virtual environment when one is
//! present; otherwise the system interpreter is used as a last resort.

use std::path::Path;
use tracing::{info, warn};

/// Virtual-environment interpreter probed on Windows
const WINDOWS_VENV_PYTHON: &str = "src/python/venv/Scripts/python.exe";

/// Virtual-environment interpreters probed on other platforms, in order
const UNIX_VENV_PYTHONS: [&str; 3] = [
    "src/.venv/bin/python3",
    ".venv/bin/python3",
    "src/python/venv/bin/python3",
];

/// Host platform family, as far as interpreter layout is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Platform the driver is currently running on
    #[must_use]
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Resolve the Python interpreter for one engine invocation.
///
/// An explicit non-empty `override_path` wins unconditionally and is not
/// checked for existence; a bad override surfaces later, at spawn time.
/// Resolution is recomputed on every call since the environment can change
/// between invocations.
#[must_use]
pub fn resolve(override_path: Option<&str>) -> String {
    resolve_with(Platform::current(), override_path, |p| p.exists())
}

/// Resolution core with the existence check injected, so the search order
/// is testable without touching a real filesystem.
pub fn resolve_with<F>(platform: Platform, override_path: Option<&str>, exists: F) -> String
where
    F: Fn(&Path) -> bool,
{
    if let Some(path) = override_path {
        if !path.is_empty() {
            return path.to_string();
        }
    }

    match platform {
        Platform::Windows => {
            if exists(Path::new(WINDOWS_VENV_PYTHON)) {
                WINDOWS_VENV_PYTHON.to_string()
            } else {
                "python".to_string()
            }
        }
        Platform::Unix => {
            for candidate in UNIX_VENV_PYTHONS {
                if exists(Path::new(candidate)) {
                    info!("Using virtual environment Python: {}", candidate);
                    return candidate.to_string();
                }
            }
            warn!("No virtual env found, using system Python. This may cause import errors.");
            "python3".to_string()
        }
    }
}
