//! Configuration constants and profile loading for smartcompile
//!
//! Backend settings live in an INI profile file, one section per profile:
//!
//! ```ini
//! [default]
//! server = http://127.0.0.1:5000
//! timeout = 30
//! ```

use anyhow::{Context, Result};
use ini::Ini;
use std::path::Path;
use std::time::Duration;

/// Default profile file path for smartcompile
pub const DEFAULT_PROFILE_PATH: &str = "~/.smartcompile/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "SMARTCOMPILE_PROFILE_PATH";

/// Backend used when no profile names one
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Connection settings for the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProfile {
    server: String,
    timeout: Option<Duration>,
}

impl BackendProfile {
    pub fn new(server: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            server: server.into(),
            timeout,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Per-request timeout; `None` waits indefinitely
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for BackendProfile {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER, None)
    }
}

/// Load `profile_name` from the INI file at `profile_path` (`~` is expanded).
///
/// A missing file or section yields the default profile; a malformed file or
/// value is an error.
pub fn load_profile(profile_name: &str, profile_path: &str) -> Result<BackendProfile> {
    let expanded = shellexpand::tilde(profile_path).to_string();
    tracing::debug!("Loading profile '{}' from '{}'", profile_name, expanded);

    if !Path::new(&expanded).exists() {
        tracing::debug!("Profile file '{}' not found, using defaults", expanded);
        return Ok(BackendProfile::default());
    }

    let ini = Ini::load_from_file(&expanded)
        .with_context(|| format!("Failed to read profile file '{expanded}'"))?;

    let Some(section) = ini.section(Some(profile_name)) else {
        tracing::debug!("Profile '{}' not found, using defaults", profile_name);
        return Ok(BackendProfile::default());
    };

    let server = section
        .get("server")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SERVER)
        .to_string();

    let timeout = match section.get("timeout").map(str::trim) {
        None | Some("") => None,
        Some(value) => {
            let seconds: u64 = value.parse().with_context(|| {
                format!("Invalid timeout '{value}' in profile '{profile_name}', expected seconds")
            })?;
            Some(Duration::from_secs(seconds))
        }
    };

    tracing::debug!("Profile loaded, server: {}, timeout: {:?}", server, timeout);
    Ok(BackendProfile { server, timeout })
}
