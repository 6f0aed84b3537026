// Filesystem locations for configuration, session token, and log output.
// Resolved through the platform's standard project directories.

use std::path::PathBuf;

use directories::ProjectDirs;

const APP_NAME: &str = "tabsync";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Base config directory (~/.config/tabsync on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Base cache directory (~/.cache/tabsync on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the JSON configuration file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Path to the stored bearer token.
pub fn token_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("token"))
}

/// Path to the log file written by the terminal UI.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("tabsync.log"))
}
