//! Configuration management for gbmc.
//!
//! Reads configuration from environment variables; a `.env` file is loaded
//! by main before this runs. Defaults match the upstream 24.10.1 release.

use std::path::PathBuf;

/// Default download URL for the MATE image.
pub const DEFAULT_MATE_URL: &str =
    "https://download.ghostbsd.org/releases/amd64/24.10.1/GhostBSD-24.10.1.iso";

/// Default download URL for the XFCE image.
pub const DEFAULT_XFCE_URL: &str =
    "https://download.ghostbsd.org/releases/amd64/24.10.1/GhostBSD-24.10.1-XFCE.iso";

/// Default append-only audit log location.
pub const DEFAULT_LOG_FILE: &str = "/var/log/ghostbsd_media_creator.log";

/// gbmc configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Download URL for the MATE image.
    pub mate_url: String,
    /// Download URL for the XFCE image.
    pub xfce_url: String,
    /// Directory the fetched image is staged in before writing.
    pub staging_dir: PathBuf,
    /// Append-only audit log file.
    pub log_file: PathBuf,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn load() -> Self {
        let mate_url =
            std::env::var("GBMC_MATE_URL").unwrap_or_else(|_| DEFAULT_MATE_URL.to_string());
        let xfce_url =
            std::env::var("GBMC_XFCE_URL").unwrap_or_else(|_| DEFAULT_XFCE_URL.to_string());
        let staging_dir = std::env::var("GBMC_STAGING_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"));
        let log_file = std::env::var("GBMC_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));

        Self {
            mate_url,
            xfce_url,
            staging_dir,
            log_file,
        }
    }
}
