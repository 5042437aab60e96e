//! Configuration loading and resolution
//!
//! Values resolve through four tiers, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file (`redline/config.toml` in the platform config dir)
//! 4. Compiled default

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Default location of the bundled sample catalog source,
/// relative to the working directory.
pub const DEFAULT_SOURCE_LOCATION: &str = "data/wireframes.csv";

/// Database file name inside the root folder.
pub const DATABASE_FILE: &str = "review.db";

/// Uploads directory name inside the root folder.
pub const UPLOADS_DIR: &str = "uploads";

/// Startup catalog synchronization policy.
///
/// Observed deployments want one of two behaviors: seed the catalog only on
/// first boot, or re-read the source on every boot. Both are additive-only;
/// the difference is only when the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SyncPolicy {
    /// Run the sync pipeline only when the catalog has zero entries (default)
    WhenEmpty,
    /// Run the sync pipeline on every startup
    Always,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        SyncPolicy::WhenEmpty
    }
}

/// Resolve the root folder holding the database and uploads directory.
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("REDLINE_ROOT") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = read_config_key("root_folder") {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Resolve the catalog source location (CSV path).
pub fn resolve_source_location(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var("REDLINE_SOURCE") {
        return PathBuf::from(path);
    }

    if let Some(path) = read_config_key("source_location") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_SOURCE_LOCATION)
}

/// Read a single string key from the TOML config file, if present.
fn read_config_key(key: &str) -> Option<String> {
    let config_path = find_config_file().ok()?;
    let content = std::fs::read_to_string(&config_path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    value.get(key).and_then(|v| v.as_str()).map(String::from)
}

/// Locate the configuration file for the platform.
///
/// Linux checks the user config dir first, then `/etc/redline/config.toml`.
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("redline").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/redline/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("redline"))
        .unwrap_or_else(|| PathBuf::from("./redline_data"))
}

/// Paths derived from the resolved root folder.
#[derive(Debug, Clone)]
pub struct RootFolder {
    root: PathBuf,
}

impl RootFolder {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root folder and uploads directory if missing.
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.uploads_dir())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join(UPLOADS_DIR)
    }
}
