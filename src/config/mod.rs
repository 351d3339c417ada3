//! Settings store for servex.
//!
//! Server records live in a `settings.kdl` file. The file to use is chosen
//! by, in order:
//!
//! 1. `--settings` flag (or `SVX_SETTINGS` env var, handled by clap)
//! 2. `./settings.kdl` in the current directory
//! 3. `~/.config/servex/settings.kdl`
//!
//! An explicitly given path must exist; the fallback chain skips locations
//! that do not.

pub mod schema;

use std::path::{Path, PathBuf};

use kdl::KdlDocument;

use crate::models::ServerRecord;
use crate::{Error, Result};

pub use schema::servers_from_kdl;

/// Name of the settings file looked up in fallback locations.
pub const SETTINGS_FILE_NAME: &str = "settings.kdl";

/// Load and parse server records from a settings file.
pub fn load_settings(path: &Path) -> Result<Vec<ServerRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Settings(format!("cannot read {}: {}", path.display(), e)))?;
    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Settings(format!("cannot parse {}: {}", path.display(), e)))?;
    servers_from_kdl(&doc)
}

/// Pick the settings file to use.
///
/// An explicit path (flag or env var) is used literally and must exist.
/// Otherwise the current directory is tried first, then the user config
/// directory.
pub fn resolve_settings_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Settings(format!(
                "settings file does not exist: {}",
                path.display()
            )));
        }
        return Ok(path);
    }

    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let fallback = config_dir.join("servex").join(SETTINGS_FILE_NAME);
        if fallback.exists() {
            return Ok(fallback);
        }
    }

    Err(Error::Settings(format!(
        "no settings file found (looked for ./{} and ~/.config/servex/{})",
        SETTINGS_FILE_NAME, SETTINGS_FILE_NAME
    )))
}
