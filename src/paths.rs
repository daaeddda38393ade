//! Where petshop keeps its files.
//!
//! `PETSHOP_DIR` wins when set and non-empty; otherwise the files live in
//! `~/.config/petshop/` on every platform. The directory holds
//! `config.toml` and, while the terminal UI owns the screen, `petshop.log`.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable that relocates the petshop directory
pub const DIR_ENV: &str = "PETSHOP_DIR";

const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "petshop.log";

fn locate(overridden: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    match overridden.filter(|dir| !dir.is_empty()) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home.map(|home| home.join(".config").join("petshop")),
    }
}

/// The petshop directory, created on first use
pub fn petshop_dir() -> Result<PathBuf> {
    let dir = locate(std::env::var_os(DIR_ENV), dirs::home_dir())
        .with_context(|| format!("Could not determine home directory; set {DIR_ENV}"))?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Saved settings: theme, API URL, photo previews
pub fn config_path() -> Result<PathBuf> {
    Ok(petshop_dir()?.join(CONFIG_FILE))
}

/// Log sink used while the terminal UI runs
pub fn log_path() -> Result<PathBuf> {
    Ok(petshop_dir()?.join(LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_beats_home() {
        let home = Some(PathBuf::from("/home/ada"));
        assert_eq!(
            locate(Some("/srv/petshop".into()), home.clone()),
            Some(PathBuf::from("/srv/petshop"))
        );
        assert_eq!(
            locate(Some(OsString::new()), home.clone()),
            Some(PathBuf::from("/home/ada/.config/petshop"))
        );
        assert_eq!(locate(None, home), Some(PathBuf::from("/home/ada/.config/petshop")));
        assert_eq!(locate(None, None), None);
    }
}
