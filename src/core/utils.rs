use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".recipe_editor";
const STORE_DIR: &str = "store";
const CONFIG_FILE: &str = "config.json";
const HOME_ENV: &str = "RECIPE_EDITOR_HOME";

/// Resolves the on-disk layout used by the CLI.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, `$RECIPE_EDITOR_HOME` or `~/.recipe_editor`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn store_dir_in(base: &Path) -> PathBuf {
        base.join(STORE_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
