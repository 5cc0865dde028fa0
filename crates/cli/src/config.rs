use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DATA_DIR_ENV: &str = "STALLBOOK_DATA_DIR";
pub const EXPORT_DIR_ENV: &str = "STALLBOOK_EXPORT_DIR";
pub const DB_FILE_NAME: &str = "stallbook.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
}

impl AppConfig {
    /// Flag, then environment, then platform default.
    pub fn resolve(data_dir_flag: Option<PathBuf>, export_dir_flag: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(data_dir_flag, export_dir_flag, |key| std::env::var_os(key).map(PathBuf::from))
    }

    fn resolve_with(
        data_dir_flag: Option<PathBuf>,
        export_dir_flag: Option<PathBuf>,
        env: impl Fn(&str) -> Option<PathBuf>,
    ) -> Result<Self> {
        let data_dir = match data_dir_flag.or_else(|| env(DATA_DIR_ENV)) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let export_dir = match export_dir_flag.or_else(|| env(EXPORT_DIR_ENV)) {
            Some(dir) => dir,
            None => std::env::current_dir().context("cannot determine current directory")?,
        };
        Ok(Self {
            db_path: data_dir.join(DB_FILE_NAME),
            data_dir,
            export_dir,
        })
    }

    pub fn ensure_data_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("cannot create data directory {}", self.data_dir.display()))?;
        Ok(&self.db_path)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("stallbook"))
        .context("no platform data directory; pass --data-dir or set STALLBOOK_DATA_DIR")
}
