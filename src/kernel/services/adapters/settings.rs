use super::paths::{app_dir, AppDir};
use crate::kernel::services::ports::SearchConfig;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Invalid settings: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<io::Error> for SettingsError {
    fn from(e: io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    app_dir(AppDir::Cache).map(|dir| dir.join(SETTINGS_FILE))
}

/// 第一次运行时写出一份默认配置，方便用户直接修改
pub fn ensure_settings_file() -> io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    write_default_settings(&path)?;
    Ok(path)
}

fn write_default_settings(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&SearchConfig::default())
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(())
}

/// 读取默认位置的配置；文件不存在时返回默认值
pub fn load_settings() -> Result<SearchConfig, SettingsError> {
    match get_settings_path() {
        Some(path) if path.exists() => load_settings_from(&path),
        _ => Ok(SearchConfig::default()),
    }
}

pub fn load_settings_from(path: &Path) -> Result<SearchConfig, SettingsError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
