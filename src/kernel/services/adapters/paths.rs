//! 应用目录
//!
//! 日志放在平台数据目录下，settings 放在平台缓存目录下，
//! 两者都在 `quicksearch` 子目录里。

use std::io;
use std::path::PathBuf;

pub(crate) const APP_NAME: &str = "quicksearch";
const LOG_DIR: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppDir {
    Data,
    Cache,
}

impl AppDir {
    /// 依次尝试的 (环境变量, 追加的相对路径)
    fn candidates(self) -> &'static [(&'static str, &'static str)] {
        match (self, std::env::consts::OS) {
            (AppDir::Data, "macos") => &[("HOME", "Library/Application Support")],
            (AppDir::Cache, "macos") => &[("HOME", "Library/Caches")],
            (AppDir::Data, "windows") => &[("APPDATA", "")],
            (AppDir::Cache, "windows") => &[("LOCALAPPDATA", ""), ("APPDATA", "")],
            (AppDir::Data, _) => &[("XDG_DATA_HOME", ""), ("HOME", ".local/share")],
            (AppDir::Cache, _) => &[("XDG_CACHE_HOME", ""), ("HOME", ".cache")],
        }
    }
}

fn resolve_app_dir(kind: AppDir, lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    kind.candidates().iter().find_map(|(var, suffix)| {
        let base = lookup(var).filter(|v| !v.is_empty())?;
        let mut dir = PathBuf::from(base);
        if !suffix.is_empty() {
            dir.push(suffix);
        }
        Some(dir.join(APP_NAME))
    })
}

pub(crate) fn app_dir(kind: AppDir) -> Option<PathBuf> {
    resolve_app_dir(kind, |var| std::env::var(var).ok())
}

pub fn get_log_dir() -> Option<PathBuf> {
    app_dir(AppDir::Data).map(|dir| dir.join(LOG_DIR))
}

/// 确保日志目录存在
pub fn ensure_log_dir() -> io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Cannot determine log directory")
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/paths.rs"]
mod tests;
