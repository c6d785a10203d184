use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 搜索相关配置，所有字段都有默认值，settings 文件里可以只写一部分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 超过这个大小（字节）的文件不搜索
    pub max_file_size: u64,
    /// 超长行（通常是压缩过的 js/css）不报告
    pub max_line_length: usize,
    pub ignored_extensions: Vec<String>,
    pub ignored_names: Vec<String>,
    pub ignored_prefixes: Vec<String>,
    pub respect_gitignore: bool,
    pub refresh_delay_ms: u64,
    pub status_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_file_size: 4 * 1024 * 1024,
            max_line_length: 1000,
            ignored_extensions: [
                "class", "jar", "zip", "png", "jpg", "gif", "pdf", "exe", "o", "so", "dll",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignored_names: [".git", "target", "node_modules", "bin"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignored_prefixes: vec![".".to_string()],
            respect_gitignore: true,
            refresh_delay_ms: 50,
            status_delay_ms: 250,
        }
    }
}

impl SearchConfig {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn status_delay(&self) -> Duration {
        Duration::from_millis(self.status_delay_ms)
    }

    /// 按名称判断是否跳过（目录和文件都适用）
    pub fn is_ignored_name(&self, name: &str) -> bool {
        if self.ignored_names.iter().any(|n| n == name) {
            return true;
        }
        if self
            .ignored_prefixes
            .iter()
            .any(|p| !p.is_empty() && name.starts_with(p.as_str()))
        {
            return true;
        }
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .ignored_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
