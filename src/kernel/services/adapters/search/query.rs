//! 查询模型
//!
//! 不可变：每次模式变化都生成新的 QueryModel，正在运行的遍历可以继续持有旧对象。
//! 匹配按字面量进行（正则元字符没有特殊含义），大小写不敏感。

use crate::kernel::services::ports::TextRange;
use regex::{Regex, RegexBuilder};

/// 编译后的正则超过这个大小就改用逐字符扫描
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

#[derive(Debug, Clone)]
enum Matcher {
    None,
    Regex(Regex),
    /// 正则编译失败时的退路：逐字符比较小写形式
    Scan(Vec<char>),
}

impl Matcher {
    fn compile(pattern: &str, size_limit: usize) -> Self {
        if pattern.trim().is_empty() {
            return Matcher::None;
        }

        match RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()
        {
            Ok(re) => Matcher::Regex(re),
            Err(e) => {
                tracing::warn!(error = %e, "query pattern too large for regex, using plain scan");
                Matcher::Scan(pattern.chars().collect())
            }
        }
    }

    fn find_matches(&self, line: &str) -> Vec<TextRange> {
        match self {
            Matcher::None => Vec::new(),
            Matcher::Regex(re) => re
                .find_iter(line)
                .filter(|m| !m.is_empty())
                .map(|m| TextRange::new(m.start(), m.len()))
                .collect(),
            Matcher::Scan(needle) => scan(needle, line),
        }
    }
}

fn same_char(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// 从左到右找不重叠的匹配，返回字节偏移
fn scan(needle: &[char], line: &str) -> Vec<TextRange> {
    let mut ranges = Vec::new();
    let mut from = 0;

    while from < line.len() {
        let rest = &line[from..];
        let mut chars = rest.char_indices();
        let mut matched = true;
        let mut consumed = 0;
        for &expected in needle {
            match chars.next() {
                Some((i, c)) if same_char(c, expected) => consumed = i + c.len_utf8(),
                _ => {
                    matched = false;
                    break;
                }
            }
        }

        if matched && consumed > 0 {
            ranges.push(TextRange::new(from, consumed));
            from += consumed;
        } else {
            from += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    ranges
}

#[derive(Debug, Clone)]
pub struct QueryModel {
    pattern: String,
    matcher: Matcher,
}

impl QueryModel {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let matcher = Matcher::compile(&pattern, REGEX_SIZE_LIMIT);
        Self { pattern, matcher }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 空白模式不搜索
    pub fn is_trivial(&self) -> bool {
        self.pattern.trim().is_empty()
    }

    /// 返回行内所有不重叠的匹配，从左到右
    pub fn find_matches(&self, line: &str) -> Vec<TextRange> {
        self.matcher.find_matches(line)
    }
}

impl PartialEq for QueryModel {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for QueryModel {}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/query.rs"]
mod tests;
