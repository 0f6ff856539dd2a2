//! .env 格式解析器 (简单原则：透明的文本解析)

use crate::error::{BootstrapError, Result};
use crate::types::EnvEntry;
use regex::Regex;
use std::sync::OnceLock;

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("静态正则表达式")
    })
}

/// .env 格式解析器
pub struct DotenvParser;

impl DotenvParser {
    /// 解析 .env 文件内容
    ///
    /// 规则：
    /// - 忽略空行和以 # 开头的注释行
    /// - 格式：KEY=VALUE，可选 `export ` 前缀
    /// - VALUE 两端成对的单/双引号会被去掉
    /// - 支持多行值（以 \ 结尾）
    ///
    /// # Errors
    ///
    /// 键名为空或包含非法字符时返回解析错误
    pub fn parse(content: &str) -> Result<Vec<EnvEntry>> {
        let mut entries = Vec::new();

        let lines: Vec<&str> = content.lines().collect();
        let mut line_num = 0;

        while line_num < lines.len() {
            let line = lines[line_num].trim();
            let start = line_num + 1;

            // 跳过空行和注释
            if line.is_empty() || line.starts_with('#') {
                line_num += 1;
                continue;
            }

            let mut value_end = line_num;
            let mut complete_line = line.to_string();

            while complete_line.ends_with('\\') && value_end + 1 < lines.len() {
                complete_line.pop();
                value_end += 1;
                complete_line.push_str(lines[value_end].trim());
            }

            line_num = value_end + 1;

            let body = complete_line
                .strip_prefix("export ")
                .unwrap_or(&complete_line);

            // 不是 KEY=VALUE 格式的行直接跳过，保持兼容性
            let Some((key, value)) = body.split_once('=') else {
                continue;
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(BootstrapError::Parse(format!(
                    "第 {start} 行键名为空: '{complete_line}'"
                )));
            }
            if !key_pattern().is_match(key) {
                return Err(BootstrapError::Parse(format!(
                    "第 {start} 行键名无效: '{key}'"
                )));
            }

            entries.push(EnvEntry::new(key, unquote(value.trim()), start));
        }

        Ok(entries)
    }

    /// 找出缺失或为空的必需键，保持 `required` 的顺序
    #[must_use]
    pub fn missing_keys(entries: &[EnvEntry], required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|key| {
                // 同名键以最后一次出现为准
                !entries
                    .iter()
                    .rev()
                    .find(|e| &e.key == *key)
                    .is_some_and(|e| !e.value.is_empty())
            })
            .cloned()
            .collect()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
