// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// 将组织名称转换为文件系统安全的 slug
///
/// 先做 ASCII 音译，再转小写，去掉非单词字符，把空白和连字符折叠为单个 `-`
pub fn slugify(name: &str) -> String {
    let ascii = deunicode::deunicode(name).to_lowercase();
    let cleaned = DISALLOWED.replace_all(&ascii, "");
    let collapsed = SEPARATORS.replace_all(cleaned.trim(), "-");
    collapsed.trim_matches(|c| c == '-' || c == '_').to_string()
}
