//! 故事标题提取与目录名规范化

/// 目录名最大长度（字符）
const MAX_FOLDER_NAME_CHARS: usize = 50;

const TITLE_PREFIX: &str = "title:";

/// 从故事文本中提取标题
///
/// 首行以 `Title:`（不区分大小写）开头时取其后内容；
/// 否则取首行前五个单词以 `_` 连接；都没有时返回 `Untitled Story`
pub fn extract_title(story_text: &str) -> String {
    let first_line = story_text.trim().lines().next().unwrap_or_default();

    let has_prefix = first_line
        .get(..TITLE_PREFIX.len())
        .map(|head| head.eq_ignore_ascii_case(TITLE_PREFIX))
        .unwrap_or(false);
    if has_prefix {
        return first_line[TITLE_PREFIX.len()..].trim().to_string();
    }

    let fallback = first_line
        .split_whitespace()
        .take(5)
        .collect::<Vec<_>>()
        .join("_");
    if fallback.is_empty() {
        "Untitled Story".to_string()
    } else {
        fallback
    }
}

/// 将标题转换为可用作目录名的字符串
///
/// 非单词字符（字母、数字、`_`、`-` 以外）的连续片段替换为 `_`，
/// 合并重复的 `_`，去掉首尾 `_`，转小写并截断到 50 个字符
pub fn folder_name_for(title: &str) -> String {
    let mut name = String::with_capacity(title.len());
    for ch in title.chars() {
        let keep = ch.is_alphanumeric() || ch == '-';
        let ch = if keep { ch } else { '_' };
        if ch == '_' && name.ends_with('_') {
            continue;
        }
        name.push(ch);
    }

    let name: String = name
        .trim_matches('_')
        .to_lowercase()
        .chars()
        .take(MAX_FOLDER_NAME_CHARS)
        .collect();

    if name.is_empty() {
        "untitled_story".to_string()
    } else {
        name
    }
}
