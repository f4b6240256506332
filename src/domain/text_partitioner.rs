//! 文本分页器
//!
//! 将整篇故事切分为固定数量的幻灯片文本，尽量在目标偏移附近的空白处断开

/// 将文本切分为恰好 `count` 段
///
/// 切分策略：
/// 1. 目标长度 = max(1, 字符数 / count)
/// 2. 从理想切点向回扫描半个目标长度，寻找最近的空白
/// 3. 找不到时向前扫描，只接受距游标 1.5 倍目标长度以内的空白
/// 4. 仍找不到则在理想切点强制断开（允许切断单词）
/// 5. 最后一段总是包含剩余全部文本
///
/// 长度按字符计算，切点不会落在 UTF-8 多字节序列中间。
pub fn partition(text: &str, count: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || count < 1 {
        return vec![String::new(); count];
    }

    let len = chars.len();
    let target = (len / count).max(1);
    let mut parts: Vec<String> = Vec::with_capacity(count);
    let mut cursor = 0;

    for slot in 0..count {
        if cursor >= len {
            parts.push(String::new());
            continue;
        }

        if slot == count - 1 {
            parts.push(trimmed(&chars[cursor..]));
            cursor = len;
            continue;
        }

        let ideal = (cursor + target).min(len);
        let cut = find_break(&chars, cursor, ideal, target);
        parts.push(trimmed(&chars[cursor..cut]));

        cursor = cut;
        while cursor < len && chars[cursor].is_whitespace() {
            cursor += 1;
        }
    }

    parts.resize(count, String::new());
    parts
}

/// 在 `ideal` 附近寻找断点
fn find_break(chars: &[char], cursor: usize, ideal: usize, target: usize) -> usize {
    let floor = ideal.saturating_sub(target / 2).max(cursor);

    let mut pos = ideal;
    loop {
        if pos > cursor && pos < chars.len() && chars[pos].is_whitespace() {
            return pos;
        }
        if pos <= floor {
            break;
        }
        pos -= 1;
    }

    let limit = cursor + target * 3 / 2;
    let forward = chars[ideal..]
        .iter()
        .position(|c| c.is_whitespace())
        .map(|offset| ideal + offset);

    match forward {
        Some(pos) if pos > cursor && pos <= limit => pos,
        _ => ideal,
    }
}

#[inline]
fn trimmed(chars: &[char]) -> String {
    chars.iter().collect::<String>().trim().to_string()
}
