//! 从帖子正文提取查找键

use crate::checkpoint::CheckpointRecord;

/// 取正文第一行，空格替换为下划线，转小写并去掉首尾空白
pub fn extract(record: &CheckpointRecord) -> String {
    normalize(&record.text)
}

pub fn normalize(text: &str) -> String {
    text.lines()
        .next()
        .unwrap_or("")
        .replace(' ', "_")
        .to_lowercase()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_normalized() {
        let record = CheckpointRecord::new("1", 1, "Foo Bar\nrest of the post");
        assert_eq!(extract(&record), "foo_bar");
    }

    #[test]
    fn test_fixed_point() {
        let once = normalize("Foo Bar\nrest");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_empty_first_line() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\nsecond line"), "");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(normalize("\tBRCA1 Variant\t\r\nx"), "brca1_variant");
    }
}
