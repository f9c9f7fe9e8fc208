//! 文本规整
//!
//! 所有提取结果都要经过这里，保证空白处理一致

use std::sync::LazyLock;

use regex::Regex;

static TRAILING_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+\n").unwrap());
static LEADING_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// 规整文本
///
/// 依次执行：
/// 1. 不换行空格转普通空格
/// 2. 去掉换行前的行尾空白
/// 3. 去掉换行后的行首空白
/// 4. 3 个以上连续换行压成 2 个
/// 5. 连续空白压成一个空格
/// 6. 去掉首尾空白
pub fn normalize(text: &str) -> String {
    let text = text.replace('\u{a0}', " ");
    let text = TRAILING_SPACE.replace_all(&text, "\n");
    let text = LEADING_SPACE.replace_all(&text, "\n");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    let text = SPACE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_steps() {
        assert_eq!(normalize("a\u{a0}\u{a0}b"), "a b");
        assert_eq!(normalize("line  \t\n\t  next"), "line\nnext");
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("  a   b \t c  "), "a b c");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n \n "), "");
    }

    #[test]
    fn test_normalize_space_lines_between_blocks() {
        // 只有空白的行会变成空行，再参与压缩
        assert_eq!(normalize("a\n \n \n \nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "",
            "plain",
            "  lead and trail  ",
            "a \n \n \n b",
            "\u{a0}\n\u{a0}x\u{a0}\u{a0}\n\n\n\ny \t z\t",
            "Question 3\n\nWhat is 2+2?\n\nA. 3\nB. 4",
            "\t\t\n\n\n\t \u{a0} mixed \r\n tabs\t\t",
            "x\n\n\n \n\n\ny",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "输入: {:?}", s);
        }
    }
}
