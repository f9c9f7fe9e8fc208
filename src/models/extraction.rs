use serde::{Deserialize, Serialize};

/// 题干缺失时的占位文字
pub const NO_STIMULUS_PLACEHOLDER: &str = "[No question stimulus found]";
/// 选项缺失时的占位文字
pub const NO_OPTIONS_PLACEHOLDER: &str = "[No options found]";
/// 题号缺失时的占位文字
pub const NO_NUMBER_PLACEHOLDER: &str = "?";

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedOption {
    pub letter: String,
    pub text: String,
}

impl ExtractedOption {
    pub fn new(letter: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            letter: letter.into(),
            text: text.into(),
        }
    }
}

impl std::fmt::Display for ExtractedOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.letter, self.text)
    }
}

/// 一次提取的结果
///
/// 字段保存原始提取值（可能为空），占位文字在输出时统一补上。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub question_number: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub passage: String,
    pub stimulus: String,
    pub options: Vec<ExtractedOption>,
}

impl ExtractionResult {
    pub fn question_number_or_placeholder(&self) -> &str {
        if self.question_number.is_empty() {
            NO_NUMBER_PLACEHOLDER
        } else {
            &self.question_number
        }
    }

    /// 题干，缺失时返回占位文字
    pub fn stimulus_or_placeholder(&self) -> &str {
        if self.stimulus.is_empty() {
            NO_STIMULUS_PLACEHOLDER
        } else {
            &self.stimulus
        }
    }

    /// 没有题号、题干、选项时认为什么都没找到
    pub fn is_empty(&self) -> bool {
        self.question_number.is_empty()
            && self.passage.is_empty()
            && self.stimulus.is_empty()
            && self.options.is_empty()
    }
}
