//! 提取上下文
//!
//! 封装"这是第几次提取、从哪个页面来"这一信息，只用于日志

use std::fmt::Display;

/// 提取上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 本会话内的提取次数（从1开始）
    pub run_index: usize,

    /// 页面来源（URL、快照文件路径等）
    pub source: String,
}

impl QuestionCtx {
    /// 创建新的提取上下文
    pub fn new(run_index: usize, source: impl Into<String>) -> Self {
        Self {
            run_index,
            source: source.into(),
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[提取#{} 来源#{}]", self.run_index, self.source)
    }
}
