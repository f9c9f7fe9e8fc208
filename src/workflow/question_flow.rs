//! 当前题目提取流程 - 流程层
//!
//! 流程顺序：
//! 1. 定位题目根节点
//! 2. 题号 → 左栏材料 → 题干 → 选项
//! 3. 拼装并规整输出文本
//!
//! 每次调用都从头执行，不保留任何状态。

use tracing::debug;

use crate::dom::DocumentTree;
use crate::models::{ExtractionResult, NO_OPTIONS_PLACEHOLDER};
use crate::services::fields;
use crate::services::normalizer::normalize;
use crate::services::root_selector::select_root;
use crate::utils::logging::log_extraction;
use crate::workflow::question_ctx::QuestionCtx;

/// 从文档中提取当前题目的结构化字段
pub fn extract<D: DocumentTree>(doc: &D) -> ExtractionResult {
    let root = select_root(doc).node;

    let result = ExtractionResult {
        question_number: fields::question_number(doc, root),
        passage: fields::passage(doc, root),
        stimulus: fields::stimulus(doc, root),
        options: fields::options(doc, root),
    };

    debug!(
        "提取结果: 题号 {:?} 材料 {} 字符 题干 {} 字符 选项 {} 个",
        result.question_number,
        result.passage.chars().count(),
        result.stimulus.chars().count(),
        result.options.len()
    );

    result
}

/// 拼装最终文本
///
/// ```text
/// Question <N>
///
/// <材料（可选）>
///
/// <题干>
///
/// A. ...
/// B. ...
/// ```
pub fn assemble(result: &ExtractionResult) -> String {
    let mut lines: Vec<String> = vec![format!(
        "Question {}",
        result.question_number_or_placeholder()
    )];

    if !result.passage.is_empty() {
        lines.push(String::new());
        lines.push(result.passage.clone());
    }

    lines.push(String::new());
    lines.push(result.stimulus_or_placeholder().to_string());

    lines.push(String::new());
    if result.options.is_empty() {
        lines.push(NO_OPTIONS_PLACEHOLDER.to_string());
    } else {
        lines.extend(result.options.iter().map(|o| o.to_string()));
    }

    normalize(&lines.join("\n"))
}

/// 唯一对外入口：提取并拼装，缺失内容一律用占位文字，不会失败
pub fn build_output<D: DocumentTree>(doc: &D) -> String {
    assemble(&extract(doc))
}

/// 带上下文日志的提取
pub fn run<D: DocumentTree>(doc: &D, ctx: &QuestionCtx) -> (ExtractionResult, String) {
    let result = extract(doc);
    let output = assemble(&result);
    log_extraction(ctx, &result);
    (result, output)
}
