//! 字段提取 - 业务能力层
//!
//! 在选定的题目根节点上提取题号、左栏材料、题干、选项

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::dom::{DocumentTree, Marker, NodeId};
use crate::models::ExtractedOption;
use crate::services::node_text::node_to_text;
use crate::services::normalizer::normalize;
use crate::services::visibility::is_visible;

/// 读屏文本里的选项字母，例如 "Option B,"
static OPTION_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Option\s+([A-Z])").unwrap());

/// 选项文本开头残留的 "Option X," 前缀
static OPTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Option\s+[A-Z],\s*").unwrap());

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 题号：先在题目内找，再全文档找
pub fn question_number<D: DocumentTree>(doc: &D, root: NodeId) -> String {
    let marker = doc
        .find_first(root, Marker::QuestionNumber)
        .or_else(|| doc.find_first_in_document(Marker::QuestionNumber));
    marker
        .map(|n| normalize(&doc.text_content(n)))
        .unwrap_or_default()
}

/// 双栏布局左侧的共享材料，没有双栏或左栏不可见时为空
pub fn passage<D: DocumentTree>(doc: &D, root: NodeId) -> String {
    let Some(wrapper) = doc
        .closest(root, Marker::TwoColumnWrapper)
        .or_else(|| doc.find_first_in_document(Marker::TwoColumnWrapper))
    else {
        return String::new();
    };

    let Some(left) = doc
        .find_first(wrapper, Marker::LeftColumn)
        .filter(|&n| is_visible(doc, n))
    else {
        debug!("双栏布局没有可见的左栏");
        return String::new();
    };

    let feature = doc
        .find_first(left, Marker::SharedPassage)
        .or_else(|| doc.find_first(left, Marker::Feature))
        .or_else(|| doc.find_first(left, Marker::StimulusContent))
        .unwrap_or(left);

    node_to_text(doc, Some(feature))
}

/// 题干文本，找不到时为空（输出时补占位）
pub fn stimulus<D: DocumentTree>(doc: &D, root: NodeId) -> String {
    let content = doc.find_first(root, Marker::StimulusContent).or_else(|| {
        doc.find_all(root, Marker::Stimulus)
            .into_iter()
            .find_map(|wrapper| doc.find_first(wrapper, Marker::StimulusContent))
    });
    node_to_text(doc, content)
}

/// 选项列表，按文档顺序
///
/// 题目内没有可见选项时退到全文档查找。
pub fn options<D: DocumentTree>(doc: &D, root: NodeId) -> Vec<ExtractedOption> {
    let visible = |nodes: Vec<NodeId>| -> Vec<NodeId> {
        nodes.into_iter().filter(|&n| is_visible(doc, n)).collect()
    };

    let mut nodes = visible(doc.find_all(root, Marker::McqOption));
    if nodes.is_empty() {
        nodes = visible(doc.find_in_document(Marker::McqOption));
        if !nodes.is_empty() {
            debug!("题目内没有选项，使用全文档的 {} 个选项", nodes.len());
        }
    }

    nodes
        .into_iter()
        .enumerate()
        .map(|(idx, node)| extract_option(doc, node, idx))
        .collect()
}

fn extract_option<D: DocumentTree>(doc: &D, node: NodeId, idx: usize) -> ExtractedOption {
    let announced = doc
        .find_first(node, Marker::AssistiveDuplicate)
        .map(|sr| doc.text_content(sr));
    let letter = option_letter(announced.as_deref(), idx);

    let answer = doc
        .find_first(node, Marker::PossibleAnswer)
        .unwrap_or(node);
    let text = strip_option_prefix(&node_to_text(doc, Some(answer)));

    ExtractedOption { letter, text }
}

/// 优先用读屏文本里的字母，否则按位置编号
pub fn option_letter(announced: Option<&str>, idx: usize) -> String {
    announced
        .and_then(|text| OPTION_LETTER.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
        .unwrap_or_else(|| positional_letter(idx))
}

/// A..Z，超过 26 个之后用数字
pub fn positional_letter(idx: usize) -> String {
    match LETTERS.get(idx) {
        Some(&b) => char::from(b).to_string(),
        None => (idx + 1).to_string(),
    }
}

fn strip_option_prefix(text: &str) -> String {
    OPTION_PREFIX.replace(text, "").trim().to_string()
}
