//! 节点分类表
//!
//! 题目页面上所有需要识别的节点都在这里按 tag / class / 属性 定义，
//! 其他模块只通过 [`Marker`] 查询，不直接写 class 名。

use std::collections::BTreeMap;

use phf::phf_set;

/// 元素属性表（有序，便于快照稳定序列化）
pub type Attributes = BTreeMap<String, String>;

/// 题目容器的 class 集合
static QUESTION_CONTAINER_CLASSES: phf::Set<&'static str> = phf_set! {
    "lrn_widget",
    "lrn_question",
    "right-column",
    "response-content",
    "lrn_qr",
};

/// MathJax 渲染产生的自定义标签
static MATH_TAGS: phf::Set<&'static str> = phf_set! {
    "mjx-container",
    "mjx-math",
    "mjx-assistive-mml",
};

/// 需要在末尾补换行的块标签
static BLOCK_BREAK_TAGS: phf::Set<&'static str> = phf_set! {
    "p",
    "li",
    "pre",
};

/// 节点分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `data-cy="question-number"`
    QuestionNumber,
    /// 题目容器（lrn_widget / lrn_question / right-column / ...）
    QuestionContainer,
    /// `.lrn_question`
    Question,
    /// `.two-columns-wrapper`
    TwoColumnWrapper,
    /// `.left-column`
    LeftColumn,
    /// `.lrn_sharedpassage`
    SharedPassage,
    /// `.lrn_feature`
    Feature,
    /// `.lrn_stimulus`
    Stimulus,
    /// `.lrn_stimulus_content`
    StimulusContent,
    /// `.lrn-mcq-option`
    McqOption,
    /// `.lrn-possible-answer`
    PossibleAnswer,
    /// `.sr-only`，只给读屏软件看的重复内容
    AssistiveDuplicate,
    /// `img`
    Image,
    /// `br`
    LineBreak,
    /// `p` / `li` / `pre`
    BlockBreak,
    /// 数学公式渲染节点
    MathLike,
    /// `span.math_expression`
    MathExpression,
    /// `mjx-container`
    MathContainer,
    /// `mjx-assistive-mml`
    AssistiveMathMl,
    /// `math[alttext]`
    AltTextMath,
    /// 任何带 `aria-label` 的节点
    AriaLabelled,
}

impl Marker {
    /// 判断一个元素是否属于该分类
    pub fn matches(self, tag: &str, attrs: &Attributes) -> bool {
        match self {
            Marker::QuestionNumber => attr(attrs, "data-cy") == Some("question-number"),
            Marker::QuestionContainer => classes(attrs).any(|c| QUESTION_CONTAINER_CLASSES.contains(c)),
            Marker::Question => has_class(attrs, "lrn_question"),
            Marker::TwoColumnWrapper => has_class(attrs, "two-columns-wrapper"),
            Marker::LeftColumn => has_class(attrs, "left-column"),
            Marker::SharedPassage => has_class(attrs, "lrn_sharedpassage"),
            Marker::Feature => has_class(attrs, "lrn_feature"),
            Marker::Stimulus => has_class(attrs, "lrn_stimulus"),
            Marker::StimulusContent => has_class(attrs, "lrn_stimulus_content"),
            Marker::McqOption => has_class(attrs, "lrn-mcq-option"),
            Marker::PossibleAnswer => has_class(attrs, "lrn-possible-answer"),
            Marker::AssistiveDuplicate => has_class(attrs, "sr-only"),
            Marker::Image => tag == "img",
            Marker::LineBreak => tag == "br",
            Marker::BlockBreak => BLOCK_BREAK_TAGS.contains(tag),
            Marker::MathLike => {
                Marker::MathExpression.matches(tag, attrs)
                    || MATH_TAGS.contains(tag)
                    || has_class(attrs, "MathJax")
                    || attr(attrs, "role") == Some("math")
            }
            Marker::MathExpression => tag == "span" && has_class(attrs, "math_expression"),
            Marker::MathContainer => tag == "mjx-container",
            Marker::AssistiveMathMl => tag == "mjx-assistive-mml",
            Marker::AltTextMath => tag == "math" && attrs.contains_key("alttext"),
            Marker::AriaLabelled => attrs.contains_key("aria-label"),
        }
    }
}

/// 读取属性，空字符串视为不存在
pub fn attr<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a str> {
    attrs
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

pub fn classes(attrs: &Attributes) -> impl Iterator<Item = &str> {
    attrs
        .get("class")
        .map(String::as_str)
        .unwrap_or_default()
        .split_ascii_whitespace()
}

pub fn has_class(attrs: &Attributes, class: &str) -> bool {
    classes(attrs).any(|c| c == class)
}
