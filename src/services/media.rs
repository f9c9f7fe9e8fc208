//! 公式 / 图片替换 - 业务能力层
//!
//! 把 MathJax 公式和图片换成等价的文字，只在拷贝树上工作

use crate::dom::{FragmentElement, Marker};

/// 图片没有任何描述时的占位文字
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// 图片的文字描述：alt → aria-label → title → 占位
pub fn image_text(img: &FragmentElement) -> String {
    img.attr("alt")
        .or_else(|| img.attr("aria-label"))
        .or_else(|| img.attr("title"))
        .unwrap_or(IMAGE_PLACEHOLDER)
        .to_string()
}

/// 公式节点的文字描述，找不到返回空串（调用方回退到节点文本）
///
/// 优先级：
/// 1. `span.math_expression` 包裹内的 aria-label
/// 2. `mjx-assistive-mml` 里 `math` 的 alttext
/// 3. 节点内或祖先上任意 aria-label
///
/// `ancestors` 是节点在拷贝树中的祖先链，根在前。
pub fn math_text(node: &FragmentElement, ancestors: &[&FragmentElement]) -> String {
    // 自身在前，逐级向上
    let chain: Vec<&FragmentElement> = std::iter::once(node)
        .chain(ancestors.iter().rev().copied())
        .collect();

    if let Some(wrapper) = chain.iter().find(|el| el.is(Marker::MathExpression)) {
        if let Some(label) = wrapper
            .find_first(Marker::AriaLabelled)
            .and_then(|el| el.attr("aria-label"))
        {
            return label.to_string();
        }
    }

    if let Some(alt) = find_assistive_math(&chain, 0).and_then(|el| el.attr("alttext")) {
        return alt.to_string();
    }

    let labelled = node
        .find_first(Marker::AriaLabelled)
        .or_else(|| chain.iter().copied().find(|el| el.is(Marker::AriaLabelled)));
    if let Some(label) = labelled.and_then(|el| el.attr("aria-label")) {
        return label.to_string();
    }

    String::new()
}

/// 先在节点内找辅助 MathML，找不到再去最近的 `mjx-container` 里找
fn find_assistive_math<'a>(chain: &[&'a FragmentElement], start: usize) -> Option<&'a FragmentElement> {
    let under = |from: usize| chain[from..].iter().any(|el| el.is(Marker::AssistiveMathMl));

    if let Some(found) = alt_math_within(chain[start], under(start)) {
        return Some(found);
    }

    let container = chain.iter().position(|el| el.is(Marker::MathContainer))?;
    alt_math_within(chain[container], under(container))
}

/// `scope` 的后代中，位于 `mjx-assistive-mml` 之下的第一个 `math[alttext]`
fn alt_math_within(scope: &FragmentElement, under_assistive: bool) -> Option<&FragmentElement> {
    for child in &scope.children {
        let crate::dom::FragmentNode::Element(el) = child else {
            continue;
        };
        if under_assistive && el.is(Marker::AltTextMath) {
            return Some(el);
        }
        if let Some(found) = alt_math_within(el, under_assistive || el.is(Marker::AssistiveMathMl)) {
            return Some(found);
        }
    }
    None
}
