//! 节点转文本 - 业务能力层
//!
//! 把一棵带无障碍标注、公式、图片的子树变成人眼看到的纯文本

use tracing::trace;

use crate::dom::{DocumentTree, Fragment, FragmentElement, FragmentNode, Marker, NodeId};
use crate::services::media;
use crate::services::normalizer::normalize;

/// 把节点转换为规整后的纯文本；节点不存在时返回空串
///
/// 只在深拷贝上操作，原文档不会被修改。
pub fn node_to_text<D: DocumentTree>(doc: &D, node: Option<NodeId>) -> String {
    let Some(node) = node else {
        return String::new();
    };
    fragment_to_text(doc.clone_subtree(node))
}

/// 对已拷贝出的子树执行清洗和渲染
pub fn fragment_to_text(mut clone: Fragment) -> String {
    // 读屏专用的重复内容（例如 "Option A,"）必须先删，否则文本会重复
    clone.remove_all(Marker::AssistiveDuplicate);

    clone.replace_all(Marker::Image, |img, _| {
        text_span(media::image_text(img))
    });

    clone.replace_all(Marker::MathLike, |el, ancestors| {
        let text = media::math_text(el, ancestors);
        if text.is_empty() {
            trace!("公式节点 <{}> 没有可用描述，使用原文本", el.tag);
            text_span(el.text_content())
        } else {
            text_span(text)
        }
    });

    clone.replace_all(Marker::LineBreak, |_, _| FragmentNode::Newline);
    clone.append_newline_to_all(Marker::BlockBreak);

    normalize(&clone.render_text())
}

fn text_span(text: String) -> FragmentNode {
    FragmentNode::Element(FragmentElement::text_span(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DocumentBuilder, Viewport};

    #[test]
    fn test_absent_node_is_empty() {
        let doc = DocumentBuilder::new(Viewport::default()).build();
        assert_eq!(node_to_text(&doc, None), "");
    }

    #[test]
    fn test_assistive_duplicate_suppressed() {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        let option = b.element(root, "li").class("lrn-mcq-option").id();
        b.element(option, "span").class("sr-only").text("Option B,");
        b.element(option, "span").text("Paris");
        let doc = b.build();

        assert_eq!(node_to_text(&doc, Some(option)), "Paris");
    }

    #[test]
    fn test_source_tree_untouched() {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        let div = b.element(root, "div").id();
        b.element(div, "span").class("sr-only").text("hidden dup");
        b.element(div, "img").attr("alt", "a cat");
        let doc = b.build();

        assert_eq!(node_to_text(&doc, Some(div)), "a cat");
        assert_eq!(doc.find_all(div, Marker::AssistiveDuplicate).len(), 1);
        assert_eq!(doc.find_all(div, Marker::Image).len(), 1);
    }

    #[test]
    fn test_math_and_images_substituted() {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        let p = b.element(root, "p").text("Solve ").id();
        let wrapper = b.element(p, "span").class("math_expression").id();
        let mjx = b
            .element(wrapper, "mjx-container")
            .attr("aria-label", "math")
            .id();
        b.element(mjx, "span").attr("aria-label", "x squared");
        b.element(mjx, "mjx-math").text("x2");
        b.text(p, " given ");
        b.element(p, "img");
        let doc = b.build();

        // 外层 span.math_expression 的后代中第一个 aria-label 是 "math"
        assert_eq!(node_to_text(&doc, Some(p)), "Solve math given [image]");
    }

    #[test]
    fn test_math_falls_back_to_rendered_text() {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        let div = b.element(root, "div").text("Value: ").id();
        b.element(div, "mjx-container").text("42");
        let doc = b.build();

        assert_eq!(node_to_text(&doc, Some(div)), "Value: 42");
    }

    #[test]
    fn test_hidden_descendants_dropped() {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        let div = b.element(root, "div").text("shown ").id();
        b.element(div, "span").visibility("hidden").text("invisible");
        b.element(div, "span").display("none").text("gone");
        let doc = b.build();

        assert_eq!(node_to_text(&doc, Some(div)), "shown");
    }

    #[test]
    fn test_line_breaks_and_blocks() {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        let div = b.element(root, "div").id();
        let p1 = b.element(div, "p").text("First line").id();
        b.element(p1, "br");
        b.text(p1, "second line");
        b.element(div, "p").text("Next paragraph");
        let ul = b.element(div, "ul").id();
        b.element(ul, "li").text("one");
        b.element(ul, "li").text("two");
        let doc = b.build();

        assert_eq!(
            node_to_text(&doc, Some(div)),
            "First line\nsecond line\n\nNext paragraph\n\none\ntwo"
        );
    }
}
