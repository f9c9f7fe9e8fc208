//! 可见性与几何 - 业务能力层

use crate::dom::{DocumentTree, NodeId};

/// 节点是否真的渲染在页面上
///
/// display:none / visibility:hidden / opacity:0 视为不可见，
/// 其余情况要求渲染矩形宽高都大于 0。文本节点一律不可见。
pub fn is_visible<D: DocumentTree>(doc: &D, node: NodeId) -> bool {
    let Some(style) = doc.style(node) else {
        return false;
    };
    if style.is_hidden() {
        return false;
    }
    doc.bounding_rect(node)
        .is_some_and(|rect| rect.width > 0.0 && rect.height > 0.0)
}

/// 渲染矩形面积
pub fn area<D: DocumentTree>(doc: &D, node: NodeId) -> f64 {
    doc.bounding_rect(node).map(|r| r.area()).unwrap_or(0.0)
}

/// 渲染矩形与当前视口的交集面积
pub fn viewport_overlap_area<D: DocumentTree>(doc: &D, node: NodeId) -> f64 {
    doc.bounding_rect(node)
        .map(|r| r.overlap_with(doc.viewport()))
        .unwrap_or(0.0)
}
