//! 文档模型 - 能力查询抽象
//!
//! 提取流程只依赖 [`DocumentTree`] trait：
//! 浏览器快照、测试用的内存树都可以实现它。

pub mod document;
pub mod fragment;
pub mod geometry;
pub mod taxonomy;

pub use document::{Document, DocumentBuilder, DomSnapshot, ElementData, NodeId, SnapshotNode};
pub use fragment::{Fragment, FragmentElement, FragmentNode};
pub use geometry::{ComputedStyle, Rect, Viewport};
pub use taxonomy::{Attributes, Marker};

/// 对文档树的只读查询能力
pub trait DocumentTree {
    /// 文档根容器（通常是 body）
    fn root(&self) -> NodeId;

    fn viewport(&self) -> Viewport;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn matches(&self, node: NodeId, marker: Marker) -> bool;

    /// scope 的所有匹配后代（不含 scope 自身），按文档顺序
    fn find_all(&self, scope: NodeId, marker: Marker) -> Vec<NodeId>;

    fn find_first(&self, scope: NodeId, marker: Marker) -> Option<NodeId> {
        self.find_all(scope, marker).into_iter().next()
    }

    /// 整个文档范围内查找（包含根节点）
    fn find_in_document(&self, marker: Marker) -> Vec<NodeId> {
        let root = self.root();
        let mut found = Vec::new();
        if self.matches(root, marker) {
            found.push(root);
        }
        found.extend(self.find_all(root, marker));
        found
    }

    fn find_first_in_document(&self, marker: Marker) -> Option<NodeId> {
        let root = self.root();
        if self.matches(root, marker) {
            return Some(root);
        }
        self.find_first(root, marker)
    }

    /// 最近的匹配祖先（包含自身）
    fn closest(&self, node: NodeId, marker: Marker) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.matches(n, marker) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// 计算样式；文本节点没有
    fn style(&self, node: NodeId) -> Option<&ComputedStyle>;

    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;

    /// 非空属性值
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn text_content(&self, node: NodeId) -> String;

    /// 深拷贝子树
    fn clone_subtree(&self, node: NodeId) -> Fragment;
}
