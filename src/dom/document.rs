//! 文档快照的 arena 实现
//!
//! 浏览器里采集到的 [`DomSnapshot`] 会被展开成扁平的节点数组，
//! 通过 [`NodeId`] 引用，所有查询都是只读的。

use phf::phf_set;
use serde::{Deserialize, Serialize};

use super::fragment::{Fragment, FragmentElement, FragmentNode};
use super::geometry::{ComputedStyle, Rect, Viewport};
use super::taxonomy::{Attributes, Marker};
use super::DocumentTree;
use crate::error::SnapshotError;

/// 节点引用（文档内的数组下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 浏览器采集结果（序列化格式）
///
/// 节点按先序平铺，`parent` 指向更早出现的节点下标，第一个节点是根。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub viewport: Viewport,
    pub nodes: Vec<SnapshotNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(flatten)]
    pub kind: SnapshotKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SnapshotKind {
    Element {
        tag: String,
        #[serde(default)]
        attrs: Attributes,
        #[serde(default)]
        rect: Rect,
        #[serde(default)]
        style: Option<ComputedStyle>,
    },
    Text {
        text: String,
    },
}

/// 元素数据
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Attributes,
    pub rect: Rect,
    pub style: ComputedStyle,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// 只读文档树
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    viewport: Viewport,
}

static BLOCK_TAGS: phf::Set<&'static str> = phf_set! {
    "html", "body", "div", "p", "ul", "ol", "pre", "section", "article",
    "header", "footer", "main", "nav", "aside", "blockquote", "form",
    "fieldset", "figure", "figcaption", "dl", "dd", "dt", "hr", "address",
    "h1", "h2", "h3", "h4", "h5", "h6",
};

static HIDDEN_TAGS: phf::Set<&'static str> = phf_set! {
    "head", "script", "style", "template", "noscript", "title", "meta", "link",
};

/// 未采集到计算样式时，按标签推断默认 display
pub fn default_display(tag: &str) -> &'static str {
    match tag {
        "li" => "list-item",
        "table" => "table",
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "tbody" => "table-row-group",
        "thead" => "table-header-group",
        "tfoot" => "table-footer-group",
        "caption" => "table-caption",
        _ if BLOCK_TAGS.contains(tag) => "block",
        _ if HIDDEN_TAGS.contains(tag) => "none",
        _ => "inline",
    }
}

impl Document {
    /// 从浏览器快照构建文档
    pub fn from_snapshot(snapshot: &DomSnapshot) -> Result<Self, SnapshotError> {
        let mut doc = Self {
            nodes: Vec::with_capacity(snapshot.nodes.len()),
            viewport: snapshot.viewport,
        };

        let Some(first) = snapshot.nodes.first() else {
            return Err(SnapshotError::Empty);
        };
        if !matches!(first.kind, SnapshotKind::Element { .. }) || first.parent.is_some() {
            return Err(SnapshotError::InvalidRoot);
        }

        for (index, node) in snapshot.nodes.iter().enumerate() {
            let parent = match node.parent {
                None if index == 0 => None,
                Some(p) if p < index && doc.element(NodeId(p)).is_some() => Some(NodeId(p)),
                parent => return Err(SnapshotError::InvalidParent { index, parent }),
            };
            let kind = match &node.kind {
                SnapshotKind::Element {
                    tag,
                    attrs,
                    rect,
                    style,
                } => {
                    let tag = tag.to_ascii_lowercase();
                    let style = style
                        .clone()
                        .unwrap_or_else(|| ComputedStyle::with_display(default_display(&tag)));
                    NodeKind::Element(ElementData {
                        tag,
                        attrs: attrs.clone(),
                        rect: *rect,
                        style,
                    })
                }
                SnapshotKind::Text { text } => NodeKind::Text(text.clone()),
            };
            doc.push_node(parent, kind);
        }

        Ok(doc)
    }

    fn push_element(&mut self, parent: Option<NodeId>, data: ElementData) -> NodeId {
        self.push_node(parent, NodeKind::Element(data))
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    /// 元素数据；文本节点返回 None
    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 先序遍历 scope 的后代（不含自身），遇到第一个满足条件的停止
    fn walk_descendants(&self, scope: NodeId, visit: &mut impl FnMut(NodeId) -> bool) -> bool {
        for &child in self.children(scope) {
            if visit(child) || self.walk_descendants(child, visit) {
                return true;
            }
        }
        false
    }

    fn clone_node(&self, node: NodeId) -> FragmentNode {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => FragmentNode::Text(text.clone()),
            NodeKind::Element(data) => FragmentNode::Element(FragmentElement {
                tag: data.tag.clone(),
                attrs: data.attrs.clone(),
                display: data.style.display.clone(),
                visibility: data.style.visibility.clone(),
                children: self
                    .children(node)
                    .iter()
                    .map(|&c| self.clone_node(c))
                    .collect(),
            }),
        }
    }
}

fn synthetic_body(viewport: Viewport) -> ElementData {
    ElementData {
        tag: "body".to_string(),
        attrs: Attributes::new(),
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        style: ComputedStyle::with_display("block"),
    }
}

impl DocumentTree for Document {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn matches(&self, node: NodeId, marker: Marker) -> bool {
        self.element(node)
            .is_some_and(|el| marker.matches(&el.tag, &el.attrs))
    }

    fn find_all(&self, scope: NodeId, marker: Marker) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.walk_descendants(scope, &mut |n| {
            if self.matches(n, marker) {
                found.push(n);
            }
            false
        });
        found
    }

    fn find_first(&self, scope: NodeId, marker: Marker) -> Option<NodeId> {
        let mut found = None;
        self.walk_descendants(scope, &mut |n| {
            if self.matches(n, marker) {
                found = Some(n);
                true
            } else {
                false
            }
        });
        found
    }

    fn style(&self, node: NodeId) -> Option<&ComputedStyle> {
        self.element(node).map(|el| &el.style)
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.element(node).map(|el| el.rect)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|el| super::taxonomy::attr(&el.attrs, name))
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeKind::Text(text)) = self.nodes.get(node.0).map(|n| &n.kind) {
            out.push_str(text);
            return out;
        }
        self.walk_descendants(node, &mut |n| {
            if let NodeKind::Text(text) = &self.nodes[n.0].kind {
                out.push_str(text);
            }
            false
        });
        out
    }

    fn clone_subtree(&self, node: NodeId) -> Fragment {
        Fragment::new(self.clone_node(node))
    }
}

/// 测试 / 离线场景下手工搭建文档
///
/// 新元素默认继承父元素的矩形，display 按标签推断。
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    /// 创建只有 `body` 的文档，body 占满视口
    pub fn new(viewport: Viewport) -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            viewport,
        };
        doc.push_element(None, synthetic_body(viewport));
        Self { doc }
    }

    pub fn root(&self) -> NodeId {
        self.doc.root()
    }

    /// 在 parent 下追加元素
    pub fn element(&mut self, parent: NodeId, tag: &str) -> ElementHandle<'_> {
        let rect = self
            .doc
            .element(parent)
            .map(|el| el.rect)
            .unwrap_or_default();
        let tag = tag.to_ascii_lowercase();
        let style = ComputedStyle::with_display(default_display(&tag));
        let id = self.doc.push_element(
            Some(parent),
            ElementData {
                tag,
                attrs: Attributes::new(),
                rect,
                style,
            },
        );
        ElementHandle { builder: self, id }
    }

    /// 在 parent 下追加文本节点
    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.doc
            .push_node(Some(parent), NodeKind::Text(text.to_string()))
    }

    pub fn build(self) -> Document {
        self.doc
    }

    fn data_mut(&mut self, id: NodeId) -> &mut ElementData {
        match &mut self.doc.nodes[id.0].kind {
            NodeKind::Element(data) => data,
            NodeKind::Text(_) => unreachable!("ElementHandle 总是指向元素"),
        }
    }
}

/// [`DocumentBuilder::element`] 返回的链式句柄
pub struct ElementHandle<'a> {
    builder: &'a mut DocumentBuilder,
    id: NodeId,
}

impl ElementHandle<'_> {
    pub fn class(self, class: &str) -> Self {
        let data = self.builder.data_mut(self.id);
        let merged = match data.attrs.get("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        data.attrs.insert("class".to_string(), merged);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.builder
            .data_mut(self.id)
            .attrs
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn rect(self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.builder.data_mut(self.id).rect = Rect::new(x, y, width, height);
        self
    }

    pub fn display(self, display: &str) -> Self {
        self.builder.data_mut(self.id).style.display = display.to_string();
        self
    }

    pub fn visibility(self, visibility: &str) -> Self {
        self.builder.data_mut(self.id).style.visibility = visibility.to_string();
        self
    }

    pub fn opacity(self, opacity: f64) -> Self {
        self.builder.data_mut(self.id).style.opacity = opacity;
        self
    }

    /// 追加文本子节点
    pub fn text(self, text: &str) -> Self {
        self.builder.text(self.id, text);
        self
    }

    pub fn id(self) -> NodeId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        let q = b.element(root, "div").class("lrn_question").id();
        let inner = b.element(q, "span").class("lrn_question").text("x").id();
        (b.build(), q, inner)
    }

    #[test]
    fn test_find_all_excludes_scope_and_keeps_order() {
        let (doc, q, inner) = sample();
        assert_eq!(doc.find_all(doc.root(), Marker::Question), vec![q, inner]);
        assert_eq!(doc.find_all(q, Marker::Question), vec![inner]);
        assert_eq!(doc.find_first(inner, Marker::Question), None);
    }

    #[test]
    fn test_closest_includes_self() {
        let (doc, q, inner) = sample();
        assert_eq!(doc.closest(inner, Marker::Question), Some(inner));
        assert_eq!(doc.closest(q, Marker::TwoColumnWrapper), None);
    }

    #[test]
    fn test_find_in_document_includes_root() {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        b.element(root, "div").class("lrn_question");
        let doc = b.build();
        assert_eq!(doc.find_in_document(Marker::Question).len(), 1);
    }

    #[test]
    fn test_text_content_concatenates() {
        let mut b = DocumentBuilder::new(Viewport::default());
        let root = b.root();
        let p = b.element(root, "p").text("Hello ").id();
        b.element(p, "b").text("world");
        let doc = b.build();
        assert_eq!(doc.text_content(p), "Hello world");
    }

    #[test]
    fn test_builder_inherits_rect() {
        let mut b = DocumentBuilder::new(Viewport {
            width: 200.0,
            height: 100.0,
        });
        let root = b.root();
        let div = b.element(root, "div").id();
        let doc = b.build();
        assert_eq!(doc.bounding_rect(div), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
        assert_eq!(doc.style(div).map(|s| s.display.as_str()), Some("block"));
    }

    #[test]
    fn test_from_snapshot_json() {
        let json = r#"{
            "viewport": {"width": 800, "height": 600},
            "nodes": [
                {"type": "element", "tag": "BODY", "rect": {"x":0,"y":0,"width":800,"height":600}},
                {"parent": 0, "type": "element", "tag": "span", "attrs": {"data-cy": "question-number"},
                 "style": {"display": "inline", "visibility": "visible", "opacity": 1}},
                {"parent": 1, "type": "text", "text": "7"}
            ]
        }"#;
        let snapshot: DomSnapshot = serde_json::from_str(json).unwrap();
        let doc = Document::from_snapshot(&snapshot).unwrap();
        let marker = doc.find_first(doc.root(), Marker::QuestionNumber).unwrap();
        assert_eq!(doc.text_content(marker), "7");
        assert_eq!(doc.element(doc.root()).unwrap().tag, "body");
        assert_eq!(doc.style(doc.root()).unwrap().display, "block");
    }

    #[test]
    fn test_from_snapshot_rejects_bad_shapes() {
        let element = |parent| SnapshotNode {
            parent,
            kind: SnapshotKind::Element {
                tag: "div".to_string(),
                attrs: Attributes::new(),
                rect: Rect::default(),
                style: None,
            },
        };
        let text = |parent| SnapshotNode {
            parent,
            kind: SnapshotKind::Text {
                text: "t".to_string(),
            },
        };
        let snapshot = |nodes| DomSnapshot {
            url: None,
            title: None,
            viewport: Viewport::default(),
            nodes,
        };

        assert!(matches!(
            Document::from_snapshot(&snapshot(vec![])),
            Err(SnapshotError::Empty)
        ));
        assert!(matches!(
            Document::from_snapshot(&snapshot(vec![text(None)])),
            Err(SnapshotError::InvalidRoot)
        ));
        // 父节点必须在前面出现
        assert!(matches!(
            Document::from_snapshot(&snapshot(vec![element(None), element(Some(2)), element(Some(0))])),
            Err(SnapshotError::InvalidParent { index: 1, .. })
        ));
        // 文本节点不能有子节点
        assert!(matches!(
            Document::from_snapshot(&snapshot(vec![element(None), text(Some(0)), element(Some(1))])),
            Err(SnapshotError::InvalidParent { index: 2, .. })
        ));
        assert_eq!(
            Document::from_snapshot(&snapshot(vec![element(None), element(Some(0))]))
                .unwrap()
                .len(),
            2
        );
    }
}
