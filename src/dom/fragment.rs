//! 子树深拷贝
//!
//! 文本转换只在拷贝上进行删改，原文档保持只读。

use phf::phf_set;

use super::taxonomy::{Attributes, Marker};

/// 拷贝中的节点
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentNode {
    Element(FragmentElement),
    Text(String),
    /// 强制换行（`br` 替换结果、块尾标记）
    Newline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentElement {
    pub tag: String,
    pub attrs: Attributes,
    pub display: String,
    pub visibility: String,
    pub children: Vec<FragmentNode>,
}

impl FragmentElement {
    /// 只包含一段文本的行内 `span`
    pub fn text_span(text: impl Into<String>) -> Self {
        Self {
            tag: "span".to_string(),
            attrs: Attributes::new(),
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            children: vec![FragmentNode::Text(text.into())],
        }
    }

    pub fn is(&self, marker: Marker) -> bool {
        marker.matches(&self.tag, &self.attrs)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        super::taxonomy::attr(&self.attrs, name)
    }

    /// 先序查找第一个满足条件的后代元素（不含自身）
    pub fn find_first(&self, marker: Marker) -> Option<&FragmentElement> {
        for child in &self.children {
            if let FragmentNode::Element(el) = child {
                if el.is(marker) {
                    return Some(el);
                }
                if let Some(found) = el.find_first(marker) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                FragmentNode::Element(el) => el.collect_text(out),
                FragmentNode::Text(text) => out.push_str(text),
                FragmentNode::Newline => out.push('\n'),
            }
        }
    }
}

/// 一棵独立的拷贝树
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    root: FragmentNode,
}

static BLOCK_DISPLAYS: phf::Set<&'static str> = phf_set! {
    "block", "list-item", "flex", "grid", "table", "flow-root",
    "table-caption", "table-row", "table-row-group", "table-header-group",
    "table-footer-group",
};

enum Chunk {
    Text(String),
    /// 至少 n 个换行
    Break(usize),
    /// 额外追加一个换行
    Newline,
}

impl Fragment {
    pub fn new(root: FragmentNode) -> Self {
        Self { root }
    }

    /// 删除所有匹配的后代元素
    pub fn remove_all(&mut self, marker: Marker) {
        if let FragmentNode::Element(el) = &mut self.root {
            remove_in(el, marker);
        }
    }

    /// 用 `replace` 的返回值替换所有匹配的后代节点
    ///
    /// `replace` 拿到匹配节点和它在拷贝内的祖先链（根在前）。
    /// 只处理最外层匹配，被替换节点内部的嵌套匹配随之消失。
    pub fn replace_all<F>(&mut self, marker: Marker, mut replace: F)
    where
        F: FnMut(&FragmentElement, &[&FragmentElement]) -> FragmentNode,
    {
        let FragmentNode::Element(root) = &mut self.root else {
            return;
        };

        let mut planned = Vec::new();
        plan_replacements(root, marker, &mut Vec::new(), &mut Vec::new(), &mut replace, &mut planned);

        for (path, node) in planned {
            if let Some(slot) = node_at_mut(root, &path) {
                *slot = node;
            }
        }
    }

    /// 在每个匹配的后代元素末尾追加一个换行标记
    pub fn append_newline_to_all(&mut self, marker: Marker) {
        if let FragmentNode::Element(el) = &mut self.root {
            append_newline_in(el, marker);
        }
    }

    pub fn text_content(&self) -> String {
        match &self.root {
            FragmentNode::Element(el) => el.text_content(),
            FragmentNode::Text(text) => text.clone(),
            FragmentNode::Newline => "\n".to_string(),
        }
    }

    /// 按视觉效果渲染为纯文本（类似 `innerText`）
    ///
    /// 文本内空白折叠为单个空格（`pre` 内保留），块级元素前后换行，
    /// `p` 前后空一行，表格单元格之间用制表符。
    /// `display:none` 或 `visibility:hidden` 的后代整棵跳过。
    pub fn render_text(&self) -> String {
        let mut chunks = Vec::new();
        match &self.root {
            FragmentNode::Element(el) => render_element(el, false, true, &mut chunks),
            other => render_node(other, false, &mut chunks),
        }
        join_chunks(chunks)
    }
}

fn remove_in(el: &mut FragmentElement, marker: Marker) {
    el.children.retain(|child| match child {
        FragmentNode::Element(c) => !c.is(marker),
        _ => true,
    });
    for child in &mut el.children {
        if let FragmentNode::Element(c) = child {
            remove_in(c, marker);
        }
    }
}

fn plan_replacements<'a, F>(
    el: &'a FragmentElement,
    marker: Marker,
    path: &mut Vec<usize>,
    ancestors: &mut Vec<&'a FragmentElement>,
    replace: &mut F,
    planned: &mut Vec<(Vec<usize>, FragmentNode)>,
) where
    F: FnMut(&FragmentElement, &[&FragmentElement]) -> FragmentNode,
{
    ancestors.push(el);
    for (i, child) in el.children.iter().enumerate() {
        let FragmentNode::Element(c) = child else {
            continue;
        };
        path.push(i);
        if c.is(marker) {
            planned.push((path.clone(), replace(c, ancestors)));
        } else {
            plan_replacements(c, marker, path, ancestors, replace, planned);
        }
        path.pop();
    }
    ancestors.pop();
}

fn node_at_mut<'a>(root: &'a mut FragmentElement, path: &[usize]) -> Option<&'a mut FragmentNode> {
    let (last, parents) = path.split_last()?;
    let mut current = root;
    for &i in parents {
        match current.children.get_mut(i)? {
            FragmentNode::Element(el) => current = el,
            _ => return None,
        }
    }
    current.children.get_mut(*last)
}

fn append_newline_in(el: &mut FragmentElement, marker: Marker) {
    for child in &mut el.children {
        if let FragmentNode::Element(c) = child {
            append_newline_in(c, marker);
            if c.is(marker) {
                c.children.push(FragmentNode::Newline);
            }
        }
    }
}

fn render_node(node: &FragmentNode, in_pre: bool, out: &mut Vec<Chunk>) {
    match node {
        FragmentNode::Element(el) => render_element(el, in_pre, false, out),
        FragmentNode::Text(text) if in_pre => out.push(Chunk::Text(text.clone())),
        FragmentNode::Text(text) => out.push(Chunk::Text(collapse_whitespace(text))),
        FragmentNode::Newline => out.push(Chunk::Newline),
    }
}

fn render_element(el: &FragmentElement, in_pre: bool, is_root: bool, out: &mut Vec<Chunk>) {
    if !is_root && (el.display == "none" || el.visibility == "hidden") {
        return;
    }

    let in_pre = in_pre || el.tag == "pre";
    let breaks = if el.tag == "p" {
        2
    } else if BLOCK_DISPLAYS.contains(el.display.as_str()) {
        1
    } else {
        0
    };

    if breaks > 0 {
        out.push(Chunk::Break(breaks));
    }
    for child in &el.children {
        render_node(child, in_pre, out);
    }
    if el.display == "table-cell" {
        out.push(Chunk::Text("\t".to_string()));
    }
    if breaks > 0 {
        out.push(Chunk::Break(breaks));
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c') {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn join_chunks(chunks: Vec<Chunk>) -> String {
    let mut out = String::new();
    let mut pending = 0usize;

    for chunk in chunks {
        match chunk {
            Chunk::Break(n) => pending = pending.max(n),
            Chunk::Newline => pending += 1,
            Chunk::Text(text) => {
                if text.is_empty() {
                    continue;
                }
                // 行首或块边界处的纯空白不输出
                if text.trim_matches(' ').is_empty() && (out.is_empty() || pending > 0) {
                    continue;
                }
                if !out.is_empty() && pending > 0 {
                    out.push_str(&"\n".repeat(pending));
                }
                pending = 0;
                out.push_str(&text);
            }
        }
    }

    out
}
