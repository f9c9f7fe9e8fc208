//! 页面快照的采集与读写
//!
//! 在页面里执行一次遍历脚本，把 `document.body` 平铺成 [`DomSnapshot`]；
//! 也可以把快照存成 JSON 文件，之后离线重放提取。

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use super::JsExecutor;
use crate::dom::DomSnapshot;
use crate::error::{AppError, AppResult, FileError};

/// 工具自身面板的 id，采集时跳过
pub const OWN_PANEL_ID: &str = "nitramine-qcopy";

/// 先序遍历 body，返回 `JSON.stringify` 后的快照
///
/// 每个元素记录标签、属性、`getBoundingClientRect()` 与计算样式，
/// 文本节点只记录原始文本。脚本、样式、注释节点不采集。
pub const SNAPSHOT_SCRIPT: &str = r#"
(() => {
  const SKIP_TAGS = new Set(['SCRIPT', 'STYLE', 'NOSCRIPT', 'TEMPLATE']);
  const OWN_PANEL_ID = '__OWN_PANEL_ID__';
  const nodes = [];
  const stack = [[document.body, null]];

  while (stack.length > 0) {
    const [node, parent] = stack.pop();
    const index = nodes.length;

    if (node.nodeType === Node.TEXT_NODE) {
      nodes.push({ parent, type: 'text', text: node.nodeValue || '' });
      continue;
    }
    if (node.nodeType !== Node.ELEMENT_NODE) continue;
    if (SKIP_TAGS.has(node.tagName) || node.id === OWN_PANEL_ID) continue;

    const attrs = {};
    for (const a of node.attributes) attrs[a.name] = a.value;
    const r = node.getBoundingClientRect();
    const cs = getComputedStyle(node);
    nodes.push({
      parent,
      type: 'element',
      tag: node.localName,
      attrs,
      rect: { x: r.left, y: r.top, width: r.width, height: r.height },
      style: {
        display: cs.display,
        visibility: cs.visibility,
        opacity: Number(cs.opacity)
      }
    });

    const children = node.childNodes;
    for (let i = children.length - 1; i >= 0; i--) {
      stack.push([children[i], index]);
    }
  }

  return JSON.stringify({
    url: location.href,
    title: document.title,
    viewport: { width: window.innerWidth, height: window.innerHeight },
    nodes
  });
})()
"#;

/// 从页面采集一次快照
pub async fn capture_snapshot(executor: &JsExecutor) -> Result<DomSnapshot> {
    let script = SNAPSHOT_SCRIPT.replace("__OWN_PANEL_ID__", OWN_PANEL_ID);
    let snapshot: DomSnapshot = executor.eval_json(script).await?;
    debug!(
        "📸 采集快照: {} 个节点, 视口 {}x{}",
        snapshot.nodes.len(),
        snapshot.viewport.width,
        snapshot.viewport.height
    );
    Ok(snapshot)
}

/// 读取快照文件
pub async fn load_snapshot_file(path: impl AsRef<Path>) -> AppResult<DomSnapshot> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&shown, e))?;
    let snapshot: DomSnapshot =
        serde_json::from_str(&content).map_err(|source| FileError::JsonParseFailed {
            path: shown.clone(),
            source,
        })?;

    debug!("📄 读取快照 {}: {} 个节点", shown, snapshot.nodes.len());
    Ok(snapshot)
}

/// 保存快照文件（格式化 JSON）
pub async fn save_snapshot_file(path: impl AsRef<Path>, snapshot: &DomSnapshot) -> AppResult<()> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let content = serde_json::to_string_pretty(snapshot).map_err(|source| {
        FileError::JsonParseFailed {
            path: shown.clone(),
            source,
        }
    })?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(&shown, e))?;

    info!("💾 快照已保存: {}", shown);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_script_placeholder_replaced() {
        let script = SNAPSHOT_SCRIPT.replace("__OWN_PANEL_ID__", OWN_PANEL_ID);
        assert!(script.contains("'nitramine-qcopy'"));
        assert!(!script.contains("__OWN_PANEL_ID__"));
    }

    #[test]
    fn test_save_then_load() {
        let snapshot: DomSnapshot = serde_json::from_str(
            r#"{
                "viewport": {"width": 800, "height": 600},
                "nodes": [
                    {"type": "element", "tag": "body", "rect": {"x": 0, "y": 0, "width": 800, "height": 600}},
                    {"parent": 0, "type": "element", "tag": "p"},
                    {"parent": 1, "type": "text", "text": "hello"}
                ]
            }"#,
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("question_copy_snapshot_{}.json", std::process::id()));
        tokio_test::block_on(save_snapshot_file(&path, &snapshot)).unwrap();
        let loaded = tokio_test::block_on(load_snapshot_file(&path)).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.nodes.len(), 3);
        assert_eq!(loaded.viewport.width, 800.0);
        let doc = Document::from_snapshot(&loaded).unwrap();
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = tokio_test::block_on(load_snapshot_file("/nonexistent/question_copy.json"))
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }
}
