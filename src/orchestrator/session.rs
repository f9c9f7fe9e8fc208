//! 复制会话
//!
//! 调用方持有并在用完后丢弃，不存在全局单例。
//! 每次 `refresh()` 都重新采集页面并从头提取，不缓存任何中间结果。

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::dom::{Document, DomSnapshot};
use crate::infrastructure::{capture_snapshot, load_snapshot_file, JsExecutor};
use crate::models::ExtractionResult;
use crate::workflow::{question_flow, QuestionCtx};

/// 页面来源
pub enum SnapshotSource {
    /// 已连接浏览器中的页面
    Live(JsExecutor),
    /// 离线快照文件
    File(PathBuf),
}

impl SnapshotSource {
    async fn capture(&self) -> Result<DomSnapshot> {
        match self {
            SnapshotSource::Live(executor) => capture_snapshot(executor)
                .await
                .context("采集页面快照失败"),
            SnapshotSource::File(path) => Ok(load_snapshot_file(path).await?),
        }
    }

    fn describe(&self, snapshot: &DomSnapshot) -> String {
        match self {
            SnapshotSource::Live(_) => snapshot
                .url
                .clone()
                .unwrap_or_else(|| "live".to_string()),
            SnapshotSource::File(path) => path.display().to_string(),
        }
    }
}

/// 复制结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// 与上一次复制的内容不同（或是第一次复制）
    Changed,
    /// 与上一次复制的内容相同
    Unchanged,
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyStatus::Changed => write!(f, "已更新"),
            CopyStatus::Unchanged => write!(f, "未变化"),
        }
    }
}

/// 复制会话
pub struct CopySession {
    source: SnapshotSource,
    runs: usize,
    last_copied: Option<String>,
    last_snapshot: Option<DomSnapshot>,
}

impl CopySession {
    pub fn new(source: SnapshotSource) -> Self {
        Self {
            source,
            runs: 0,
            last_copied: None,
            last_snapshot: None,
        }
    }

    /// 重新采集页面并完整提取一次
    pub async fn refresh(&mut self) -> Result<(ExtractionResult, String)> {
        let snapshot = self.source.capture().await?;
        let doc = Document::from_snapshot(&snapshot).context("快照结构非法")?;

        self.runs += 1;
        let ctx = QuestionCtx::new(self.runs, self.source.describe(&snapshot));
        debug!("{} 文档节点 {} 个", ctx, doc.len());

        let extracted = question_flow::run(&doc, &ctx);
        self.last_snapshot = Some(snapshot);
        Ok(extracted)
    }

    /// 提取并记为一次复制
    pub async fn copy(&mut self) -> Result<(String, CopyStatus)> {
        let (_, text) = self.refresh().await?;
        let status = if self.last_copied.as_deref() == Some(text.as_str()) {
            CopyStatus::Unchanged
        } else {
            CopyStatus::Changed
        };
        info!("📋 第 {} 次复制: {}", self.runs, status);
        self.last_copied = Some(text.clone());
        Ok((text, status))
    }

    /// 只看不记
    pub async fn preview(&mut self) -> Result<String> {
        let (_, text) = self.refresh().await?;
        Ok(text)
    }

    /// 本会话提取次数
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// 最近一次采集到的快照
    pub fn last_snapshot(&self) -> Option<&DomSnapshot> {
        self.last_snapshot.as_ref()
    }
}
