//! 当前题目定位 - 业务能力层
//!
//! 单页应用里可能同时挂着多道题，这里挑出用户正在看的那一道

use std::cmp::Ordering;

use tracing::debug;

use crate::dom::{DocumentTree, Marker, NodeId};
use crate::services::visibility::{area, is_visible, viewport_overlap_area};

/// 候选集合来自哪一级回退
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateTier {
    /// 可见题号所在的题目容器
    NumberMarker,
    /// 可见的 `.lrn_question`
    Question,
    /// 文档根容器
    DocumentRoot,
}

/// 打分后的候选题目根节点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateRoot {
    pub node: NodeId,
    pub has_visible_number_marker: bool,
    pub viewport_overlap_area: f64,
    pub total_area: f64,
    pub score: f64,
}

impl CandidateRoot {
    /// 计算候选节点的各项指标
    pub fn score<D: DocumentTree>(doc: &D, node: NodeId) -> Self {
        // 只看第一个题号标记
        let has_visible_number_marker = doc
            .find_first(node, Marker::QuestionNumber)
            .is_some_and(|n| is_visible(doc, n));
        let viewport_overlap_area = viewport_overlap_area(doc, node);
        let total_area = area(doc, node);

        Self {
            node,
            has_visible_number_marker,
            viewport_overlap_area,
            total_area,
            score: viewport_overlap_area * 2.0 + total_area,
        }
    }

    /// 排名比较：有可见题号的永远在前，其次按分数降序
    fn rank(&self, other: &Self) -> Ordering {
        other
            .has_visible_number_marker
            .cmp(&self.has_visible_number_marker)
            .then_with(|| other.score.total_cmp(&self.score))
    }
}

/// 收集候选节点，三级回退，取第一个非空的
///
/// 候选允许重复，不去重。
pub fn find_candidates<D: DocumentTree>(doc: &D) -> (CandidateTier, Vec<NodeId>) {
    let by_number: Vec<NodeId> = doc
        .find_in_document(Marker::QuestionNumber)
        .into_iter()
        .filter(|&n| is_visible(doc, n))
        .filter_map(|n| {
            doc.closest(n, Marker::QuestionContainer)
                .or_else(|| doc.parent(n))
        })
        .collect();
    if !by_number.is_empty() {
        return (CandidateTier::NumberMarker, by_number);
    }

    let questions: Vec<NodeId> = doc
        .find_in_document(Marker::Question)
        .into_iter()
        .filter(|&n| is_visible(doc, n))
        .collect();
    if !questions.is_empty() {
        return (CandidateTier::Question, questions);
    }

    (CandidateTier::DocumentRoot, vec![doc.root()])
}

/// 选出当前题目的根节点
///
/// 排序稳定，指标完全相同的候选保持发现顺序。
pub fn select_root<D: DocumentTree>(doc: &D) -> CandidateRoot {
    let (tier, candidates) = find_candidates(doc);

    let mut scored: Vec<CandidateRoot> = candidates
        .into_iter()
        .map(|node| CandidateRoot::score(doc, node))
        .collect();
    scored.sort_by(CandidateRoot::rank);

    debug!("候选题目 {} 个 (来源: {:?})", scored.len(), tier);
    for (i, c) in scored.iter().enumerate() {
        debug!(
            "  {}. 节点#{} 可见题号: {} 视口面积: {:.0} 总面积: {:.0} 分数: {:.0}",
            i + 1,
            c.node.index(),
            c.has_visible_number_marker,
            c.viewport_overlap_area,
            c.total_area,
            c.score
        );
    }

    scored
        .into_iter()
        .next()
        .unwrap_or_else(|| CandidateRoot::score(doc, doc.root()))
}
