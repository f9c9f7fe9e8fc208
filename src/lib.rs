//! # Question Copy
//!
//! 从在线测评页面中提取"当前正在作答的题目"，输出为一段纯文本
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `snapshot` - 采集 / 读写页面快照
//! - `browser/` - 连接已有浏览器或启动无头浏览器
//!
//! ### 文档模型（Document）
//! - `dom/` - `DocumentTree` 查询能力、快照文档、可修改的克隆片段
//!
//! ### ② 业务能力层（Services）
//! - `normalizer` - 文本规整
//! - `media` - 图片 / 公式替换文字
//! - `node_text` - 节点转文本
//! - `visibility` - 可见性与面积
//! - `root_selector` - 选出当前题目根节点
//! - `fields` - 题号、材料、题干、选项
//!
//! ### ③ 流程层（Workflow）
//! - `question_flow` - 提取 → 拼装，唯一入口 [`build_output`]
//!
//! ### ④ 编排层（Orchestration）
//! - `CopySession` - 调用方持有的复制会话
//! - `App` - 命令行生命周期

pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser_and_page;
pub use config::Config;
pub use dom::{Document, DocumentBuilder, DocumentTree, DomSnapshot};
pub use error::{AppError, AppResult};
pub use infrastructure::JsExecutor;
pub use models::{ExtractedOption, ExtractionResult};
pub use orchestrator::{App, CopySession, CopyStatus, SnapshotSource};
pub use workflow::{build_output, QuestionCtx};
