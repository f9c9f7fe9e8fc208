//! 编排层（Orchestration Layer）
//!
//! ### `session` - 复制会话
//! - 持有页面来源（浏览器页面或快照文件）
//! - 每次复制都重新采集、从头提取
//! - 记录上一次复制的内容，用来判断是否变化
//!
//! ### `app` - 命令行应用
//! - 管理浏览器生命周期
//! - 单次提取或轮询
//! - 输出到 stdout 和输出文件
//!
//! ```text
//! app (生命周期 / 轮询)
//!     ↓
//! session (一次复制)
//!     ↓
//! workflow::question_flow (一次提取)
//!     ↓
//! services (能力层：选根 / 字段 / 文本转换)
//!     ↓
//! dom + infrastructure (文档模型 / 页面快照)
//! ```

pub mod app;
pub mod session;

pub use app::App;
pub use session::{CopySession, CopyStatus, SnapshotSource};
