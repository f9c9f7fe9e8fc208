//! 基础设施层
//!
//! 持有稀缺资源（Page），只暴露能力：执行脚本、采集快照。

pub mod js_executor;
pub mod snapshot;

pub use js_executor::JsExecutor;
pub use snapshot::{capture_snapshot, load_snapshot_file, save_snapshot_file};
