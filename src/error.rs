use thiserror::Error;

/// 应用程序错误类型
///
/// 提取流程本身不会失败（缺失内容用占位文字），
/// 这里只覆盖外层：浏览器、快照、文件、配置。
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 快照格式错误
    #[error("快照错误: {0}")]
    Snapshot(#[from] SnapshotError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 启动浏览器失败
    #[error("启动无头浏览器失败: {0}")]
    LaunchFailed(String),
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    ScriptExecutionFailed(#[from] chromiumoxide::error::CdpError),
    /// 脚本返回值无法解析
    #[error("脚本返回值解析失败: {0}")]
    BadScriptResult(#[from] serde_json::Error),
}

/// 快照格式错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// 没有任何节点
    #[error("快照为空")]
    Empty,
    /// 第一个节点必须是无父节点的元素
    #[error("快照根节点必须是元素")]
    InvalidRoot,
    /// 父节点下标非法
    #[error("节点 {index} 的父节点 {parent:?} 非法")]
    InvalidParent {
        index: usize,
        parent: Option<usize>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项互相冲突
    #[error("配置冲突: {0}")]
    Conflict(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(port: u16, source: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed { port, source })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: AppError = SnapshotError::InvalidParent {
            index: 3,
            parent: Some(9),
        }
        .into();
        assert_eq!(err.to_string(), "快照错误: 节点 3 的父节点 Some(9) 非法");

        let err = AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: "POLL_INTERVAL_MS".to_string(),
            value: "abc".to_string(),
            expected_type: "u64".to_string(),
        });
        assert!(err.to_string().contains("POLL_INTERVAL_MS"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AppError::file_read_failed("a.json", io);
        let file_err = err.source().expect("AppError 应该有 source");
        assert!(file_err.source().is_some());
    }
}
