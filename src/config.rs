use std::str::FromStr;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 目标URL（找不到目标页面时打开）
    pub target_url: Option<String>,
    /// 目标页面标题关键字
    pub target_title: Option<String>,
    /// 启动无头浏览器而不是连接已有浏览器
    pub headless: bool,
    /// 无头模式使用的浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// 从快照文件离线提取（不连接浏览器）
    pub snapshot_path: Option<String>,
    /// 保存本次采集到的快照
    pub save_snapshot_path: Option<String>,
    /// 输出日志文件
    pub output_log_file: String,
    /// 轮询间隔（毫秒），为空时只提取一次
    pub poll_interval_ms: Option<u64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: None,
            target_title: None,
            headless: false,
            chrome_executable: None,
            snapshot_path: None,
            save_snapshot_path: None,
            output_log_file: "question_copy.txt".to_string(),
            poll_interval_ms: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取，未设置的项使用默认值，无法解析的值报错
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取（便于测试）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();
        let text = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            browser_debug_port: parse_var(&lookup, "BROWSER_DEBUG_PORT")?
                .unwrap_or(default.browser_debug_port),
            target_url: text("TARGET_URL"),
            target_title: text("TARGET_TITLE"),
            headless: parse_var(&lookup, "HEADLESS")?.unwrap_or(default.headless),
            chrome_executable: text("CHROME_EXECUTABLE"),
            snapshot_path: text("SNAPSHOT_PATH"),
            save_snapshot_path: text("SAVE_SNAPSHOT_PATH"),
            output_log_file: text("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            poll_interval_ms: parse_var(&lookup, "POLL_INTERVAL_MS")?,
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING")?.unwrap_or(default.verbose_logging),
        };

        config.validate()?;
        Ok(config)
    }

    /// 检查互相冲突的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshot_path.is_some() && self.headless {
            return Err(ConfigError::Conflict(
                "SNAPSHOT_PATH 与 HEADLESS 不能同时使用".to_string(),
            ));
        }
        if self.headless && self.target_url.is_none() {
            return Err(ConfigError::Conflict(
                "HEADLESS 模式必须设置 TARGET_URL".to_string(),
            ));
        }
        if self.poll_interval_ms == Some(0) {
            return Err(ConfigError::Conflict(
                "POLL_INTERVAL_MS 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: name.to_string(),
            value,
            expected_type: std::any::type_name::<T>().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.browser_debug_port, 9222);
        assert_eq!(config.poll_interval_ms, None);
        assert!(!config.headless);
    }

    #[test]
    fn test_values_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("BROWSER_DEBUG_PORT", "2001"),
            ("TARGET_TITLE", "Assessment"),
            ("POLL_INTERVAL_MS", " 1500 "),
            ("VERBOSE_LOGGING", "true"),
            ("SNAPSHOT_PATH", ""),
        ]))
        .unwrap();
        assert_eq!(config.browser_debug_port, 2001);
        assert_eq!(config.target_title.as_deref(), Some("Assessment"));
        assert_eq!(config.poll_interval_ms, Some(1500));
        assert!(config.verbose_logging);
        assert_eq!(config.snapshot_path, None);
    }

    #[test]
    fn test_bad_value_is_error() {
        let err = Config::from_lookup(lookup(&[("BROWSER_DEBUG_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { .. }));
    }

    #[test]
    fn test_conflicts() {
        assert!(Config::from_lookup(lookup(&[("HEADLESS", "true")])).is_err());
        assert!(Config::from_lookup(lookup(&[
            ("HEADLESS", "true"),
            ("TARGET_URL", "https://example.com"),
            ("SNAPSHOT_PATH", "page.json"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup(&[("POLL_INTERVAL_MS", "0")])).is_err());
    }
}
