//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"在页面里执行脚本"的能力

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::BrowserError;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识题目结构，不做提取
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let js_code = js_code.into();
        debug!("执行脚本 ({} 字节)", js_code.len());

        let result = self
            .page
            .evaluate(js_code)
            .await
            .map_err(BrowserError::ScriptExecutionFailed)?;
        let json_value = result
            .into_value()
            .map_err(BrowserError::BadScriptResult)?;
        Ok(json_value)
    }

    /// 执行返回 `JSON.stringify(...)` 字符串的脚本，并在本地反序列化
    ///
    /// 页面对象很深时，直接按值返回容易触发 CDP 的序列化限制，
    /// 所以大结果统一走字符串。
    pub async fn eval_json<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let raw: String = self.eval_as(js_code).await?;
        debug!("脚本返回 {} 字节 JSON", raw.len());
        let value = serde_json::from_str(&raw)
            .map_err(BrowserError::BadScriptResult)
            .context("脚本返回的 JSON 与预期结构不符")?;
        Ok(value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value =
            serde_json::from_value(json_value).map_err(BrowserError::BadScriptResult)?;
        Ok(typed_value)
    }
}
