//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"在页面里执行 JS"的能力。
//! 不认识 Submission，不处理业务流程。

use anyhow::{anyhow, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::timeout;

/// JS 执行器
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于导航事件等其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 带超时的执行：页面探针卡死时不会无限等待
    ///
    /// # 参数
    /// - `js_code`: 要执行的 JavaScript 代码
    /// - `limit`: 超时上限
    pub async fn eval_with_timeout(
        &self,
        js_code: impl Into<String>,
        limit: Duration,
    ) -> Result<JsonValue> {
        match timeout(limit, self.eval(js_code)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("页面探针超时 ({:?})", limit)),
        }
    }
}
