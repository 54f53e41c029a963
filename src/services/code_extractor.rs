//! 代码提取服务 - 业务能力层
//!
//! 按固定顺序尝试一组独立的提取策略，取第一个成功的结果：
//! 1. Monaco 编辑器探针（页面执行上下文内读 model，带超时保护）
//! 2. 渲染文本兜底（.view-lines 容器的可见文本）
//!
//! 全部失败返回 None，调用方必须视为"中止，不推送"。

use crate::infrastructure::JsExecutor;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// 提取到的代码与编辑器报告的语言 ID
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedCode {
    pub code: String,
    /// Monaco 报告的语言 ID，渲染文本兜底时为 None
    #[serde(default)]
    pub language: Option<String>,
}

/// 提取策略，按声明顺序尝试
#[derive(Debug, Clone, Copy)]
enum CodeStrategy {
    /// 页面内 Monaco API
    MonacoProbe,
    /// 编辑器容器的渲染文本
    RenderedText,
}

const STRATEGY_CHAIN: [CodeStrategy; 2] = [CodeStrategy::MonacoProbe, CodeStrategy::RenderedText];

/// 代码提取服务
pub struct CodeExtractor<'a> {
    executor: &'a JsExecutor,
    probe_timeout: Duration,
}

impl<'a> CodeExtractor<'a> {
    pub fn new(executor: &'a JsExecutor, probe_timeout: Duration) -> Self {
        Self {
            executor,
            probe_timeout,
        }
    }

    /// 依次尝试各策略，返回第一个拿到代码的结果
    pub async fn extract(&self) -> Option<ExtractedCode> {
        for strategy in STRATEGY_CHAIN {
            match self.apply(strategy).await {
                Ok(Some(result)) if !result.code.is_empty() => {
                    debug!("代码提取成功 (策略: {:?})", strategy);
                    return Some(result);
                }
                Ok(_) => debug!("策略 {:?} 未取到代码，尝试下一个", strategy),
                Err(e) => warn!("策略 {:?} 执行失败: {}", strategy, e),
            }
        }
        None
    }

    async fn apply(&self, strategy: CodeStrategy) -> anyhow::Result<Option<ExtractedCode>> {
        match strategy {
            CodeStrategy::MonacoProbe => self.probe_monaco().await,
            CodeStrategy::RenderedText => self.read_rendered_text().await,
        }
    }

    /// 在页面执行上下文内读 Monaco model（探针超时不会卡死流水线）
    async fn probe_monaco(&self) -> anyhow::Result<Option<ExtractedCode>> {
        let script = r#"
            (() => {
                try {
                    if (window.monaco && window.monaco.editor) {
                        const models = window.monaco.editor.getModels();
                        if (models && models.length > 0) {
                            return {
                                code: models[0].getValue(),
                                language: models[0].getLanguageId()
                            };
                        }
                    }
                } catch (e) {}
                return null;
            })()
        "#;

        let value = self
            .executor
            .eval_with_timeout(script, self.probe_timeout)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// 兜底：读编辑器容器的渲染文本
    async fn read_rendered_text(&self) -> anyhow::Result<Option<ExtractedCode>> {
        let script = r#"
            (() => {
                const el = document.querySelector('.view-lines');
                return el && el.innerText ? el.innerText : null;
            })()
        "#;

        let value = self.executor.eval(script).await?;
        let code: Option<String> = serde_json::from_value(value)?;
        Ok(code.map(|code| ExtractedCode {
            code,
            language: None,
        }))
    }
}
