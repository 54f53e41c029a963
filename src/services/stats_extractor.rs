//! 运行统计提取服务 - 业务能力层
//!
//! 按固定顺序尝试：
//! (a) 统计容器的合并文本，正则匹配 `Runtime <n> ms` / `Memory <n> MB`
//! (b) 带固定属性标记的独立统计元素
//! (c) 启发式扫描：数字文本节点配对相邻的 "ms"/"mb" 上下文
//!
//! 取不到统计不算失败——缺失统计绝不阻塞上传。

use crate::infrastructure::JsExecutor;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// 运行统计（两项同时取到才算命中，与页面展示结构一致）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionStats {
    pub time: String,
    pub memory: String,
}

/// 数字文本节点及其相邻上下文（启发式扫描的原料）
#[derive(Debug, Clone, Deserialize)]
pub struct NumericSpan {
    pub text: String,
    pub context: String,
}

/// 提取策略，按声明顺序尝试
#[derive(Debug, Clone, Copy)]
enum StatsStrategy {
    /// 统计容器合并文本 + 正则
    CombinedText,
    /// data-e2e-locator 标记的元素
    MarkedElements,
    /// 数字节点启发式配对
    SpanScan,
}

const STRATEGY_CHAIN: [StatsStrategy; 3] = [
    StatsStrategy::CombinedText,
    StatsStrategy::MarkedElements,
    StatsStrategy::SpanScan,
];

/// 运行统计提取服务
pub struct StatsExtractor<'a> {
    executor: &'a JsExecutor,
}

impl<'a> StatsExtractor<'a> {
    pub fn new(executor: &'a JsExecutor) -> Self {
        Self { executor }
    }

    /// 依次尝试各策略，全部落空返回 None
    pub async fn extract(&self) -> Option<SubmissionStats> {
        for strategy in STRATEGY_CHAIN {
            match self.apply(strategy).await {
                Ok(Some(stats)) => {
                    debug!("统计提取成功 (策略: {:?}): {:?}", strategy, stats);
                    return Some(stats);
                }
                Ok(None) => debug!("策略 {:?} 未取到统计，尝试下一个", strategy),
                Err(e) => warn!("策略 {:?} 执行失败: {}", strategy, e),
            }
        }
        None
    }

    async fn apply(&self, strategy: StatsStrategy) -> anyhow::Result<Option<SubmissionStats>> {
        match strategy {
            StatsStrategy::CombinedText => self.from_combined_text().await,
            StatsStrategy::MarkedElements => self.from_marked_elements().await,
            StatsStrategy::SpanScan => self.from_span_scan().await,
        }
    }

    async fn from_combined_text(&self) -> anyhow::Result<Option<SubmissionStats>> {
        let script = r#"
            (() => {
                const el = document.querySelector('.flex.w-full.flex-wrap.gap-3');
                return el && el.innerText ? el.innerText : null;
            })()
        "#;
        let value = self.executor.eval(script).await?;
        let text: Option<String> = serde_json::from_value(value)?;
        Ok(text.as_deref().and_then(parse_combined_text))
    }

    async fn from_marked_elements(&self) -> anyhow::Result<Option<SubmissionStats>> {
        let script = r#"
            (() => {
                const timeEl = document.querySelector('[data-e2e-locator="submission-time"]')
                    || document.querySelector('span[title*="ms"]');
                const memEl = document.querySelector('[data-e2e-locator="submission-memory"]')
                    || document.querySelector('span[title*="MB"]');
                if (timeEl && memEl) {
                    return { time: timeEl.innerText, memory: memEl.innerText };
                }
                return null;
            })()
        "#;
        let value = self.executor.eval(script).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// 扫描交给页面（收集数字 span 与相邻文本），配对逻辑留在 Rust 侧
    async fn from_span_scan(&self) -> anyhow::Result<Option<SubmissionStats>> {
        let script = r#"
            (() => {
                const spans = Array.from(document.querySelectorAll('span'));
                const found = [];
                for (const span of spans) {
                    const text = (span.innerText || '').trim();
                    if (/^\d+(\.\d+)?$/.test(text)) {
                        const context = (
                            (span.nextElementSibling && span.nextElementSibling.innerText) ||
                            (span.parentElement && span.parentElement.innerText) ||
                            ''
                        ).toLowerCase();
                        found.push({ text, context });
                    }
                }
                return found;
            })()
        "#;
        let value = self.executor.eval(script).await?;
        let spans: Vec<NumericSpan> = serde_json::from_value(value)?;
        Ok(pair_numeric_spans(&spans))
    }
}

fn runtime_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Runtime\s*\n?\s*(\d+(?:\.\d+)?)\s*\n?\s*ms").expect("内置正则必定合法")
    })
}

fn memory_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Memory\s*\n?\s*(\d+(?:\.\d+)?)\s*\n?\s*MB").expect("内置正则必定合法")
    })
}

/// 从统计容器的合并文本里解析耗时与内存
pub fn parse_combined_text(text: &str) -> Option<SubmissionStats> {
    let time = runtime_regex()
        .captures(text)
        .map(|c| format!("{} ms", &c[1]));
    let memory = memory_regex()
        .captures(text)
        .map(|c| format!("{} MB", &c[1]));

    match (time, memory) {
        (Some(time), Some(memory)) => Some(SubmissionStats { time, memory }),
        _ => None,
    }
}

/// 给数字节点配对相邻的 "ms"/"mb" 上下文，各取第一个命中
pub fn pair_numeric_spans(spans: &[NumericSpan]) -> Option<SubmissionStats> {
    let mut time = None;
    let mut memory = None;

    for span in spans {
        if time.is_none() && span.context.contains("ms") {
            time = Some(format!("{} ms", span.text));
        }
        if memory.is_none() && span.context.contains("mb") {
            memory = Some(format!("{} MB", span.text));
        }
    }

    match (time, memory) {
        (Some(time), Some(memory)) => Some(SubmissionStats { time, memory }),
        _ => None,
    }
}
