//! 语言解析服务 - 业务能力层
//!
//! 解析顺序：
//! 1. 编辑器报告的 Monaco 语言 ID（查固定映射表）
//! 2. 页面 localStorage 里的语言偏好
//! 3. 语言选择器按钮的可见文本（子串匹配，大小写不敏感）
//! 4. 兜底默认 python3

use crate::infrastructure::JsExecutor;
use phf::phf_map;
use tracing::debug;

/// 兜底语言
pub const DEFAULT_LANGUAGE: &str = "python3";

/// Monaco 语言 ID → 本系统语言标签
static MONACO_LANG_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "python" => "python3",
    "java" => "java",
    "javascript" => "javascript",
    "typescript" => "typescript",
    "cpp" => "cpp",
    "csharp" => "csharp",
    "go" => "golang",
    "rust" => "rust",
    "c" => "c",
};

/// 语言选择器文本的子串匹配表，按序检查
/// （"javascript" 必须排在 "java" 之前）
const SELECTOR_SUBSTRINGS: [(&str, &str); 8] = [
    ("python", "python3"),
    ("javascript", "javascript"),
    ("typescript", "typescript"),
    ("java", "java"),
    ("c++", "cpp"),
    ("c#", "csharp"),
    ("go", "golang"),
    ("rust", "rust"),
];

/// 兜底策略，按声明顺序尝试
#[derive(Debug, Clone, Copy)]
enum FallbackStrategy {
    /// localStorage 持久化的偏好
    StoredPreference,
    /// 语言选择器按钮文本
    SelectorText,
}

const FALLBACK_CHAIN: [FallbackStrategy; 2] = [
    FallbackStrategy::StoredPreference,
    FallbackStrategy::SelectorText,
];

/// 语言解析服务
pub struct LanguageResolver<'a> {
    executor: &'a JsExecutor,
}

impl<'a> LanguageResolver<'a> {
    pub fn new(executor: &'a JsExecutor) -> Self {
        Self { executor }
    }

    /// 解析语言标签
    ///
    /// # 参数
    /// - `editor_language`: 编辑器报告的 Monaco 语言 ID（若有）
    pub async fn resolve(&self, editor_language: Option<&str>) -> String {
        if let Some(id) = editor_language {
            let tag = map_monaco_language(id);
            debug!("使用编辑器报告的语言: {} → {}", id, tag);
            return tag;
        }

        for strategy in FALLBACK_CHAIN {
            if let Some(tag) = self.apply(strategy).await {
                debug!("语言兜底命中 (策略: {:?}): {}", strategy, tag);
                return tag;
            }
        }

        debug!("语言解析全部失败，使用默认值 {}", DEFAULT_LANGUAGE);
        DEFAULT_LANGUAGE.to_string()
    }

    async fn apply(&self, strategy: FallbackStrategy) -> Option<String> {
        match strategy {
            FallbackStrategy::StoredPreference => self.from_local_storage().await,
            FallbackStrategy::SelectorText => self.from_selector_text().await,
        }
    }

    async fn from_local_storage(&self) -> Option<String> {
        let script = r#"
            (() => {
                try {
                    return localStorage.getItem('global_lang');
                } catch (e) {
                    return null;
                }
            })()
        "#;
        let value = self.executor.eval(script).await.ok()?;
        serde_json::from_value::<Option<String>>(value)
            .ok()
            .flatten()
            .filter(|s| !s.is_empty())
    }

    async fn from_selector_text(&self) -> Option<String> {
        let script = r#"
            (() => {
                const btn = document.querySelector('button[id*="headlessui-listbox-button"]');
                return btn && btn.innerText ? btn.innerText : null;
            })()
        "#;
        let value = self.executor.eval(script).await.ok()?;
        let text = serde_json::from_value::<Option<String>>(value)
            .ok()
            .flatten()?;
        match_selector_text(&text).map(String::from)
    }
}

/// Monaco 语言 ID 映射；表里没有的 ID 原样返回
pub fn map_monaco_language(id: &str) -> String {
    MONACO_LANG_MAP
        .get(id)
        .map(|tag| tag.to_string())
        .unwrap_or_else(|| id.to_string())
}

/// 语言选择器文本匹配（大小写不敏感）
pub fn match_selector_text(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    SELECTOR_SUBSTRINGS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, tag)| *tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monaco_map_known_ids() {
        assert_eq!(map_monaco_language("python"), "python3");
        assert_eq!(map_monaco_language("go"), "golang");
        assert_eq!(map_monaco_language("cpp"), "cpp");
    }

    #[test]
    fn test_monaco_map_unknown_passthrough() {
        assert_eq!(map_monaco_language("kotlin"), "kotlin");
    }

    #[test]
    fn test_selector_text_matching() {
        assert_eq!(match_selector_text("Python3"), Some("python3"));
        assert_eq!(match_selector_text("C++"), Some("cpp"));
        assert_eq!(match_selector_text("C#"), Some("csharp"));
        assert_eq!(match_selector_text("JavaScript"), Some("javascript"));
        assert_eq!(match_selector_text("Go"), Some("golang"));
        assert_eq!(match_selector_text("Brainfuck"), None);
    }

    #[test]
    fn test_selector_prefers_javascript_over_java() {
        // "javascript" 的检查排在 "java" 之前
        assert_eq!(match_selector_text("JavaScript"), Some("javascript"));
        assert_eq!(match_selector_text("Java"), Some("java"));
    }
}
