//! 提交数据模型
//!
//! `Submission` 是每次 Accepted 结果临时构造的数据，本身不落盘，
//! 只有它产生的活动日志条目会被持久化。

use serde::{Deserialize, Serialize};

/// 一次已通过的提交
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// 题目标题（取自页面导航路径对应的链接文本）
    pub title: String,
    /// 提交的源代码
    pub code: String,
    /// 语言标签（如 "python3" / "javascript"）
    pub language: String,
    /// 运行耗时（如 "48 ms"），可能缺失
    pub time: Option<String>,
    /// 峰值内存（如 "90.90 MB"），可能缺失
    pub memory: Option<String>,
}

/// 推送请求的线上载荷
///
/// 字段命名与消息协议保持一致：
/// `{action: "pushToGithub", payload: {title, body, lang, time, memory}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub lang: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub memory: String,
}

impl From<&Submission> for PushPayload {
    fn from(s: &Submission) -> Self {
        Self {
            title: s.title.clone(),
            body: s.code.clone(),
            lang: s.language.clone(),
            time: s.time.clone().unwrap_or_default(),
            memory: s.memory.clone().unwrap_or_default(),
        }
    }
}

impl From<PushPayload> for Submission {
    fn from(p: PushPayload) -> Self {
        Self {
            title: p.title,
            code: p.body,
            language: p.lang,
            time: (!p.time.is_empty()).then_some(p.time),
            memory: (!p.memory.is_empty()).then_some(p.memory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_round_trip() {
        let submission = Submission {
            title: "Two Sum".to_string(),
            code: "var x=1;".to_string(),
            language: "javascript".to_string(),
            time: Some("48 ms".to_string()),
            memory: None,
        };

        let payload = PushPayload::from(&submission);
        assert_eq!(payload.body, "var x=1;");
        assert_eq!(payload.time, "48 ms");
        assert_eq!(payload.memory, "");

        let back = Submission::from(payload);
        assert_eq!(back, submission);
    }
}
