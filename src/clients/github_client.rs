//! GitHub 内容 API 客户端
//!
//! 封装"先查后写"的上传流程：
//! 1. GET contents 查询目标路径是否已存在，存在则记下 sha
//! 2. PUT contents 创建或更新文件（带 sha 为更新，不带为创建）
//!
//! 查询返回 200/404 以外的状态一律视为硬失败，
//! 避免瞬时错误被当作"文件不存在"而误覆盖。

use crate::clients::solution_path;
use crate::config::Config;
use crate::error::{PushError, Result};
use crate::models::Submission;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// GitHub API 客户端
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
    repo: String,
    solution_dir: String,
}

/// 一次成功推送的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// 仓库内文件路径
    pub path: String,
    /// true 表示更新了已有文件，false 表示新建
    pub updated: bool,
}

/// PUT contents 请求体，创建时 sha 字段整体省略
#[derive(Serialize)]
struct PutContentsBody {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

impl GithubClient {
    /// 创建客户端（不校验配置，校验由调用方完成）
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.github_api_base.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
            repo: config.repo_path.clone(),
            solution_dir: config.solution_dir.clone(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/repos/{}/contents/{}", self.api_base, self.repo, path)
    }

    /// 查询目标路径当前版本的 sha
    ///
    /// # 返回
    /// - `Some(sha)`: 文件已存在
    /// - `None`: 文件不存在（404）
    /// - 其他状态码视为硬失败
    pub async fn lookup_file_sha(&self, path: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.contents_url(path))
            .bearer_auth(&self.token)
            .header("User-Agent", "leetcode-to-github")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: Value = response.json().await?;
                let sha = body
                    .get("sha")
                    .and_then(|v| v.as_str())
                    .map(String::from);
                debug!("文件已存在: {} (sha: {:?})", path, sha);
                Ok(sha)
            }
            StatusCode::NOT_FOUND => {
                debug!("文件不存在，将走创建路径: {}", path);
                Ok(None)
            }
            status => Err(PushError::RemoteRejected {
                status: status.as_u16(),
                message: extract_remote_message(response).await,
            }),
        }
    }

    /// 推送一份题解：推导路径 → 查询 sha → 创建或更新
    pub async fn push_solution(&self, submission: &Submission) -> Result<PushOutcome> {
        let path = solution_path::build_path(
            &self.solution_dir,
            &submission.title,
            &submission.language,
        );

        info!("📤 正在推送: {} → {}/{}", submission.title, self.repo, path);

        let sha = self.lookup_file_sha(&path).await?;
        let updated = sha.is_some();

        let body = PutContentsBody {
            message: solution_path::build_commit_message(submission),
            content: BASE64.encode(&submission.code),
            sha,
        };

        let response = self
            .http
            .put(self.contents_url(&path))
            .bearer_auth(&self.token)
            .header("User-Agent", "leetcode-to-github")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("✓ 推送成功: {} ({})", path, if updated { "更新" } else { "新建" });
            Ok(PushOutcome { path, updated })
        } else {
            Err(PushError::RemoteRejected {
                status: status.as_u16(),
                message: extract_remote_message(response).await,
            })
        }
    }
}

/// 从失败响应中提取远端的 message 字段，缺失时给通用描述
async fn extract_remote_message(response: reqwest::Response) -> String {
    match response.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => "Unknown error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_body_omits_sha_on_create() {
        let body = PutContentsBody {
            message: "Add solution for Two Sum".to_string(),
            content: BASE64.encode("var x=1;"),
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none(), "创建时不应携带 sha 字段");
    }

    #[test]
    fn test_put_body_carries_sha_on_update() {
        let body = PutContentsBody {
            message: "Add solution for Two Sum".to_string(),
            content: BASE64.encode("var x=1;"),
            sha: Some("abc123".to_string()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["sha"], "abc123");
    }

    #[test]
    fn test_content_is_base64() {
        assert_eq!(BASE64.encode("var x=1;"), "dmFyIHg9MTs=");
    }
}
