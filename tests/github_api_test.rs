//! GitHub 上传链路集成测试（wiremock 模拟远端 API）

use leetcode_to_github::bridge::Response;
use leetcode_to_github::services::{ActivityKind, ActivityRecorder};
use leetcode_to_github::{worker, Config, GithubClient, PushError, PushPayload, Submission};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(api_base: &str) -> Config {
    Config {
        github_token: "ghp_test_token".to_string(),
        repo_path: "user/leetcode".to_string(),
        github_api_base: api_base.to_string(),
        ..Default::default()
    }
}

fn two_sum_submission() -> Submission {
    Submission {
        title: "Two Sum!".to_string(),
        code: "var x=1;".to_string(),
        language: "javascript".to_string(),
        time: Some("48 ms".to_string()),
        memory: Some("90.90 MB".to_string()),
    }
}

/// 从 mock 服务器收到的请求里找出唯一的 PUT 请求体
async fn received_put_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("应该收到一个 PUT 请求");
    serde_json::from_slice(&put.body).unwrap()
}

#[tokio::test]
async fn test_create_path_omits_sha() {
    let server = MockServer::start().await;
    let contents_path = "/repos/user/leetcode/contents/solution/Two_Sum.js";

    Mock::given(method("GET"))
        .and(path(contents_path))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(contents_path))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"content": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = GithubClient::new(&test_config(&server.uri()));
    let outcome = client.push_solution(&two_sum_submission()).await.unwrap();

    assert_eq!(outcome.path, "solution/Two_Sum.js");
    assert!(!outcome.updated);

    let body = received_put_body(&server).await;
    // 创建路径：不携带 sha 字段
    assert!(body.get("sha").is_none());
    // 内容是 base64("var x=1;")
    assert_eq!(body["content"], "dmFyIHg9MTs=");
    // 提交信息包含标题与统计
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Two Sum"));
    assert!(message.contains("48 ms"));
    assert!(message.contains("90.90 MB"));
}

#[tokio::test]
async fn test_update_path_carries_exact_sha() {
    let server = MockServer::start().await;
    let contents_path = "/repos/user/leetcode/contents/solution/Two_Sum.js";

    Mock::given(method("GET"))
        .and(path(contents_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "abc123"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(contents_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": {}})))
        .mount(&server)
        .await;

    let client = GithubClient::new(&test_config(&server.uri()));
    let outcome = client.push_solution(&two_sum_submission()).await.unwrap();
    assert!(outcome.updated);

    let body = received_put_body(&server).await;
    assert_eq!(body["sha"], "abc123");
}

#[tokio::test]
async fn test_lookup_error_is_hard_failure() {
    // 200/404 以外的查询状态不能当成"文件不存在"
    let server = MockServer::start().await;
    let contents_path = "/repos/user/leetcode/contents/solution/Two_Sum.js";

    Mock::given(method("GET"))
        .and(path(contents_path))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .mount(&server)
        .await;
    // 查询失败后绝不应该尝试写入
    Mock::given(method("PUT"))
        .and(path(contents_path))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = GithubClient::new(&test_config(&server.uri()));
    let err = client.push_solution(&two_sum_submission()).await.unwrap_err();

    match err {
        PushError::RemoteRejected { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("rate limit"));
        }
        other => panic!("期望 RemoteRejected，实际: {:?}", other),
    }
}

#[tokio::test]
async fn test_worker_write_failure_records_one_error_entry() {
    let server = MockServer::start().await;
    let contents_path = "/repos/user/leetcode/contents/solution/Two_Sum.js";

    Mock::given(method("GET"))
        .and(path(contents_path))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(contents_path))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Validation Failed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(ActivityRecorder::new(dir.path().join("activity_log.json")));
    let handle = worker::spawn(test_config(&server.uri()), recorder.clone());

    let response = handle
        .push(PushPayload::from(&two_sum_submission()))
        .await
        .expect("应收到响应");

    match response {
        Response::Push { success, error } => {
            assert!(!success);
            assert!(error.unwrap().contains("Validation Failed"));
        }
        other => panic!("期望推送响应，实际: {:?}", other),
    }

    // 恰好一条 error 级活动记录，消息包含远端的 message
    let entries = recorder.read_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ActivityKind::Error);
    assert!(entries[0].message.contains("Validation Failed"));
}

#[tokio::test]
async fn test_worker_success_records_success_entry() {
    let server = MockServer::start().await;
    let contents_path = "/repos/user/leetcode/contents/solution/Two_Sum.js";

    Mock::given(method("GET"))
        .and(path(contents_path))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(contents_path))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"content": {}})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(ActivityRecorder::new(dir.path().join("activity_log.json")));
    let handle = worker::spawn(test_config(&server.uri()), recorder.clone());

    let response = handle
        .push(PushPayload::from(&two_sum_submission()))
        .await
        .unwrap();
    assert_eq!(response, Response::ok());

    let entries = recorder.read_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ActivityKind::Success);
    assert!(entries[0].message.contains("Two Sum!"));
    assert!(entries[0].message.contains("javascript"));
}

#[tokio::test]
async fn test_worker_disabled_short_circuits() {
    // 功能关闭：不发任何网络请求，只留一条 warning 日志
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        enabled: false,
        ..test_config(&server.uri())
    };
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(ActivityRecorder::new(dir.path().join("activity_log.json")));
    let handle = worker::spawn(config, recorder.clone());

    let response = handle
        .push(PushPayload::from(&two_sum_submission()))
        .await
        .unwrap();
    assert!(matches!(response, Response::Push { success: false, .. }));

    let entries = recorder.read_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ActivityKind::Warning);
    assert!(entries[0].message.contains("disabled"));
}

#[tokio::test]
async fn test_worker_missing_config_aborts_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        github_token: String::new(),
        ..test_config(&server.uri())
    };
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(ActivityRecorder::new(dir.path().join("activity_log.json")));
    let handle = worker::spawn(config, recorder.clone());

    let response = handle
        .push(PushPayload::from(&two_sum_submission()))
        .await
        .unwrap();
    assert!(matches!(response, Response::Push { success: false, .. }));

    let entries = recorder.read_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ActivityKind::Error);
}

#[tokio::test]
async fn test_worker_ping_responds_alive() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(ActivityRecorder::new(dir.path().join("activity_log.json")));
    let handle = worker::spawn(test_config("http://localhost:1"), recorder);

    assert!(handle.ping().await);
}
