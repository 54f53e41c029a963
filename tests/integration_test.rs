//! 浏览器联调测试
//!
//! 需要本机以 --remote-debugging-port 启动浏览器并打开 LeetCode 题目页，
//! 默认忽略，手动运行：cargo test -- --ignored

use leetcode_to_github::browser::connect_to_leetcode_page;
use leetcode_to_github::services::CodeExtractor;
use leetcode_to_github::{logger, Config, JsExecutor};
use std::time::Duration;

#[tokio::test]
#[ignore]
async fn test_browser_connection() {
    logger::init();
    let config = Config::load().expect("加载配置失败");

    let result = connect_to_leetcode_page(config.browser_debug_port, "leetcode.com").await;
    assert!(result.is_ok(), "应该能够连接浏览器并找到 LeetCode 标签页");
}

#[tokio::test]
#[ignore]
async fn test_code_extraction_from_live_page() {
    logger::init();
    let config = Config::load().expect("加载配置失败");

    let (_browser, page) = connect_to_leetcode_page(config.browser_debug_port, "leetcode.com")
        .await
        .expect("连接浏览器失败");

    let executor = JsExecutor::new(page);
    let extractor = CodeExtractor::new(&executor, Duration::from_millis(config.probe_timeout_ms));

    let extracted = extractor.extract().await.expect("应该能提取到编辑器代码");
    println!("提取到 {} 字节代码，语言: {:?}", extracted.code.len(), extracted.language);
    assert!(!extracted.code.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_full_push_pipeline() {
    // 端到端：需要 config.toml 里配好 github_token / repo_path，
    // 且浏览器停留在一个已 Accepted 的提交页面上
    logger::init();
    let config = Config::load().expect("加载配置失败");
    config.validate_for_push().expect("GitHub 配置不完整");

    let app = leetcode_to_github::App::initialize(config)
        .await
        .expect("初始化失败");

    // 跑一小段观察循环后人工检查仓库与 activity_log.json
    tokio::select! {
        result = app.run() => { result.expect("主循环异常退出"); }
        _ = tokio::time::sleep(Duration::from_secs(30)) => {}
    }
}
