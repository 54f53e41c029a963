use anyhow::{bail, Result};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接到浏览器并定位 LeetCode 页面
///
/// 附着到用户已打开的浏览器（需要 --remote-debugging-port 启动），
/// 在现有标签页中查找 URL 匹配的页面。不新建页面：
/// 推送依赖用户自己的登录态与答题现场。
///
/// # 参数
/// - `port`: 浏览器调试端口
/// - `url_marker`: 目标页面 URL 需要包含的子串
pub async fn connect_to_leetcode_page(port: u16, url_marker: &str) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    for page in pages.iter() {
        if let Ok(Some(url)) = page.url().await {
            debug!("检查页面: {}", url);
            if url.contains(url_marker) {
                info!("✓ 找到目标页面: {}", url);
                return Ok((browser, page.clone()));
            }
        }
    }

    bail!(
        "没有找到 URL 包含 \"{}\" 的标签页，请先在浏览器中打开题目页面",
        url_marker
    );
}
