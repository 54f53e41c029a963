use anyhow::Result;
use leetcode_to_github::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    leetcode_to_github::logger::init();

    // 加载配置（config.toml + 环境变量覆盖）
    let config = Config::load()?;

    // 初始化并运行应用
    App::initialize(config).await?.run().await
}
