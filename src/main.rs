use anyhow::Result;
use mock_interview::utils::logging;
use mock_interview::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging, &config.output_log_file)?;

    // 初始化并运行应用
    let _outcome = App::initialize(config).await?.run().await?;

    Ok(())
}
