use anyhow::Result;
use answers::app::AppMode;
use answers::common::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    run_cli("answers-api", "Answer 服务 - REST API", AppMode::Api).await
}
