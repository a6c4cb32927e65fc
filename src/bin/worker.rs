use anyhow::Result;
use answers::app::AppMode;
use answers::common::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    run_cli(
        "answers-worker",
        "Answer 服务 - 事件Worker，消费 Answer 事件并写入事件历史",
        AppMode::Worker,
    )
    .await
}
