use anyhow::Result;
use answers::app::AppMode;
use answers::common::{common_args, start_application, StartupConfig};
use clap::{Arg, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("answers")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Answer 键值存储与事件传播服务")
        .args(common_args())
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("运行模式")
                .value_parser(["api", "worker", "all"])
                .default_value("all"),
        )
        .get_matches();

    let app_mode: AppMode = matches
        .get_one::<String>("mode")
        .map(String::as_str)
        .unwrap_or("all")
        .parse()?;

    start_application(StartupConfig::from_matches(&matches), app_mode, "answers").await
}
