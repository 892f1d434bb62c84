use clap::Parser;

use launchlist::cli::{Cli, Command};
use launchlist::config::{StaticConfig, get_config, init_config};
use launchlist::runtime::server::run_server;
use launchlist::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // ConfigGen 不需要初始化配置和日志
    if let Some(Command::ConfigGen) = cli.command {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    init_config();
    let config = get_config();

    // guard 必须存活到进程结束，否则异步日志会丢
    let _guard = init_logging(&config);

    match cli.command {
        None | Some(Command::Serve) => run_server().await?,
        Some(Command::Seed { file, truncate }) => {
            launchlist::cli::seed::run_seed(&file, truncate).await?
        }
        Some(Command::ConfigGen) => unreachable!("handled above"),
    }

    Ok(())
}
