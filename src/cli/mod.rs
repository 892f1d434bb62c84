//! 命令行接口
//!
//! `launchlist` 不带参数时直接进入 server 模式；`seed` 子命令从 CSV
//! 导入等待名单（替代原来的一次性导入脚本）。

pub mod seed;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "launchlist", version, about = "Waitlist and referral signup backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 从 CSV 导入等待名单
    Seed {
        /// CSV 文件路径
        #[arg(long)]
        file: PathBuf,
        /// 导入前清空现有等待名单
        #[arg(long, default_value_t = false)]
        truncate: bool,
    },
    /// 输出示例 TOML 配置
    ConfigGen,
}
