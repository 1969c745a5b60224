use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 配置文件路径
    #[arg(short, long, default_value = "./config.toml")]
    pub config: PathBuf,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 单窗口增量摄取
    Run {
        /// 窗口锚点时间（Unix 秒）
        anchor: i64,
        /// 数据文件，每行一个 JSON 记录数组
        input: PathBuf,
    },
    /// 从纪元起按步长重建全部分片
    Backfill {
        /// 数据文件，每行一个 JSON 记录数组
        input: PathBuf,
    },
    /// 仅打印将要生成的分片窗口，不做摄取
    Windows {
        /// 按回填模式生成
        #[arg(long)]
        backfill: bool,
        /// 单窗口模式的锚点时间（Unix 秒），缺省为当前时间
        #[arg(long)]
        anchor: Option<i64>,
    },
}
