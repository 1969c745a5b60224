mod cli;
mod command;
mod error;

use clap::CommandFactory;
use clap::Parser;

#[tokio::main]
async fn main() -> error::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let command_line = cli::Cli::parse();
    let cfg = index_core::IndexerConfig::load_or_default(&command_line.config);
    tracing::debug!("配置文件: {}", command_line.config.display());

    if let Some(command) = command_line.command {
        let cmd: Box<dyn command::Command> = match command {
            cli::Commands::Run { anchor, input } => {
                Box::new(command::RunCommand::new(cfg, anchor, input))
            }
            cli::Commands::Backfill { input } => Box::new(command::BackfillCommand::new(cfg, input)),
            cli::Commands::Windows { backfill, anchor } => {
                Box::new(command::WindowsCommand::new(cfg, backfill, anchor))
            }
        };
        cmd.execute().await?;
    } else {
        cli::Cli::command().print_help()?;
    }

    Ok(())
}
