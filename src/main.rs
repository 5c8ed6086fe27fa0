use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use crust::app::App;
use crust::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    match cli.command {
        Some(cmd) => {
            let mut app = App::new(cli.quiet)?;
            if let Err(e) = app.run_command(cmd).await {
                eprintln!("{} {:#}", "❌".red(), e);
                std::process::exit(1);
            }
        }
        None => {
            // Default to showing help when no command is specified
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
