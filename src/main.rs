mod cli;
mod commands;
mod mcp;
mod page_order;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Pages {
            path,
            pages,
            toggles,
        } => {
            commands::pages::run(&path, &pages, &toggles)?;
        }
        Commands::Extract {
            path,
            pages,
            output,
        } => {
            commands::extract::run(&path, &pages, &output)?;
        }
        Commands::Remove {
            path,
            pages,
            output,
        } => {
            commands::remove::run(&path, &pages, &output)?;
        }
        Commands::Split {
            path,
            output_dir,
            pages,
        } => {
            commands::split::run(&path, &output_dir, pages.as_deref())?;
        }
        Commands::Reorder {
            path,
            order,
            moves,
            reverse,
            output,
        } => {
            commands::reorder::run(&path, order.as_deref(), &moves, reverse, &output)?;
        }
        Commands::Rotate {
            path,
            pages,
            by,
            output,
        } => {
            commands::rotate::run(&path, &pages, by, &output)?;
        }
        Commands::Merge { inputs, output } => {
            commands::merge::run(&inputs, &output)?;
        }
    }

    Ok(())
}
