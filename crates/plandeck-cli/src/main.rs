//! Plandeck CLI Application
//!
//! Command-line interface for editing markdown plan files.

mod args;
mod cli;
mod handler;
mod renderer;

use std::process::ExitCode;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use handler::CommandHandler;
use log::{error, info};
use plandeck_core::{display::OperationStatus, PlanError, PlanRepositoryBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let renderer = TerminalRenderer::new(!args.no_color);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            let status = match e.downcast_ref::<PlanError>() {
                Some(plan_error) => OperationStatus::from_error(plan_error),
                None => OperationStatus::failure(format!("{e:#}")),
            };
            renderer.render_status(&status);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let Args {
        plans_dir,
        extra_dirs,
        archive_dir,
        retention_days,
        no_color,
        command,
    } = args;

    let mut builder = PlanRepositoryBuilder::new();
    if let Some(dir) = plans_dir {
        builder = builder.with_plans_dir(dir);
    }
    for dir in extra_dirs {
        builder = builder.with_extra_dir(dir);
    }
    if let Some(dir) = archive_dir {
        builder = builder.with_archive_dir(dir);
    }
    if let Some(days) = retention_days {
        builder = builder.with_archive_retention_days(days);
    }
    let repo = builder
        .build()
        .await
        .context("Failed to initialize plan repository")?;

    info!("Plandeck started in {}", repo.store().plans_dir().display());
    let handler = CommandHandler::new(repo, TerminalRenderer::new(!no_color));

    match command {
        Some(Plan { command }) => handler.handle_plan_command(command).await,
        Some(Subtask { command }) => handler.handle_subtask_command(command).await,
        Some(History { command }) => handler.handle_history_command(command).await,
        Some(Archive { command }) => handler.handle_archive_command(command).await,
        Some(Deps(args)) => handler.deps(args).await,
        Some(Bulk(args)) => handler.bulk(args).await,
        Some(Audit(args)) => handler.audit(args).await,
        Some(Migrate) => handler.migrate().await,
        None => handler.list_plans().await,
    }
}
