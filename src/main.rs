// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Nosh session CLI.
//!
//! A small harness over the client layer: sign in against the backend,
//! inspect the restored session, force a refresh, or sign out. Session
//! state persists across invocations through the file-backed token store.

use clap::{Parser, Subcommand};
use colored::Colorize;

use nosh::config::load_config;
use nosh::context::AppContext;
use nosh::error::Result;
use nosh::telemetry::{init_telemetry, TelemetryConfig};

#[derive(Parser)]
#[command(name = "nosh", version, about = "Nosh session and API client")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in as a user id and persist the session
    SignIn {
        /// Backend user id
        user_id: String,
    },
    /// Show the current session
    Status,
    /// Re-fetch the signed-in user's data
    Refresh,
    /// Sign out and clear persisted credentials
    SignOut,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::development()
    } else {
        TelemetryConfig::default()
    };
    let _guard = init_telemetry(&telemetry)?;

    let ctx = AppContext::new(load_config()?)?;
    ctx.session.restore_session().await?;

    match cli.command {
        Command::SignIn { user_id } => {
            ctx.session.sign_in(&user_id).await?;
            let name = ctx.session.user_first_name().await.unwrap_or_default();
            println!("{} signed in as {}", "ok:".green().bold(), name.bold());
        }
        Command::Status => {
            print_status(&ctx).await;
        }
        Command::Refresh => {
            ctx.session.refresh_user_data().await?;
            print_status(&ctx).await;
        }
        Command::SignOut => {
            ctx.session.sign_out().await;
            println!("{} signed out", "ok:".green().bold());
        }
    }

    Ok(())
}

async fn print_status(ctx: &AppContext) {
    match ctx.session.current_user().await {
        Some(user) => {
            println!(
                "{} {} {} <{}>",
                "signed in:".green().bold(),
                user.first_name,
                user.last_name,
                user.email
            );
            println!("  phone:     {}", user.phone);
            println!("  addresses: {}", user.delivery_addresses.len());
            println!("  orders:    {}", user.order_history.len());
            if let Some(last_refresh) = ctx.session.last_refresh().await {
                println!("  refreshed: {}", last_refresh.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        None => {
            println!("{}", "signed out".yellow());
        }
    }
}
