// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier - a Telegram to RabbitMQ RPC adapter.
//!
//! This is the binary entry point for the Courier adapter.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

use courier_config::CourierConfig;

mod serve;

/// Courier - a Telegram to RabbitMQ RPC adapter.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the adapter: connect to the broker and start Telegram polling.
    Serve,
    /// Print the resolved configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match courier_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            courier_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                tracing::error!(error = %e, "courier serve failed");
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => print_config(config),
        None => println!("courier: use --help for available commands"),
    }
}

/// Prints the resolved configuration as TOML, with secrets redacted.
fn print_config(mut config: CourierConfig) {
    if config.telegram.bot_token.is_some() {
        config.telegram.bot_token = Some("<redacted>".to_string());
    }
    if config.broker.password.is_some() {
        config.broker.password = Some("<redacted>".to_string());
    }

    match toml::to_string_pretty(&config) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => eprintln!("error: failed to render config: {e}"),
    }
}
