//! gbmc - GhostBSD installation media creator.
//!
//! Erases a removable device, fetches the selected desktop image, and
//! writes it to the device byte for byte. Destructive by design: check
//! `gbmc devices` output twice before `gbmc install`.
#![allow(dead_code)]

mod commands;
mod config;
mod device;
mod download;
mod error;
mod logging;
mod pipeline;
mod preflight;
mod process;
mod variant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::Config;
use variant::DesktopVariant;

#[derive(Parser)]
#[command(name = "gbmc")]
#[command(about = "GhostBSD installation media creator")]
#[command(
    after_help = "QUICK START:\n  gbmc preflight                              Check tools and privileges\n  gbmc devices                                List candidate target devices\n  gbmc install --desktop mate --device da0    Write the MATE image to da0"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List candidate target devices
    Devices {
        /// Emit the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Erase a device, download the selected image, and write it
    Install {
        /// Desktop flavor to install
        #[arg(long, value_enum)]
        desktop: DesktopVariant,

        /// Target device identifier (as printed by `gbmc devices`)
        #[arg(long)]
        device: String,

        /// Skip the interactive confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check required tools and privileges
    Preflight {
        /// Exit non-zero if any check fails
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();
    let config = Config::load();

    let _log_guard = logging::init(&config.log_file);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gbmc started");

    match cli.command {
        Commands::Devices { json } => commands::cmd_devices(json),
        Commands::Install {
            desktop,
            device,
            yes,
        } => commands::cmd_install(&config, desktop, &device, yes),
        Commands::Preflight { strict } => commands::cmd_preflight(strict),
    }
}
