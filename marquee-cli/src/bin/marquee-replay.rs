//! `marquee-replay`: run interaction scripts on a virtual clock.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use marquee_cli::{ReplayOptions, Script, replay};
use marquee_config::{
    InteractionConfig, InteractionConfigSource, validation::apply_guard_rails,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "marquee-replay",
    about = "Replay scripted site interactions on a virtual clock"
)]
struct Cli {
    /// Interaction config (TOML or JSON). Defaults to $MARQUEE_CONFIG_PATH,
    /// $MARQUEE_CONFIG_JSON, ./marquee.toml, then built-in values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an event script and print one JSON line per state change
    Run {
        script: PathBuf,
        /// Keep running until this much virtual time has passed, e.g. `12s`
        #[arg(long, value_parser = humantime::parse_duration)]
        until: Option<Duration>,
    },
    /// Print the resolved configuration and any guard-rail warnings
    Config,
}

fn load_config(
    explicit: Option<PathBuf>,
) -> Result<(InteractionConfig, InteractionConfigSource)> {
    match explicit {
        Some(path) => {
            let config = InteractionConfig::load_from_file(&path)?;
            Ok((config, InteractionConfigSource::Explicit(path)))
        }
        None => InteractionConfig::load_from_env(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let (config, source) = load_config(cli.config)?;
    tracing::info!(%source, "interaction config loaded");

    match cli.command {
        Command::Run { script, until } => {
            let script = Script::load(&script)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let lines =
                replay(&script, &config, &ReplayOptions { until }, &mut out)?;
            out.flush()?;
            tracing::info!(lines, "replay finished");
        }
        Command::Config => {
            let warnings = apply_guard_rails(&config)?;
            print!("{}", toml::to_string_pretty(&config)?);
            for warning in warnings.items {
                match warning.hint {
                    Some(hint) => eprintln!("warning: {} ({hint})", warning.message),
                    None => eprintln!("warning: {}", warning.message),
                }
            }
        }
    }

    Ok(())
}
