use crate::cli::{Cli, Command, GetCommand, ImagesCommand, SetCommand, TagsCommand};
use crate::config::Config;
use crate::docker_hub::DockerHub;
use clap::Parser;
use std::io::{self, Write};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod docker_hub;
mod duration;
mod error;
mod image_reference;
mod secret_string;
mod tags;
mod units;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("Starting sonar {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so command output stays pipeable. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    debug!("Using config {:?}", config);
    let hub = DockerHub::new(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Tags(TagsCommand::List {
            image,
            sum_size,
            filter,
        }) => commands::list_tags(&hub, &image, &filter, sum_size, &mut out).await?,
        Command::Tags(TagsCommand::Check { image }) => {
            commands::check_tag(&hub, &image, &mut out).await?
        }
        Command::Get(GetCommand::Pulls { image }) => commands::pulls(&hub, &image, &mut out).await?,
        Command::Get(GetCommand::Stars { image }) => commands::stars(&hub, &image, &mut out).await?,
        Command::Get(GetCommand::Summary { image }) => {
            commands::get_summary(&hub, &image, &mut out).await?
        }
        Command::Set(SetCommand::Summary { image, summary }) => {
            commands::set_summary(&hub, &image, &summary, &mut out).await?
        }
        Command::Images(ImagesCommand::List { namespace }) => {
            commands::list_images(&hub, &namespace, &mut out).await?
        }
    }

    out.flush()?;
    Ok(())
}
