mod config;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crate::config::{OutputFormat, Settings};
use rolemap_core::{AttributeStore, Resolution, Role, RoleAggregator};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "rolemap")]
#[command(about = "Derive host roles from a cluster environment description")]
struct Cli {
    /// Path to the rolemap settings file
    #[arg(short, long, default_value = "rolemap.yaml")]
    settings: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every role and print the role map
    Resolve {
        /// Path to the environment document
        #[arg(short, long)]
        environment: Option<String>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print the hosts of one role, one per line
    Hosts {
        /// Role tag, e.g. node-controller
        role: Role,

        /// Path to the environment document
        #[arg(short, long)]
        environment: Option<String>,
    },
    /// List the role catalog
    Roles,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rolemap=info,rolemap_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        tracing::error!("{:#}", error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::from_file(&cli.settings)
        .with_context(|| format!("failed to load settings from {}", cli.settings))?;

    match cli.command {
        Commands::Resolve {
            environment,
            format,
        } => {
            let resolution = resolve(&settings, environment)?;
            let format = format.unwrap_or(settings.format);
            println!("{}", output::render_resolution(&resolution, format)?);
        }
        Commands::Hosts { role, environment } => {
            let resolution = resolve(&settings, environment)?;
            let rendered = output::render_hosts(resolution.hosts(role));
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
        }
        Commands::Roles => {
            println!("{}", output::render_catalog());
        }
    }

    Ok(())
}

fn resolve(settings: &Settings, environment: Option<String>) -> anyhow::Result<Resolution> {
    let path = environment.unwrap_or_else(|| settings.environment_file.clone());
    tracing::info!("Resolving roles from environment: {}", path);

    let store = AttributeStore::from_path(&path, &settings.attributes_key)
        .with_context(|| format!("failed to load environment {}", path))?;

    let resolution = RoleAggregator::new()
        .resolve(&store)
        .with_context(|| format!("failed to resolve roles for {}", path))?;

    Ok(resolution)
}
