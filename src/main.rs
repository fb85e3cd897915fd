use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod build;
mod commands;
mod config;
mod util;

#[derive(Parser)]
#[command(name = "sitepages", version, about)]
struct Args {
    /// Log build progress (otherwise `RUST_LOG` decides)
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// The command to execute
    #[command(subcommand)]
    command: SitepagesCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the project in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
    config_file: Option<PathBuf>,

    /// Build as of this RFC 3339 time instead of now
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Parser)]
struct SlugArgs {
    /// Path of the file relative to its collection root
    path: String,

    /// The collection the file belongs to
    #[arg(long, default_value = build::paths::DOCS_COLLECTION)]
    collection: String,

    /// A recognized locale code (repeatable)
    #[arg(short, long = "locale")]
    locales: Vec<String>,

    /// The default locale
    #[arg(long, default_value = "en")]
    default_locale: String,
}

#[derive(Subcommand)]
enum SitepagesCommand {
    /// Initialize a new sitepages project
    Init(InitArgs),

    /// Build the page manifest
    Build(BuildArgs),

    /// Show the slug and fields derived for a content path
    Slug(SlugArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match args.command {
        SitepagesCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        SitepagesCommand::Build(args) => {
            commands::build::run(&args).await?;
        }
        SitepagesCommand::Slug(args) => {
            commands::slug::run(&args)?;
        }
    }

    Ok(())
}
