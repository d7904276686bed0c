mod api;
mod config;
mod render;
mod server;

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use promptbase_core::Gateway;
use promptbase_logging::{init_tracing, LogFormat};

use config::{FileConfig, Overrides, Settings, CONFIG_FILE_NAME};

#[derive(Parser, Debug)]
#[command(
    name = "promptbase",
    about = "Store, search, favorite and render text prompts",
    version,
    author
)]
struct Cli {
    /// Connection string of the prompt store (e.g. sqlite://prompts.db)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Address to listen on (default: 127.0.0.1)
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Port to listen on (default: 8501)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config file (default: ./promptbase.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format (default: pretty)
    #[arg(long, value_enum)]
    log_format: Option<LogFormatChoice>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Open the page in a browser once the server is up
    #[arg(long)]
    open: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env feeds DATABASE_URL before the CLI reads its environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let file_config = load_file_config(&cli)?;

    let settings = Settings::resolve(
        Overrides {
            database_url: cli.database_url.clone(),
            bind: cli.bind,
            port: cli.port,
            log_level: cli.log_level.clone(),
            log_format: cli.log_format.map(LogFormat::from),
        },
        file_config,
    )?;

    init_tracing(&settings.log_level, settings.log_format);

    let gateway = Gateway::initialize(settings.database_url.as_deref().unwrap_or_default())
        .context("Failed to open prompt store")?;

    server::serve(&settings, gateway, cli.open).await
}

/// An explicit `--config` must exist; the default file is optional.
fn load_file_config(cli: &Cli) -> Result<Option<FileConfig>> {
    match &cli.config {
        Some(path) => {
            let config = FileConfig::load(path)?;
            if config.is_none() {
                anyhow::bail!("Config file {} does not exist", path.display());
            }
            Ok(config)
        }
        None => {
            let working_dir =
                std::env::current_dir().context("Failed to get current directory")?;
            FileConfig::load(&working_dir.join(CONFIG_FILE_NAME))
        }
    }
}
