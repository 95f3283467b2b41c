use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cliprelay::common::RelayConfig;
use cliprelay::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cliprelay")]
#[command(about = "Session based clip upload relay")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level, overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,
}

// serve is the default when no subcommand is given
#[derive(Subcommand)]
enum Commands {
    /// Run the relay http server
    Serve(ServeArgs),
}

#[derive(Args, Default)]
struct ServeArgs {
    #[arg(long, help = "Config file (default: ./cliprelay.toml if present)")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Directory uploads are stored under")]
    root: Option<PathBuf>,

    #[arg(long, help = "Directory with the static front-end")]
    public: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            let mut config = RelayConfig::load(args.config.as_deref())?;

            // cli flags win over file and env
            if let Some(port) = args.port {
                config.port = port;
            }
            if let Some(root) = args.root {
                config.upload_root = root;
            }
            if let Some(public) = args.public {
                config.public_dir = Some(public);
            }
            config.validate()?;

            server::start_server(config).await
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(format!("cliprelay={level},tower_http={level}")),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("cliprelay=info,tower_http=info")),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
