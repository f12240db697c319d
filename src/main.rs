use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waikane_flood::config::{NotebookConfig, DEFAULT_PROGRAM, DEFAULT_SCRIPT};
use waikane_flood::regenerator::{
    regenerate_logged, NotebookRegenerator, Regenerator, Serialized, SkipRegeneration,
};
use waikane_flood::{api, store::ArtifactStore};

#[derive(Parser)]
#[command(name = "waikane-flood")]
#[command(about = "Serves regenerated Waikane tide and stream datasets")]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve(ServeArgs),
    /// Run the notebook once and exit
    Regenerate,
}

/// Listener settings, only meaningful for `serve`.
#[derive(Parser)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1", env = "WAIKANE_HOST")]
    host: String,

    /// Port for HTTP API
    #[arg(short, long, default_value_t = 5000, env = "WAIKANE_PORT")]
    port: u16,
}

#[derive(Args)]
struct Options {
    /// Directory holding the artifacts; the notebook runs here
    #[arg(long, global = true, default_value = ".", env = "WAIKANE_DATA_DIR")]
    data_dir: PathBuf,

    /// Program that regenerates the artifacts
    #[arg(long, global = true, default_value = DEFAULT_PROGRAM, env = "WAIKANE_REGENERATE_PROGRAM")]
    program: String,

    /// Argument passed to the program (repeatable)
    #[arg(
        long = "arg",
        global = true,
        default_value = DEFAULT_SCRIPT,
        env = "WAIKANE_REGENERATE_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    args: Vec<String>,

    /// Kill a regeneration that runs longer than this
    #[arg(long, global = true, env = "WAIKANE_REGENERATE_TIMEOUT")]
    timeout_secs: Option<u64>,

    /// Allow only one regeneration at a time
    #[arg(long, global = true)]
    serialize_regeneration: bool,

    /// Serve files as they are without running the notebook
    #[arg(long, global = true)]
    skip_regeneration: bool,
}

impl Options {
    fn regenerator(&self) -> Arc<dyn Regenerator> {
        if self.skip_regeneration {
            tracing::warn!("Regeneration disabled; serving artifacts as found on disk");
            return Arc::new(SkipRegeneration);
        }

        let config = NotebookConfig::new(&self.program, self.data_dir.clone())
            .with_args(&self.args)
            .with_timeout(self.timeout_secs.map(Duration::from_secs));
        tracing::debug!("Regeneration command: {:?}", config);

        let notebook = NotebookRegenerator::new(config);
        if self.serialize_regeneration {
            return Arc::new(Serialized::new(notebook));
        }
        Arc::new(notebook)
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "waikane_flood=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Signal received, shutting down");
}

async fn serve(listen: &ServeArgs, options: &Options) -> anyhow::Result<()> {
    let store = ArtifactStore::open_dir(&options.data_dir);
    let app = api::create_router(store, options.regenerator());

    let addr = format!("{}:{}", listen.host, listen.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "Waikane flood server listening on http://{} (data in {})",
        addr,
        options.data_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // No subcommand serves with defaults (and any env overrides)
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(ServeArgs::parse_from(["serve"])));

    match command {
        Commands::Serve(listen) => serve(&listen, &cli.options).await?,
        Commands::Regenerate => {
            let regenerator = cli.options.regenerator();
            regenerate_logged(regenerator.as_ref()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_options_belong_to_serve() {
        let cli = Cli::try_parse_from(["waikane-flood", "serve", "--port", "8080"])
            .expect("serve accepts --port");
        match cli.command {
            Some(Commands::Serve(listen)) => assert_eq!(listen.port, 8080),
            _ => panic!("expected serve"),
        }

        assert!(Cli::try_parse_from(["waikane-flood", "regenerate", "--port", "1"]).is_err());
    }

    #[test]
    fn data_options_apply_to_every_command() {
        let cli = Cli::try_parse_from(["waikane-flood", "regenerate", "--data-dir", "/srv/flood"])
            .expect("regenerate accepts --data-dir");
        assert_eq!(cli.options.data_dir, PathBuf::from("/srv/flood"));
        assert!(matches!(cli.command, Some(Commands::Regenerate)));
    }
}
