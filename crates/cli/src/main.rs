use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use cozy_kernel::settings::{Settings, StoreBackend};
use cozy_reads::modules::books::seed;
use cozy_reads::Application;

/// Cozy Reads inventory service
#[derive(Debug, Parser)]
#[command(name = "cozy-cli", version, about)]
struct Cli {
    /// Override the configured storage backend
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Reset the books collection to the fixed sample set
    Seed,
    /// Create the lookup indexes declared by all modules
    Migrate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Mongo,
    Memory,
}

impl From<Backend> for StoreBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Mongo => StoreBackend::Mongo,
            Backend::Memory => StoreBackend::Memory,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Cozy Reads settings")?;
    if let Some(backend) = cli.backend {
        settings.database.backend = backend.into();
    }
    cozy_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            Application::bootstrap(settings).await?.run().await
        }
        Command::Seed => {
            let app = Application::bootstrap(settings).await?;
            let summary = seed::seed(app.store().as_ref())
                .await
                .context("failed to seed database")?;
            println!(
                "removed {} books, {} books inserted, indexes on {}",
                summary.removed,
                summary.inserted,
                summary.indexes.join(", ")
            );
            Ok(())
        }
        Command::Migrate => {
            let app = Application::bootstrap(settings).await?;
            app.migrate().await?;
            let applied = app.registry().collect_migrations();
            println!("applied {} index migrations", applied.len());
            Ok(())
        }
    }
}
