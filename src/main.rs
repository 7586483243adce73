use anyhow::Context;
use cozy_kernel::settings::Settings;
use cozy_reads::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Cozy Reads settings")?;
    cozy_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        database = %settings.database.name,
        "cozy-reads bootstrap starting"
    );

    Application::bootstrap(settings).await?.run().await
}
