use anyhow::Context;
use rand::{rngs::SmallRng, SeedableRng};
use tracing_subscriber::EnvFilter;

use vehicle_dashboard::{
    router, stop_and_join, stop_channel, AppState, DashboardConfig, Models, SharedTelemetry, Updater,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = DashboardConfig::from_env().context("failed to load dashboard config")?;
    let addr = cfg.socket_addr()?;

    let models = Models::fit().context("failed to fit prediction models")?;
    tracing::info!(
        "maintenance model: weights={:?} intercept={:.4}",
        models.maintenance.regressor().weights(),
        models.maintenance.regressor().intercept()
    );
    tracing::info!(
        "behavior model: weights={:?} intercept={:.4} classes={:?}",
        models.behavior.regressor().weights(),
        models.behavior.regressor().intercept(),
        models.behavior.encoder().classes()
    );

    let telemetry = SharedTelemetry::new();
    let (stop, stop_rx) = stop_channel();
    let updater = Updater::new(telemetry.clone(), SmallRng::from_entropy(), cfg.tick());
    let updater_task = tokio::spawn(updater.run(stop_rx));

    let state = AppState::new(telemetry, models).with_prediction_logging(cfg.log_predictions);
    let app = router(state);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind TCP listener at {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown requested");
        })
        .await?;

    stop_and_join(&stop, updater_task)
        .await
        .context("updater task panicked")?;
    Ok(())
}
