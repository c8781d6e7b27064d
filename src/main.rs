use std::sync::Arc;

use anyhow::Context;

use frt_intake::assessment::{DeferredReviewAssessor, PoseAssessor};
use frt_intake::cli::CliSession;
use frt_intake::config::{AppConfig, RunMode};
use frt_intake::error::ConfigError;
use frt_intake::intake::{DialogEngine, QuestionCatalog};
use frt_intake::server::{AppState, intake_routes};
use frt_intake::upload::VideoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    // ── Question catalog ─────────────────────────────────────────────────
    if !config.catalog_path.exists() {
        return Err(ConfigError::MissingRequired {
            key: "FRT_INTAKE_CATALOG".to_string(),
            hint: format!(
                "No question catalog at {}. Point FRT_INTAKE_CATALOG at a questions.json file.",
                config.catalog_path.display()
            ),
        }
        .into());
    }
    let catalog = Arc::new(
        QuestionCatalog::load(&config.catalog_path)
            .with_context(|| format!("loading {}", config.catalog_path.display()))?,
    );

    // ── Video store ──────────────────────────────────────────────────────
    let videos = VideoStore::new(config.upload_dir.clone());
    videos
        .ensure_dir()
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;

    let assessor: Arc<dyn PoseAssessor> = Arc::new(DeferredReviewAssessor);

    match config.mode {
        RunMode::Cli => {
            let mut session = CliSession::new(DialogEngine::new(catalog), videos, assessor);
            session.run_stdio().await?;
        }
        RunMode::Server => {
            let state = AppState::new(catalog, videos, assessor, config.max_upload_bytes);
            let app = intake_routes(state);
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
                .await
                .with_context(|| format!("binding port {}", config.port))?;
            tracing::info!(port = config.port, "FRT intake server started");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
