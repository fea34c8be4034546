use std::sync::Arc;

use anyhow::Context;

use hayden_assist::assistant::Assistant;
use hayden_assist::channels::{CliChannel, session_routes};
use hayden_assist::config::AssistConfig;
use hayden_assist::session::SessionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AssistConfig::from_env().context("invalid configuration")?;

    eprintln!("🧸 Hayden Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Knowledge: {}", config.data_dir.display());
    eprintln!("   History: {}", config.history);

    // ── Assistant ───────────────────────────────────────────────────────
    let (assistant, report) = Assistant::from_config(&config)
        .await
        .with_context(|| format!("cannot start with knowledge folder {}", config.data_dir.display()))?;
    for failure in &report.failures {
        eprintln!("⚠️  Could not read {}: {}", failure.document, failure.reason);
    }
    if report.loaded.is_empty() {
        eprintln!("⚠️  No knowledge base loaded. Please add documents to the data folder.");
    } else {
        eprintln!("   Documents: {}", report.loaded.join(", "));
    }
    if let Some(path) = &config.escalation_log {
        eprintln!("   Escalations: {}", path.display());
    }
    let assistant = Arc::new(assistant);

    // ── Channels ────────────────────────────────────────────────────────
    if let Some(port) = config.http_port {
        let app = session_routes(assistant, Arc::new(SessionManager::new(config.max_sessions)));
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .with_context(|| format!("cannot bind HTTP port {port}"))?;
        eprintln!("   Session API: http://0.0.0.0:{port}/api/sessions");
        tracing::info!(port, "HTTP server started");
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
    } else {
        eprintln!("   Type a message and press Enter. /image <path> attaches a photo, /quit exits.\n");
        CliChannel::new().run(&assistant).await?;
    }

    Ok(())
}
