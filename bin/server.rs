// KFO Studio - Web Server
// Booking + chat API with Axum

use anyhow::{Context, Result};
use kfo_studio::server::{router, AppState};
use kfo_studio::{open_store, ChatProxy, Config};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kfo_studio=info,kfo_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🌐 KFO Studio - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = open_store(&config)?;
    let chat = ChatProxy::from_config(&config);
    if !chat.is_configured() {
        warn!("OPENAI_API_KEY not set - chat will answer with the fallback reply");
    }

    // Create shared state
    let state = AppState {
        store,
        chat: Arc::new(chat),
    };

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("listening on {}", config.bind_addr);
    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/api/bookings", config.bind_addr);
    println!("   UI:  http://{}", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
