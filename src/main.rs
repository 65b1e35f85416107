use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use valentine_card::card::{CardSession, LogSoundPlayer};
use valentine_card::notify::{CloudinaryStore, Dispatcher, EmailJsSender, LogAlertSink, MediaStore};
use valentine_card::recorder::RecorderSession;
use valentine_card::{create_router, AppState, Config, MicBackend};

#[derive(Parser, Debug)]
#[command(name = "valentine-card", about = "Proposal card API server")]
struct Args {
    /// Config file name (TOML, extension omitted)
    #[arg(long, default_value = "config/valentine")]
    config: String,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Valentine card v0.1.0 ({})", cfg.service.name);

    let media: Arc<dyn MediaStore> = Arc::new(CloudinaryStore::new(cfg.media_store.clone()));
    let dispatcher = Arc::new(Dispatcher::new(
        cfg.notify_config(),
        media.clone(),
        Arc::new(EmailJsSender::new()),
        Arc::new(LogAlertSink),
    ));

    let card = CardSession::new(cfg.card.layout());
    let recorder = RecorderSession::new(Box::new(MicBackend::new(cfg.audio.capture_config())));

    let state = AppState::new(card, recorder, dispatcher, media, Arc::new(LogSoundPlayer));
    let app = create_router(state);

    let bind = args.bind.unwrap_or_else(|| cfg.service.http.bind.clone());
    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
