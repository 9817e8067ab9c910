use futures_util::{SinkExt, StreamExt};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use truthguard::config::ProviderConfiguration;
use truthguard::db::HistoryEngine;
use truthguard::pipeline::LiveAnalyzer;
use truthguard::telemetry::init_tracing;

mod api;
mod bridge;

use api::message::ClientMessage;
use bridge::{error_message, Bridge};

const DEFAULT_ADDR: &str = "127.0.0.1:8787";

async fn serve_connection(
    bridge: Arc<Bridge>,
    stream: TcpStream,
    peer: SocketAddr,
) -> anyhow::Result<()> {
    let mut ws = accept_async(stream).await?;
    debug!(%peer, "websocket connected");

    while let Some(msg) = ws.next().await {
        let msg = msg?;
        if msg.is_close() {
            break;
        }
        if !msg.is_text() {
            continue;
        }

        let reply = match serde_json::from_str::<ClientMessage>(msg.to_text()?) {
            Ok(parsed) => bridge.handle(parsed).await,
            Err(err) => {
                warn!(%peer, error = %err, "malformed frame");
                error_message("system", &format!("JSON parse error: {err}"))
            }
        };
        ws.send(WsMessage::Text(serde_json::to_string(&reply)?)).await?;
    }

    debug!(%peer, "websocket closed");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = ProviderConfiguration::from_env()?;

    let analyzer = LiveAnalyzer::from_config(&config)?;
    let history = HistoryEngine::open(&config.history_path)?;
    let bridge = Arc::new(Bridge::new(analyzer, Arc::new(history)));

    let addr: SocketAddr = env::var("TRUTHGUARD_BRG_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "TruthGuard bridge listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            if let Err(err) = serve_connection(bridge, stream, peer).await {
                warn!(%peer, error = %err, "connection ended with error");
            }
        });
    }
}
