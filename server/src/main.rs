use axum::routing::get;
use axum::Router;
use crane_server::config::InstallationConfig;
use crane_server::game_loop::{run_frame_loop, SceneBroadcast, ViewerCommand};
use crane_server::ingest::IngestBridge;
use crane_server::osc::OscColorSender;
use crane_server::palette::Palette;
use crane_server::ws::{ws_handler, AppState};
use tokio::net::UdpSocket;
use tokio::sync::{broadcast, mpsc};
use tower_http::cors::CorsLayer;

const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Log and bail out. Startup problems are not recoverable.
fn fail(what: &str, e: impl std::fmt::Display) -> ! {
    tracing::error!("{}: {}", what, e);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let config = match InstallationConfig::load(&path) {
        Ok(config) => config,
        Err(e) => fail(&format!("Failed to load settings from {}", path), e),
    };
    tracing::info!(
        "Loaded {} colors and {} launchers from {}",
        config.colors.len(),
        config.launchers.len(),
        path
    );

    let receiver_addr = config.receiver_addr();
    let socket = match UdpSocket::bind(&receiver_addr).await {
        Ok(socket) => socket,
        Err(e) => fail(&format!("Failed to bind crane socket {}", receiver_addr), e),
    };
    tracing::info!("Listening for cranes on udp://{}", receiver_addr);

    let sink = match OscColorSender::new(&config.sender_addr()) {
        Ok(sink) => sink,
        Err(e) => fail("Failed to set up OSC sender", e),
    };
    tracing::info!("Forwarding colors to osc.udp://{}", sink.target());

    let ingest = IngestBridge::new(socket, Palette::from_entries(&config.colors));
    let listen_addr = config.viewer.listen_addr.clone();

    let (cmd_tx, cmd_rx) = mpsc::channel::<ViewerCommand>(256);
    let (broadcast_tx, _) = broadcast::channel::<SceneBroadcast>(64);

    // Spawn frame loop
    let bc_tx = broadcast_tx.clone();
    tokio::spawn(async move {
        run_frame_loop(cmd_rx, bc_tx, config, ingest, sink).await;
    });

    // Axum app
    let app_state = AppState {
        cmd_tx,
        broadcast_tx,
    };
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(listener) => listener,
        Err(e) => fail(&format!("Failed to bind viewer socket {}", listen_addr), e),
    };
    tracing::info!("Viewers connect to ws://{}/ws", listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        fail("Viewer server stopped", e);
    }
}
