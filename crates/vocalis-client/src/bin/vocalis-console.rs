use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vocalis_client::console::{ConsoleSynthesizer, ConsoleView, StdinCapture};
use vocalis_client::{ClientError, HttpBackend, VoiceController};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let server_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VOCALIS_SERVER_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    info!("Connecting to {}", server_url);
    let backend = HttpBackend::new(server_url)?;

    let mut controller = VoiceController::new(
        StdinCapture::new(),
        ConsoleSynthesizer,
        backend,
        ConsoleView,
    );

    while !controller.capture().is_exhausted() {
        match controller.listen_once().await {
            Ok(_) => {}
            // Already shown by the view; keep listening.
            Err(ClientError::Server { .. }) | Err(ClientError::Http(_)) => {}
            Err(ClientError::Capture(_)) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
