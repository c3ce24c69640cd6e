// src/main.rs

use dotenvy::dotenv;
use semiquiz::config::Config;
use semiquiz::routes;
use semiquiz::services::{bank::QuestionBank, explainer};
use semiquiz::state::AppState;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env().expect("Invalid configuration");

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // A corrupt bank leaves nothing to quiz on
    let bank = QuestionBank::embedded().expect("Embedded question bank is invalid");
    tracing::info!(
        questions = bank.len(),
        topics = bank.topics().len(),
        "Question bank loaded"
    );

    let explainer = explainer::from_config(&config);

    // Create AppState
    let port = config.port;
    let state = AppState::new(bank, explainer, config);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
