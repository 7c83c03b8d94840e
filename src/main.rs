use hfcnet::{api, config::Config, Simulator};
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    let simulator = match Simulator::new(
        config.tier_rules.clone(),
        &config.root_name,
        config.root_tier,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize network: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        root = %config.root_name,
        root_tier = %config.root_tier,
        tiers = config.tier_rules.tiers().count(),
        "network initialized"
    );

    let app = api::create_router(api::AppState::new(simulator, config.export_dir.clone()));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
