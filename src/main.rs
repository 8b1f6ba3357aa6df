use tokio::net::TcpListener;
use tracing::info;

use llm_scrape::{AppState, api::routes::create_router, config::Config, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(engine = %config.engine_url, "Starting server on {}", server_addr);

    let app_state = AppState::with_graph_client(config);
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
