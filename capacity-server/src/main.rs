use capacity_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        mock_analysis = config.use_mock_analysis,
        "Capacity server starting..."
    );

    // 2. Shared state
    let state = ServerState::initialize(&config);

    // 3. HTTP server
    let server = Server::with_state(config, state);
    server.run().await
}
