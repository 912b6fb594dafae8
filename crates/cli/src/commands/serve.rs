//! `switchboard serve` — start the HTTP gateway.

use switchboard_config::AppConfig;
use tracing::info;

pub async fn run(mut config: AppConfig, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config.gateway.port = port;
    }

    let orchestrator = super::build_orchestrator(&config)?;
    info!(
        addr = %config.gateway.bind_addr(),
        default_handler = %config.default_handler_id,
        "Starting gateway"
    );
    switchboard_gateway::start(&config.gateway.bind_addr(), orchestrator).await
}
