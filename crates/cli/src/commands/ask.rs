//! `switchboard ask` — one-shot in-process query.

use switchboard_config::AppConfig;
use switchboard_core::turn::SessionId;
use tracing::debug;

pub async fn run(
    config: AppConfig,
    message: String,
    session: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = super::build_orchestrator(&config)?;
    let session_id = session
        .map(SessionId::from)
        .unwrap_or_default();

    let envelope = orchestrator.process_query(&message, &session_id).await;
    debug!(
        handler = %envelope.handler_id,
        confidence = %envelope.intent.confidence,
        score = envelope.intent.score,
        error_handled = envelope.error_handled,
        session = %session_id,
        "Routed query"
    );

    println!("{}", envelope.content);
    Ok(())
}
