//! `switchboard capabilities` — print the registry.

use switchboard_config::AppConfig;

pub fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = super::build_registry(&config)?;

    println!("{:<12} {:>8} {:>10} {:>10}", "HANDLER", "ENABLED", "PRIORITY", "THRESHOLD");
    for (capability, enabled) in registry.list_all() {
        println!(
            "{:<12} {:>8} {:>10} {:>10.2}",
            capability.handler_id, enabled, capability.priority, capability.confidence_threshold
        );
    }
    Ok(())
}
