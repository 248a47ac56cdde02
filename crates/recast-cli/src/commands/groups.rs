//! List transformer groups

use anyhow::{Context, Result};
use recast_core::TransformerRegistry;

use crate::host::HostConfig;

/// Run the groups command
pub fn run(config_path: &str) -> Result<()> {
    tracing::debug!("Loading configuration from {}", config_path);

    let host = HostConfig::load(config_path).context("Failed to load configuration")?;
    let registry = TransformerRegistry::new(host.registry);

    for group in registry.groups() {
        let marker = if group == registry.active_group() { "*" } else { " " };
        let bindings = registry.bindings(group).cloned().unwrap_or_default();
        println!("{} {} ({} bindings)", marker, group, bindings.len());

        let mut bindings: Vec<_> = bindings.into_iter().collect();
        bindings.sort();
        for (record_type, transformer) in bindings {
            println!("    {} -> {}", record_type, transformer);
        }
    }

    Ok(())
}
