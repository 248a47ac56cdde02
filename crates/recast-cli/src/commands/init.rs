//! Publish the default configuration

use anyhow::{Context, Result};
use std::path::Path;

/// Run the init command
pub fn run(path: &str) -> Result<()> {
    let target = Path::new(path);

    if target.extension().is_none() && !target.exists() {
        std::fs::create_dir_all(target)?;
    }

    let written = recast_core::publish_default_config(target)
        .with_context(|| format!("Failed to publish configuration to {}", target.display()))?;

    tracing::info!("✓ Created {}", written.display());
    tracing::info!("");
    tracing::info!("Next steps:");
    tracing::info!("  Bind record types to transformers under `recast.groups`");
    tracing::info!("  Declare those transformers under `transformers`");
    tracing::info!("  recast transform input.json");

    Ok(())
}
