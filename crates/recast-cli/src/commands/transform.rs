//! Transform a JSON document

use anyhow::{Context, Result};
use recast_core::{JsonOptions, Payload, Transformer, Using};
use serde_json::Value;

use crate::host::HostConfig;

/// Run the transform command
pub fn run(
    config_path: &str,
    input: &str,
    group: Option<&str>,
    transformer: Option<&str>,
    includes: &[String],
    options: JsonOptions,
) -> Result<()> {
    tracing::debug!("Loading configuration from {}", config_path);
    let host = HostConfig::load(config_path).context("Failed to load configuration")?;

    let mut ctx = host.context(includes);
    if let Some(group) = group {
        if !ctx.registry_mut().set_active_group(group) {
            anyhow::bail!(
                "Unknown transformer group '{}' (available: {})",
                group,
                ctx.registry().groups().join(", ")
            );
        }
    }

    let contents = if input == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };
    let document: Value =
        serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", input))?;
    let payload = Payload::from_value(document, &host.type_key)?;

    let engine = recast_core::transform(&ctx, payload.as_data(), transformer.map(Using::named))?;
    tracing::debug!(
        "Transforming {} record(s) with {}",
        engine.data().len(),
        engine.transformer().name()
    );

    let json = engine
        .to_json(options)
        .map_err(|err| anyhow::anyhow!(err))
        .context("Transformer failed")?;

    println!("{}", json);
    Ok(())
}
