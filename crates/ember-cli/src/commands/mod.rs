//! CLI command implementations

pub mod inspect;
pub mod simulate;
pub mod template;

use anyhow::{Context, Result};
use ember_particles::ParticleSystemConfig;

/// Read and parse a particle system file
pub fn load_config(path: &str) -> Result<ParticleSystemConfig> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read '{path}'"))?;
    ParticleSystemConfig::from_toml_str(&source)
        .with_context(|| format!("Failed to parse '{path}'"))
}
