//! Default configuration template

use anyhow::Result;
use ember_particles::ParticleSystemConfig;

pub fn run() -> Result<()> {
    print!("{}", template_string()?);
    Ok(())
}

fn template_string() -> Result<String> {
    let config = ParticleSystemConfig {
        particle_count: 32,
        ..Default::default()
    };
    Ok(config.to_toml_string()?)
}
