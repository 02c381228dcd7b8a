//! Print derived properties of a configuration

use super::load_config;
use anyhow::Result;
use ember_particles::ParticleSystemConfig;

pub fn run(path: &str) -> Result<()> {
    let config = load_config(path)?;
    for line in describe(config) {
        println!("{line}");
    }
    Ok(())
}

fn describe(mut config: ParticleSystemConfig) -> Vec<String> {
    let fixes = config.sanitize();
    let mut lines = vec![
        format!("particles:   {}", config.particle_count),
        format!("bitmap:      {}", config.actual_bitmap_file(&[])),
        format!(
            "frames:      {} ({}x{})",
            config.num_frames(),
            config.sprite_cut.x,
            config.sprite_cut.y
        ),
        format!("lifetime:    {} ms (± {})", config.lifetime, config.randomize_lifetime),
        if config.is_endless() {
            "repeat:      endless".to_string()
        } else {
            format!("repeat:      {}", config.repeat)
        },
        format!(
            "emission:    {}",
            if config.all_at_once { "all at once" } else { "staggered" }
        ),
        format!("alpha mode:  {:?}", config.alpha_mode),
        format!("animation:   {:?}", config.animation_mode),
        format!(
            "sound:       {}",
            if config.sound_fx_file.is_empty() {
                "none"
            } else {
                config.sound_fx_file.as_str()
            }
        ),
        format!("bounding:    {}", config.bounding_sphere),
    ];

    if fixes.is_empty() {
        lines.push("sanitized:   no changes".to_string());
    } else {
        lines.push(format!("sanitized:   {} fix(es)", fixes.len()));
        lines.extend(fixes.into_iter().map(|fix| format!("  - {fix}")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec2;

    #[test]
    fn test_describe_reports_fixes() {
        let config = ParticleSystemConfig {
            particle_count: 4,
            sprite_cut: UVec2::new(0, 3),
            repeat: 2,
            ..Default::default()
        };
        let lines = describe(config);
        assert!(lines.iter().any(|l| l == "frames:      3 (1x3)"));
        assert!(lines.iter().any(|l| l == "repeat:      2"));
        assert!(lines.iter().any(|l| l == "bitmap:      particle.png"));
        assert!(lines.iter().any(|l| l == "sanitized:   1 fix(es)"));
    }

    #[test]
    fn test_describe_clean_config() {
        let lines = describe(ParticleSystemConfig::default());
        assert!(lines.iter().any(|l| l == "repeat:      endless"));
        assert!(lines.iter().any(|l| l == "sanitized:   no changes"));
    }
}
