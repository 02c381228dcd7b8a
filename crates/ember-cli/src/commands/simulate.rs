//! Headless simulation of a particle system configuration

use super::load_config;
use anyhow::Result;
use ember_particles::{
    DepthSortMode, DrawParams, InstanceBatch, MemoryResources, NullAudio, ParticleManager,
    ParticleSystemConfig,
};
use glam::{Vec2, Vec3};
use serde::Serialize;

pub struct SimulateArgs {
    pub config: String,
    pub frames: u32,
    pub step_ms: u32,
    pub seed: Option<u32>,
    pub mode: DepthSortMode,
    pub angle: f32,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub frames_run: u32,
    pub finished_at: Option<u32>,
    pub slots: usize,
    pub peak_active: usize,
    pub final_active: usize,
    pub last_draw_instances: usize,
    pub sound_looping: bool,
    pub bitmap: String,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let summary = simulate(config, &args);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Simulated {} ({} frame(s) of {} ms)",
            args.config, summary.frames_run, args.step_ms
        );
        println!("  slots:          {}", summary.slots);
        println!("  peak active:    {}", summary.peak_active);
        println!("  final active:   {}", summary.final_active);
        println!("  last draw:      {} instance(s)", summary.last_draw_instances);
        match summary.finished_at {
            Some(frame) => println!("  finished:       frame {frame}"),
            None => println!("  finished:       no"),
        }
        println!("  sound looping:  {}", summary.sound_looping);
    }
    Ok(())
}

fn simulate(config: ParticleSystemConfig, args: &SimulateArgs) -> SimulationSummary {
    let mut resources = MemoryResources::new();
    resources.insert_sprite(config.actual_bitmap_file(&[]), Vec2::splat(64.0));
    if !config.sound_fx_file.is_empty() {
        resources.insert_sound(config.sound_fx_file.clone());
    }

    let origin = Vec2::ZERO;
    let origin3 = Vec3::ZERO;
    let mut manager =
        ParticleManager::from_config(&mut resources, config, origin, origin3, args.angle, 1.0, 1.0);
    if let Some(seed) = args.seed {
        manager = manager.with_seed(seed);
    }

    let params = DrawParams {
        sort_mode: args.mode,
        max_height: 1024.0,
        min_height: -1024.0,
        ..Default::default()
    };
    let mut audio = NullAudio;
    let mut batch = InstanceBatch::with_capacity(manager.num_particles());

    let mut summary = SimulationSummary {
        frames_run: 0,
        finished_at: None,
        slots: manager.num_particles(),
        peak_active: 0,
        final_active: 0,
        last_draw_instances: 0,
        sound_looping: false,
        bitmap: manager.bitmap_name().to_string(),
    };

    for frame in 1..=args.frames {
        let just_finished = manager.update(&mut audio, origin, origin3, args.angle, args.step_ms);
        batch.clear();
        manager.draw(&mut batch, &params);

        summary.frames_run = frame;
        summary.peak_active = summary.peak_active.max(manager.num_active_particles());
        summary.last_draw_instances = batch.len();
        if just_finished {
            log::info!("system finished at frame {frame}");
            summary.finished_at = Some(frame);
            break;
        }
    }

    summary.final_active = manager.num_active_particles();
    summary.sound_looping = manager.is_sound_looping();
    summary
}
