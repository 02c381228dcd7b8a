//! Particle manager: one configured system, its slot pool, bitmap and sound
//!
//! Slots launch staggered over one lifetime (or all at once), live for a sampled
//! lifetime, then are recycled in place until their repeat budget is spent.
//! The owner calls `update` once per frame and then `draw`.

use crate::backend::{AudioBackend, ResourceProvider, SoundHandle, SpriteHandle};
use crate::config::{AnimationMode, ParticleSystemConfig};
use crate::curves::{compute_depth, lerp_color};
use crate::particle::{Particle, ParticlePool};
use crate::rand::ParticleRng;
use crate::render::{
    DepthSortMode, DrawParams, FrameRect, SpriteDraw, SpriteRenderer, LAYER_STEP,
    PARTICLE_DEPTH_SHIFT,
};
use crate::sort::DepthSorter;
use crate::sound::{CadenceInput, SoundCadence};
use ember_core::Result;
use glam::{Mat2, Vec2, Vec3};

/// Frame rate the per-frame motion parameters are expressed in
pub const REFERENCE_FPS: f32 = 60.0;

/// Shortest lifetime a particle can be sampled with, in milliseconds
pub const MIN_LIFETIME: f32 = 1.0;

const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

pub struct ParticleManager {
    system: ParticleSystemConfig,
    pool: ParticlePool,
    rng: ParticleRng,
    sorter: DepthSorter,
    bitmap: Option<SpriteHandle>,
    cadence: SoundCadence,
    killed: bool,
    /// Owner height seen by the last update, used for layered depth
    owner_z: f32,
}

impl Default for ParticleManager {
    fn default() -> Self {
        Self::empty()
    }
}

impl ParticleManager {
    /// A zero-capacity manager: updates and draws are no-ops and it is always finished
    pub fn empty() -> Self {
        Self {
            system: ParticleSystemConfig::default(),
            pool: ParticlePool::new(0),
            rng: ParticleRng::new(DEFAULT_SEED),
            sorter: DepthSorter::new(),
            bitmap: None,
            cadence: SoundCadence::new(1.0, 1.0),
            killed: false,
            owner_z: 0.0,
        }
    }

    /// Load the named configuration from `provider` and build a manager from it
    pub fn from_resource(
        provider: &mut dyn ResourceProvider,
        name: &str,
        position: Vec2,
        position3: Vec3,
        angle: f32,
        entity_volume: f32,
    ) -> Result<Self> {
        let config = provider.load_system(name)?;
        log::debug!("loaded particle system '{name}'");
        Ok(Self::from_config(
            provider,
            config,
            position,
            position3,
            angle,
            entity_volume,
            1.0,
        ))
    }

    /// Build a manager from an in-memory configuration.
    ///
    /// The configuration is sanitized and scaled by `scale`. A bitmap or sound
    /// that cannot be resolved is logged and left unbound.
    pub fn from_config(
        provider: &mut dyn ResourceProvider,
        config: ParticleSystemConfig,
        position: Vec2,
        position3: Vec3,
        angle: f32,
        entity_volume: f32,
        scale: f32,
    ) -> Self {
        let mut system = config;
        for fix in system.sanitize() {
            log::warn!("particle system: {fix}");
        }
        if scale > 0.0 {
            if scale != 1.0 {
                system.scale(scale);
            }
        } else {
            log::warn!("particle system: ignoring non-positive scale {scale}");
        }
        if system.lifetime <= 0.0 {
            log::warn!(
                "particle system: lifetime {} is not positive, nothing will be emitted",
                system.lifetime
            );
        }

        let bitmap_file = system.actual_bitmap_file(provider.bitmap_suffix_rules());
        let bitmap = match provider.sprite(&bitmap_file) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("particle system: no bitmap ({e})");
                None
            }
        };

        let sound = if system.sound_fx_file.is_empty() {
            None
        } else {
            match provider.sound(&system.sound_fx_file) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::warn!("particle system: no sound ({e})");
                    None
                }
            }
        };

        let mut cadence = SoundCadence::new(entity_volume, provider.general_volume());
        cadence.set_sound(sound);

        let capacity = system.particle_count;
        let mut manager = Self {
            system,
            pool: ParticlePool::new(capacity),
            rng: ParticleRng::new(DEFAULT_SEED),
            sorter: DepthSorter::with_capacity(capacity),
            bitmap,
            cadence,
            killed: false,
            owner_z: position3.z,
        };
        manager.rewind(position, position3, angle);

        log::debug!(
            "particle system ready: {} slots, bitmap '{}', sound '{}'",
            capacity,
            manager.bitmap_name(),
            manager.sound_name()
        );
        manager
    }

    /// Reseed the particle RNG (for reproducible runs)
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = ParticleRng::new(seed);
        self
    }

    /// Advance every slot by `elapsed_ms`, launching, integrating and recycling
    /// particles, then drive the sound effect. Returns true if the system
    /// finished during this call.
    pub fn update(
        &mut self,
        audio: &mut dyn AudioBackend,
        position: Vec2,
        position3: Vec3,
        angle: f32,
        elapsed_ms: u32,
    ) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let was_finished = self.finished();

        let dt = elapsed_ms as f32;
        let frame_speed = dt / 1000.0 * REFERENCE_FPS;
        let rotation = Mat2::from_angle(-angle.to_radians());
        self.owner_z = position3.z;

        let system = &self.system;
        let rng = &mut self.rng;
        let killed = self.killed;
        let capacity = self.pool.capacity();
        let mut launched = 0;

        for (slot, particle) in self.pool.slots_mut().iter_mut().enumerate() {
            if particle.active {
                particle.elapsed += dt;
                integrate(system, particle, frame_speed);
            } else {
                if killed || exhausted(system, particle) {
                    continue;
                }
                particle.elapsed += dt;
                let threshold = launch_threshold(system, slot, capacity);
                if particle.elapsed < threshold {
                    continue;
                }
                let carry = particle.elapsed - threshold;
                reset_particle(system, rng, particle, position, position3, angle, rotation);
                particle.elapsed = carry;
                launched += 1;
            }

            animate(system, rng, particle);

            if particle.elapsed >= particle.lifetime {
                particle.active = false;
                particle.elapsed = 0.0;
                particle.repeat = particle.repeat.saturating_add(1);
                if !killed && !exhausted(system, particle) {
                    reset_particle(system, rng, particle, position, position3, angle, rotation);
                    launched += 1;
                }
            }
        }

        let finished = self.finished();
        let input = CadenceInput {
            position,
            min_repeat: self.pool.min_repeat(),
            launched,
            killed: self.killed,
            finished,
        };
        self.cadence.handle(audio, &input);

        log::trace!(
            "particles: {} active, {} launched, finished={}",
            self.pool.active_count(),
            launched,
            finished
        );
        !was_finished && finished
    }

    /// Submit every active particle, back to front. Returns false when there is
    /// no bitmap or no slot to draw.
    pub fn draw(&mut self, renderer: &mut dyn SpriteRenderer, params: &DrawParams) -> bool {
        if self.pool.is_empty() {
            return false;
        }
        let Some(bitmap) = self.bitmap.as_deref() else {
            return false;
        };

        renderer.set_alpha_mode(self.system.alpha_mode);

        let particles = self.pool.slots();
        let order = self.sorter.sort(particles);
        let layer_depth = compute_depth(
            self.owner_z + self.system.start_point.z + PARTICLE_DEPTH_SHIFT,
            params.max_height,
            params.min_height,
        );

        for (rank, &index) in order.iter().enumerate() {
            let particle = &particles[index];
            let depth = match params.sort_mode {
                DepthSortMode::IndividualOffset => compute_depth(
                    particle.start_point.z + particle.offset(),
                    params.max_height,
                    params.min_height,
                ),
                DepthSortMode::Layerable => layer_depth + rank as f32 * LAYER_STEP,
                DepthSortMode::SameDepthAsOwner => params.owner_depth,
            };

            let rgb = (particle.color.truncate() * params.ambient + self.system.emissive)
                .max(Vec3::ZERO)
                .min(Vec3::ONE);
            let position = particle.position
                + params.z_axis_direction * particle.start_point.z
                + params.parallax_offset;

            renderer.submit_sprite(&SpriteDraw {
                sprite: bitmap,
                id: particle.id,
                position,
                size: particle.size,
                angle: particle.angle,
                color: rgb.extend(particle.color.w),
                depth,
                frame: particle.current_frame,
                rect: FrameRect::for_frame(particle.current_frame, self.system.sprite_cut),
            });
        }

        true
    }

    /// True once no slot is active and none will launch again
    pub fn finished(&self) -> bool {
        if self.is_degenerate() {
            return true;
        }
        if !self.killed && self.system.is_endless() {
            return false;
        }
        self.pool
            .slots()
            .iter()
            .all(|p| !p.active && (self.killed || exhausted(&self.system, p)))
    }

    /// Restart the system: every slot goes back to unlaunched with no repeats.
    /// Returns false for an empty pool.
    pub fn play(&mut self, position: Vec2, position3: Vec3, angle: f32) -> bool {
        if self.pool.is_empty() {
            return false;
        }
        self.killed = false;
        self.owner_z = position3.z;
        self.rewind(position, position3, angle);
        true
    }

    /// Stop launching particles; active ones live out their lifetime
    pub fn kill(&mut self, kill: bool) {
        self.killed = kill;
        if kill {
            self.cadence.on_kill();
        }
    }

    pub fn killed(&self) -> bool {
        self.killed
    }

    /// Swap in another configuration mid-run. The slot count is kept.
    pub fn set_system(&mut self, config: ParticleSystemConfig) {
        let mut system = config;
        for fix in system.sanitize() {
            log::warn!("particle system: {fix}");
        }
        if system.particle_count != self.pool.capacity() {
            log::debug!(
                "particle system: keeping {} slots (new configuration asked for {})",
                self.pool.capacity(),
                system.particle_count
            );
            system.particle_count = self.pool.capacity();
        }

        let frames = system.num_frames();
        for particle in self.pool.slots_mut() {
            particle.size = particle.size.max(system.min_size).min(system.max_size);
            particle.current_frame %= frames;
            particle.frame_step = particle.frame_step.min(frames - 1);
        }
        self.system = system;
    }

    pub fn system(&self) -> &ParticleSystemConfig {
        &self.system
    }

    pub fn set_particle_bitmap(&mut self, bitmap: Option<SpriteHandle>) {
        self.bitmap = bitmap;
    }

    pub fn particle_bitmap(&self) -> Option<&SpriteHandle> {
        self.bitmap.as_ref()
    }

    pub fn set_sound_effect(&mut self, sound: Option<SoundHandle>) {
        self.cadence.set_sound(sound);
    }

    pub fn sound_effect(&self) -> Option<&SoundHandle> {
        self.cadence.sound()
    }

    pub fn has_sound_effect(&self) -> bool {
        self.cadence.sound().is_some()
    }

    /// Emission anchor, relative to the owner
    pub fn set_start_pos(&mut self, start: Vec3) {
        self.system.start_point = start;
    }

    pub fn start_pos(&self) -> Vec3 {
        self.system.start_point
    }

    /// Layer height of the system; also moves particles already in flight
    pub fn set_tile_z(&mut self, z: f32) {
        self.system.start_point.z = z;
        let height = self.owner_z + z;
        for particle in self.pool.slots_mut() {
            particle.start_point.z = height;
        }
    }

    pub fn tile_z(&self) -> f32 {
        self.system.start_point.z
    }

    pub fn bounding_radius(&self) -> f32 {
        self.system.bounding_sphere
    }

    /// Name of the bound bitmap, or the configured one if none is bound
    pub fn bitmap_name(&self) -> &str {
        self.bitmap
            .as_ref()
            .map(|b| b.name.as_str())
            .unwrap_or(&self.system.bitmap_file)
    }

    /// Name of the bound sound, or the configured one if none is bound
    pub fn sound_name(&self) -> &str {
        self.cadence
            .sound()
            .map(|s| s.name.as_str())
            .unwrap_or(&self.system.sound_fx_file)
    }

    pub fn num_particles(&self) -> usize {
        self.pool.capacity()
    }

    pub fn num_active_particles(&self) -> usize {
        self.pool.active_count()
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.slots()
    }

    pub fn is_endless(&self) -> bool {
        self.system.is_endless()
    }

    pub fn is_sound_looping(&self) -> bool {
        self.cadence.is_looping()
    }

    /// Force the sound effect off (true) or allow it again (false)
    pub fn stop_sfx(&mut self, stopped: bool) {
        self.cadence.stop_sfx(stopped);
    }

    pub fn set_sound_volume(&mut self, volume: f32) {
        self.cadence.set_entity_volume(volume);
    }

    pub fn sound_volume(&self) -> f32 {
        self.cadence.entity_volume()
    }

    pub fn set_general_volume(&mut self, volume: f32) {
        self.cadence.set_general_volume(volume);
    }

    /// Lifecycles every slot must complete before the sound effect loops
    pub fn set_sound_loop_threshold(&mut self, repeats: u32) {
        self.cadence.set_loop_threshold(repeats);
    }

    pub fn scale_particle_system(&mut self, scale: f32) {
        if scale <= 0.0 || !scale.is_finite() {
            log::warn!("particle system: ignoring scale {scale}");
            return;
        }
        self.system.scale(scale);
        for particle in self.pool.slots_mut() {
            particle.scale(scale);
        }
    }

    pub fn mirror_x(&mut self, mirror_gravity: bool) {
        self.system.mirror_x(mirror_gravity);
        for particle in self.pool.slots_mut() {
            particle.direction.x = -particle.direction.x;
        }
    }

    pub fn mirror_y(&mut self, mirror_gravity: bool) {
        self.system.mirror_y(mirror_gravity);
        for particle in self.pool.slots_mut() {
            particle.direction.y = -particle.direction.y;
        }
    }

    fn is_degenerate(&self) -> bool {
        self.pool.is_empty() || self.system.lifetime <= 0.0
    }

    /// Every slot back to unlaunched, anchored at the owner
    fn rewind(&mut self, position: Vec2, position3: Vec3, angle: f32) {
        let rotation = Mat2::from_angle(-angle.to_radians());
        for particle in self.pool.slots_mut() {
            particle.active = false;
            particle.repeat = 0;
            particle.elapsed = 0.0;
            particle.frame_step = 0;
            position_particle(
                &self.system,
                &mut self.rng,
                particle,
                position,
                position3,
                angle,
                rotation,
            );
        }
    }
}

fn exhausted(system: &ParticleSystemConfig, particle: &Particle) -> bool {
    !system.is_endless() && particle.repeat >= system.repeat
}

/// Emitter time at which `slot` launches its first particle
fn launch_threshold(system: &ParticleSystemConfig, slot: usize, capacity: usize) -> f32 {
    if system.all_at_once || capacity == 0 {
        0.0
    } else {
        slot as f32 / capacity as f32 * system.lifetime
    }
}

fn reset_particle(
    system: &ParticleSystemConfig,
    rng: &mut ParticleRng,
    particle: &mut Particle,
    position: Vec2,
    position3: Vec3,
    angle: f32,
    rotation: Mat2,
) {
    let rand_dir = rng.spread_vec2(system.randomize_dir);
    particle.angle_dir = system.angle_dir + rng.spread(system.rand_angle);
    particle.elapsed = 0.0;
    particle.lifetime =
        (system.lifetime + rng.spread(system.randomize_lifetime)).max(MIN_LIFETIME);
    particle.size = (system.size + rng.spread(system.randomize_size))
        .max(system.min_size)
        .min(system.max_size);
    particle.direction = rotation * (system.direction + rand_dir);
    particle.color = system.color0;
    particle.frame_step = 0;
    particle.current_frame = match system.animation_mode {
        AnimationMode::PlayAnimation => 0,
        AnimationMode::PickRandomFrame => rng.index(system.num_frames()),
    };
    particle.active = true;
    position_particle(system, rng, particle, position, position3, angle, rotation);
}

fn position_particle(
    system: &ParticleSystemConfig,
    rng: &mut ParticleRng,
    particle: &mut Particle,
    position: Vec2,
    position3: Vec3,
    angle: f32,
    rotation: Mat2,
) {
    let rand_pos = rng.spread_vec2(system.rand_start_point);
    particle.angle = system.angle_start + rng.spread(system.rand_angle_start) + angle;
    particle.position = position + rotation * (system.start_point.truncate() + rand_pos);
    particle.start_point = particle
        .position
        .extend(position3.z + system.start_point.z);
}

fn integrate(system: &ParticleSystemConfig, particle: &mut Particle, frame_speed: f32) {
    particle.direction += system.gravity * frame_speed;
    particle.position += particle.direction * frame_speed;
    particle.angle += particle.angle_dir * frame_speed;
    particle.size = (particle.size + system.growth * frame_speed)
        .max(system.min_size)
        .min(system.max_size);
}

/// Color and sprite frame for the particle's current age
fn animate(system: &ParticleSystemConfig, rng: &mut ParticleRng, particle: &mut Particle) {
    let t = particle.age_ratio();
    particle.color = lerp_color(system.color0, system.color1, t);

    let frames = system.num_frames();
    if frames <= 1 {
        return;
    }
    let step = ((t * frames as f32) as u32).min(frames - 1);
    match system.animation_mode {
        AnimationMode::PlayAnimation => particle.current_frame = step,
        AnimationMode::PickRandomFrame => {
            if step != particle.frame_step {
                particle.current_frame = rng.index(frames);
            }
        }
    }
    particle.frame_step = step;
}
