//! Particle system configuration (serialized as TOML) and its transforms

use ember_core::Result;
use glam::{UVec2, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Upper bound on the pool capacity of a single system
pub const MAX_PARTICLES: usize = 10_000;

/// Bitmap used when a configuration does not name one
pub const DEFAULT_PARTICLE_BITMAP: &str = "particle.png";

/// Blend mode used when the sprites are composited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaMode {
    #[default]
    Pixel,
    Add,
    AlphaTest,
    None,
    Modulate,
}

/// How a particle walks through the sprite sheet frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationMode {
    /// Frames advance in order over the particle lifetime
    #[default]
    #[serde(rename = "play")]
    PlayAnimation,
    /// A uniformly random frame is picked at each animation step
    #[serde(rename = "random_frame")]
    PickRandomFrame,
}

/// Replaces a file-name suffix, e.g. `.png` → `@2x.png` for hi-dpi variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRule {
    pub from: String,
    pub to: String,
}

impl SuffixRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Applies the rule if `file` ends with `from` (ASCII case-insensitive)
    pub fn apply(&self, file: &str) -> Option<String> {
        if self.from.is_empty() || file.len() < self.from.len() {
            return None;
        }
        let split = file.len() - self.from.len();
        if !file.is_char_boundary(split) {
            return None;
        }
        let (stem, suffix) = file.split_at(split);
        if suffix.eq_ignore_ascii_case(&self.from) {
            Some(format!("{stem}{}", self.to))
        } else {
            None
        }
    }
}

/// Emission, physics and appearance parameters shared by every particle of a system.
///
/// Times are in milliseconds. Directions, gravity, growth and angular speed are
/// expressed per reference frame (1/60 s); angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemConfig {
    pub bitmap_file: String,
    pub sound_fx_file: String,
    /// Launch every slot on the first frame instead of staggering them over one lifetime
    pub all_at_once: bool,
    pub bounding_sphere: f32,
    pub alpha_mode: AlphaMode,
    pub particle_count: usize,
    pub gravity: Vec2,
    pub direction: Vec2,
    pub randomize_dir: Vec2,
    pub start_point: Vec3,
    pub rand_start_point: Vec2,
    /// Sprite sheet columns and rows
    pub sprite_cut: UVec2,
    pub color0: Vec4,
    pub color1: Vec4,
    pub lifetime: f32,
    pub randomize_lifetime: f32,
    pub angle_dir: f32,
    pub rand_angle: f32,
    pub size: f32,
    pub randomize_size: f32,
    pub growth: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Lifecycles per slot; 0 means endless
    pub repeat: u32,
    pub animation_mode: AnimationMode,
    pub emissive: Vec3,
    pub angle_start: f32,
    pub rand_angle_start: f32,
}

impl Default for ParticleSystemConfig {
    fn default() -> Self {
        Self {
            bitmap_file: String::new(),
            sound_fx_file: String::new(),
            all_at_once: false,
            bounding_sphere: 256.0,
            alpha_mode: AlphaMode::Pixel,
            particle_count: 0,
            gravity: Vec2::ZERO,
            direction: Vec2::ZERO,
            randomize_dir: Vec2::ZERO,
            start_point: Vec3::ZERO,
            rand_start_point: Vec2::ZERO,
            sprite_cut: UVec2::ONE,
            color0: Vec4::ONE,
            color1: Vec4::ONE,
            lifetime: 1000.0,
            randomize_lifetime: 0.0,
            angle_dir: 0.0,
            rand_angle: 0.0,
            size: 16.0,
            randomize_size: 0.0,
            growth: 0.0,
            min_size: 0.0,
            max_size: 1.0e6,
            repeat: 0,
            animation_mode: AnimationMode::PlayAnimation,
            emissive: Vec3::ZERO,
            angle_start: 0.0,
            rand_angle_start: 0.0,
        }
    }
}

impl ParticleSystemConfig {
    /// Parse a configuration from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse a configuration from an already-parsed TOML table
    pub fn from_toml_table(table: toml::value::Table) -> Result<Self> {
        Ok(toml::Value::Table(table).try_into()?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn is_endless(&self) -> bool {
        self.repeat == 0
    }

    /// Number of frames in the sprite sheet (never zero)
    pub fn num_frames(&self) -> u32 {
        (self.sprite_cut.x.max(1)).saturating_mul(self.sprite_cut.y.max(1))
    }

    /// The bitmap to request from the sprite service after default and suffix substitution
    pub fn actual_bitmap_file(&self, rules: &[SuffixRule]) -> String {
        let file = if self.bitmap_file.is_empty() {
            DEFAULT_PARTICLE_BITMAP
        } else {
            self.bitmap_file.as_str()
        };
        rules
            .iter()
            .find_map(|rule| rule.apply(file))
            .unwrap_or_else(|| file.to_string())
    }

    /// Clamp malformed values in place, returning a description of each fix
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();

        if self.particle_count > MAX_PARTICLES {
            fixes.push(format!(
                "particle_count {} capped to {MAX_PARTICLES}",
                self.particle_count
            ));
            self.particle_count = MAX_PARTICLES;
        }
        if self.sprite_cut.x == 0 || self.sprite_cut.y == 0 {
            fixes.push(format!(
                "sprite_cut [{}, {}] raised to at least 1",
                self.sprite_cut.x, self.sprite_cut.y
            ));
            self.sprite_cut = self.sprite_cut.max(UVec2::ONE);
        }
        if self.min_size < 0.0 {
            fixes.push(format!("min_size {} raised to 0", self.min_size));
            self.min_size = 0.0;
        }
        if self.min_size > self.max_size {
            fixes.push(format!(
                "min_size {} and max_size {} swapped",
                self.min_size, self.max_size
            ));
            std::mem::swap(&mut self.min_size, &mut self.max_size);
        }
        if self.randomize_lifetime < 0.0 {
            fixes.push("randomize_lifetime made non-negative".to_string());
            self.randomize_lifetime = self.randomize_lifetime.abs();
        }
        if self.randomize_size < 0.0 {
            fixes.push("randomize_size made non-negative".to_string());
            self.randomize_size = self.randomize_size.abs();
        }
        if self.bounding_sphere < 0.0 {
            fixes.push("bounding_sphere made non-negative".to_string());
            self.bounding_sphere = self.bounding_sphere.abs();
        }

        fixes
    }

    /// Uniformly scale every spatial quantity
    pub fn scale(&mut self, scale: f32) {
        self.gravity *= scale;
        self.direction *= scale;
        self.randomize_dir *= scale;
        self.start_point *= scale;
        self.rand_start_point *= scale;
        self.size *= scale;
        self.randomize_size *= scale;
        self.growth *= scale;
        self.min_size *= scale;
        self.max_size *= scale;
        self.bounding_sphere *= scale;
    }

    pub fn mirror_x(&mut self, mirror_gravity: bool) {
        self.direction.x = -self.direction.x;
        self.randomize_dir.x = -self.randomize_dir.x;
        self.start_point.x = -self.start_point.x;
        self.rand_start_point.x = -self.rand_start_point.x;
        if mirror_gravity {
            self.gravity.x = -self.gravity.x;
        }
    }

    pub fn mirror_y(&mut self, mirror_gravity: bool) {
        self.direction.y = -self.direction.y;
        self.randomize_dir.y = -self.randomize_dir.y;
        self.start_point.y = -self.start_point.y;
        self.rand_start_point.y = -self.rand_start_point.y;
        if mirror_gravity {
            self.gravity.y = -self.gravity.y;
        }
    }
}
