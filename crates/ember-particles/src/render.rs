//! Draw-call description and the sprite renderer seam

use crate::backend::Sprite;
use crate::config::AlphaMode;
use glam::{UVec2, Vec2, Vec3, Vec4};

/// Height added to the system layer before it is mapped into depth space
pub const PARTICLE_DEPTH_SHIFT: f32 = 10.0;

/// Depth added per draw rank in `DepthSortMode::Layerable`
pub const LAYER_STEP: f32 = 1.0e-5;

/// How per-particle draw depth is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthSortMode {
    /// Each particle's own height and offset, mapped between min and max height
    #[default]
    IndividualOffset,
    /// One depth for the whole system plus a small per-rank shift
    Layerable,
    /// Every particle at the owner's depth
    SameDepthAsOwner,
}

/// Per-frame draw inputs supplied by the owning entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub ambient: Vec3,
    pub max_height: f32,
    pub min_height: f32,
    pub sort_mode: DepthSortMode,
    /// Screen-space direction one unit of height moves a sprite
    pub z_axis_direction: Vec2,
    pub parallax_offset: Vec2,
    pub owner_depth: f32,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            ambient: Vec3::ONE,
            max_height: 1.0,
            min_height: 0.0,
            sort_mode: DepthSortMode::IndividualOffset,
            z_axis_direction: Vec2::new(0.0, -1.0),
            parallax_offset: Vec2::ZERO,
            owner_depth: 0.0,
        }
    }
}

/// Normalized sub-rectangle of a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl FrameRect {
    pub const FULL: Self = Self {
        origin: Vec2::ZERO,
        size: Vec2::ONE,
    };

    /// Rectangle of `frame` in a sheet cut into `cut.x` columns and `cut.y` rows,
    /// frames numbered row-major. Out-of-range frames wrap.
    pub fn for_frame(frame: u32, cut: UVec2) -> Self {
        let cut = cut.max(UVec2::ONE);
        let frame = frame % (cut.x * cut.y);
        let size = Vec2::ONE / cut.as_vec2();
        let cell = Vec2::new((frame % cut.x) as f32, (frame / cut.x) as f32);
        Self {
            origin: cell * size,
            size,
        }
    }
}

/// One sprite submission
#[derive(Debug, Clone, Copy)]
pub struct SpriteDraw<'a> {
    pub sprite: &'a Sprite,
    /// Identity of the particle slot being drawn
    pub id: usize,
    pub position: Vec2,
    pub size: f32,
    /// Degrees
    pub angle: f32,
    pub color: Vec4,
    pub depth: f32,
    pub frame: u32,
    pub rect: FrameRect,
}

/// Receives sprite submissions inside a scene the caller has already opened
pub trait SpriteRenderer {
    fn set_alpha_mode(&mut self, _mode: AlphaMode) {}

    fn submit_sprite(&mut self, draw: &SpriteDraw<'_>);
}
