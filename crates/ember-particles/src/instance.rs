//! GPU instance packing: a `SpriteRenderer` that fills an instance buffer

use crate::config::AlphaMode;
use crate::render::{SpriteDraw, SpriteRenderer};
use bytemuck::{Pod, Zeroable};

/// GPU instance data for one particle sprite.
/// 48-byte stride (3 rows of vec4), 4-byte aligned.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SpriteInstance {
    pub pos_depth_size: [f32; 4],  // xy = screen position, z = depth, w = size
    pub color: [f32; 4],           // rgba
    pub rotation_frame: [f32; 4],  // x = rotation (radians), y = frame, zw = frame rect size (uv)
}

impl SpriteInstance {
    pub fn from_draw(draw: &SpriteDraw<'_>) -> Self {
        Self {
            pos_depth_size: [draw.position.x, draw.position.y, draw.depth, draw.size],
            color: draw.color.to_array(),
            rotation_frame: [
                draw.angle.to_radians(),
                draw.frame as f32,
                draw.rect.size.x,
                draw.rect.size.y,
            ],
        }
    }
}

/// Collects submitted sprites for a single instanced draw call
#[derive(Debug, Default)]
pub struct InstanceBatch {
    instances: Vec<SpriteInstance>,
    alpha_mode: AlphaMode,
    texture: Option<String>,
}

impl InstanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Forget the previous frame, keeping the allocation
    pub fn clear(&mut self) {
        self.instances.clear();
        self.texture = None;
    }

    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    /// Instance data as raw bytes, ready for a buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    /// Bitmap the batch was drawn with
    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl SpriteRenderer for InstanceBatch {
    fn set_alpha_mode(&mut self, mode: AlphaMode) {
        self.alpha_mode = mode;
    }

    fn submit_sprite(&mut self, draw: &SpriteDraw<'_>) {
        if self.texture.as_deref() != Some(draw.sprite.name.as_str()) {
            if self.texture.is_some() {
                log::warn!(
                    "instance batch mixes bitmaps '{}' and '{}'",
                    self.texture.as_deref().unwrap_or_default(),
                    draw.sprite.name
                );
            }
            self.texture = Some(draw.sprite.name.clone());
        }
        self.instances.push(SpriteInstance::from_draw(draw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Sprite;
    use crate::render::FrameRect;
    use glam::{UVec2, Vec2, Vec4};

    #[test]
    fn sprite_instance_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 48);
        assert_eq!(std::mem::align_of::<SpriteInstance>(), 4);
    }

    #[test]
    fn batch_packs_submissions() {
        let sprite = Sprite {
            name: "spark.png".into(),
            size: Vec2::splat(32.0),
        };
        let mut batch = InstanceBatch::with_capacity(2);
        batch.set_alpha_mode(AlphaMode::Add);
        for i in 0..2 {
            batch.submit_sprite(&SpriteDraw {
                sprite: &sprite,
                id: i,
                position: Vec2::new(i as f32, 2.0),
                size: 8.0,
                angle: 180.0,
                color: Vec4::new(1.0, 0.5, 0.25, 1.0),
                depth: 0.5,
                frame: 3,
                rect: FrameRect::for_frame(3, UVec2::new(2, 2)),
            });
        }

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.alpha_mode(), AlphaMode::Add);
        assert_eq!(batch.texture(), Some("spark.png"));
        assert_eq!(batch.as_bytes().len(), 96);

        let second = batch.instances()[1];
        assert_eq!(second.pos_depth_size, [1.0, 2.0, 0.5, 8.0]);
        assert!((second.rotation_frame[0] - std::f32::consts::PI).abs() < 1e-5);
        assert_eq!(second.rotation_frame[1], 3.0);
        assert_eq!(&second.rotation_frame[2..], &[0.5, 0.5]);

        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.texture(), None);
    }
}
