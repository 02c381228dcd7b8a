//! Particle records and the fixed-capacity slot pool that recycles them

use glam::{Vec2, Vec3, Vec4};

/// Mutable state of one particle slot
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub direction: Vec2,
    pub color: Vec4,
    /// Where this life started; `z` carries the layer height
    pub start_point: Vec3,
    pub angle: f32,
    pub angle_dir: f32,
    pub size: f32,
    pub lifetime: f32,
    pub elapsed: f32,
    /// Completed lifecycles of this slot
    pub repeat: u32,
    pub active: bool,
    pub current_frame: u32,
    /// Animation step the current frame was picked for
    pub frame_step: u32,
    /// Slot index, stable for the lifetime of the pool
    pub id: usize,
}

impl Particle {
    pub fn new(id: usize) -> Self {
        Self {
            position: Vec2::ZERO,
            direction: Vec2::ZERO,
            color: Vec4::ONE,
            start_point: Vec3::ZERO,
            angle: 0.0,
            angle_dir: 0.0,
            size: 0.0,
            lifetime: 0.0,
            elapsed: 0.0,
            repeat: 0,
            active: false,
            current_frame: 0,
            frame_step: 0,
            id,
        }
    }

    /// Depth proxy: how far the particle travelled up from where it started
    pub fn offset(&self) -> f32 {
        self.start_point.y - self.position.y
    }

    /// Normalized age in [0, 1]
    pub fn age_ratio(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.lifetime).clamp(0.0, 1.0)
        }
    }

    pub fn scale(&mut self, scale: f32) {
        self.size *= scale;
        self.direction *= scale;
    }
}

/// Fixed set of particle slots. Slots are never added or removed after construction;
/// they flip between active and inactive as they are recycled.
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: (0..capacity).map(Particle::new).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    /// Smallest repeat count across all slots (0 for an empty pool)
    pub fn min_repeat(&self) -> u32 {
        self.particles.iter().map(|p| p.repeat).min().unwrap_or(0)
    }

    pub fn slots(&self) -> &[Particle] {
        &self.particles
    }

    pub fn slots_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_slots_start_inactive_with_stable_ids() {
        let pool = ParticlePool::new(4);
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.active_count(), 0);
        for (i, p) in pool.slots().iter().enumerate() {
            assert_eq!(p.id, i);
            assert!(!p.active);
        }
    }

    #[test]
    fn active_count_and_min_repeat() {
        let mut pool = ParticlePool::new(3);
        pool.slots_mut()[0].active = true;
        pool.slots_mut()[2].active = true;
        pool.slots_mut()[0].repeat = 5;
        pool.slots_mut()[1].repeat = 2;
        pool.slots_mut()[2].repeat = 3;
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.min_repeat(), 2);
        assert_eq!(ParticlePool::new(0).min_repeat(), 0);
    }

    #[test]
    fn offset_grows_as_particle_rises() {
        let mut p = Particle::new(0);
        p.start_point = Vec3::new(0.0, 100.0, 0.0);
        p.position = Vec2::new(0.0, 60.0);
        assert!((p.offset() - 40.0).abs() < 1e-6);
    }

    #[test]
    fn scale_affects_size_and_direction() {
        let mut p = Particle::new(0);
        p.size = 4.0;
        p.direction = Vec2::new(1.0, -2.0);
        p.lifetime = 300.0;
        p.scale(0.5);
        assert_eq!(p.size, 2.0);
        assert_eq!(p.direction, Vec2::new(0.5, -1.0));
        assert_eq!(p.lifetime, 300.0);
    }

    #[test]
    fn age_ratio_clamps() {
        let mut p = Particle::new(0);
        assert_eq!(p.age_ratio(), 1.0);
        p.lifetime = 100.0;
        p.elapsed = 25.0;
        assert!((p.age_ratio() - 0.25).abs() < 1e-6);
        p.elapsed = 250.0;
        assert_eq!(p.age_ratio(), 1.0);
    }
}
