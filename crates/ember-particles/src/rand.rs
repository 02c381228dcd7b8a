//! Lightweight xorshift32 PRNG used for per-particle sampling

use glam::Vec2;

pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns a float in [-amount, amount); zero spread returns exactly zero
    pub fn spread(&mut self, amount: f32) -> f32 {
        if amount == 0.0 {
            return 0.0;
        }
        let amount = amount.abs();
        self.range(-amount, amount)
    }

    /// Per-axis `spread`
    pub fn spread_vec2(&mut self, amount: Vec2) -> Vec2 {
        Vec2::new(self.spread(amount.x), self.spread(amount.y))
    }

    /// Uniform index in [0, count); 0 when `count` is 0
    pub fn index(&mut self, count: u32) -> u32 {
        if count == 0 {
            return 0;
        }
        self.next_u32() % count
    }
}
