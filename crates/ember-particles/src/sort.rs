//! Back-to-front ordering of active particles
//!
//! Active slots are ordered by ascending `(offset, id)`. The id component keeps
//! equal-offset particles in slot order. Insertion sort over a reused index buffer:
//! O(n²) worst case, close to linear when frame-to-frame order barely changes.
//! Any stable sort over the same composite key produces the same order.

use crate::particle::Particle;
use std::cmp::Ordering;

#[derive(Debug, Default)]
pub struct DepthSorter {
    order: Vec<usize>,
}

impl DepthSorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
        }
    }

    /// Sort the active particles, returning their slot indices in draw order
    pub fn sort(&mut self, particles: &[Particle]) -> &[usize] {
        self.order.clear();
        self.order.extend(
            particles
                .iter()
                .enumerate()
                .filter(|(_, p)| p.active)
                .map(|(i, _)| i),
        );

        for i in 1..self.order.len() {
            let mut j = i;
            while j > 0
                && draw_cmp(&particles[self.order[j - 1]], &particles[self.order[j]])
                    == Ordering::Greater
            {
                self.order.swap(j - 1, j);
                j -= 1;
            }
        }

        &self.order
    }

    /// Draw order computed by the last `sort` call
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

fn draw_cmp(a: &Particle, b: &Particle) -> Ordering {
    sort_key(a)
        .total_cmp(&sort_key(b))
        .then_with(|| a.id.cmp(&b.id))
}

/// Offset with -0.0 folded into +0.0, so equal offsets tie on id
fn sort_key(particle: &Particle) -> f32 {
    particle.offset() + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn pool(offsets: &[f32]) -> Vec<Particle> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| {
                let mut p = Particle::new(i);
                p.active = true;
                p.position = Vec2::new(0.0, -offset);
                p
            })
            .collect()
    }

    #[test]
    fn orders_by_ascending_offset() {
        let particles = pool(&[5.0, -1.0, 3.0, 0.0]);
        let mut sorter = DepthSorter::new();
        assert_eq!(sorter.sort(&particles), &[1, 3, 2, 0]);
    }

    #[test]
    fn equal_offsets_keep_slot_order() {
        let particles = pool(&[2.0, 1.0, 2.0, 1.0, 2.0]);
        let mut sorter = DepthSorter::new();
        assert_eq!(sorter.sort(&particles), &[1, 3, 0, 2, 4]);
    }

    #[test]
    fn signed_zero_offsets_tie_on_slot_order() {
        let mut particles = pool(&[0.0, 0.0]);
        particles[1].start_point.y = -0.0;
        particles[1].position.y = 0.0;
        assert!(particles[0].offset().is_sign_positive());
        assert!(particles[1].offset().is_sign_negative());

        let mut sorter = DepthSorter::new();
        assert_eq!(sorter.sort(&particles), &[0, 1]);
    }

    #[test]
    fn inactive_slots_are_skipped() {
        let mut particles = pool(&[3.0, 2.0, 1.0]);
        particles[1].active = false;
        let mut sorter = DepthSorter::with_capacity(3);
        assert_eq!(sorter.sort(&particles), &[2, 0]);
        assert_eq!(sorter.order(), &[2, 0]);
    }

    #[test]
    fn matches_std_stable_sort() {
        let offsets: Vec<f32> = (0..64).map(|i| ((i * 37) % 11) as f32 - 5.0).collect();
        let particles = pool(&offsets);
        let mut expected: Vec<usize> = (0..particles.len()).collect();
        expected.sort_by(|&a, &b| particles[a].offset().total_cmp(&particles[b].offset()));

        let mut sorter = DepthSorter::new();
        assert_eq!(sorter.sort(&particles), expected.as_slice());
    }
}
