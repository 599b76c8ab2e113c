use cubefield_common::Rgb;
use glam::{Vec2, Vec3};
use rand::Rng;

use crate::scene::SceneState;

/// Upper bound for randomly chosen box dimensions.
pub const MAX_PARTICLE_EXTENT: f32 = 10.0;

/// Spawn-time descriptor for a box: size and color. Not retained once the
/// box exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub color: Rgb,
}

impl Particle {
    /// Build a particle, drawing any unspecified dimension uniformly from
    /// `[0, MAX_PARTICLE_EXTENT)`. The color is always random.
    pub fn new<R: Rng>(
        rng: &mut R,
        width: Option<f32>,
        height: Option<f32>,
        depth: Option<f32>,
    ) -> Self {
        let mut extent = |given: Option<f32>| {
            given.unwrap_or_else(|| rng.random::<f32>() * MAX_PARTICLE_EXTENT)
        };
        let width = extent(width);
        let height = extent(height);
        let depth = extent(depth);
        Self {
            width,
            height,
            depth,
            color: Rgb::new(rng.random_range(0..=0x00ff_ffff)),
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::new(rng, None, None, None)
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// Places batches of random boxes on the plane until a ceiling is reached.
#[derive(Debug, Clone)]
pub struct Spawner {
    plane: Vec2,
    ceiling: usize,
    batch_size: usize,
}

impl Spawner {
    pub fn new(plane: Vec2, ceiling: usize, batch_size: usize) -> Self {
        Self {
            plane,
            ceiling,
            batch_size,
        }
    }

    /// Resting position for a particle: uniform over the plane, sitting on it.
    pub fn position_for<R: Rng>(&self, particle: &Particle, rng: &mut R) -> Vec3 {
        let x = -self.plane.x / 2.0 + rng.random::<f32>() * self.plane.x;
        let z = -self.plane.y / 2.0 + rng.random::<f32>() * self.plane.y;
        Vec3::new(x, particle.height / 2.0, z)
    }

    /// Spawn one batch, truncated so the scene never exceeds the ceiling.
    /// Returns the number of boxes added.
    pub fn spawn_batch<R: Rng>(&self, scene: &mut SceneState, rng: &mut R) -> usize {
        let room = self.ceiling.saturating_sub(scene.box_count());
        let count = self.batch_size.min(room);
        if count == 0 {
            return 0;
        }
        let batch: Vec<(Particle, Vec3)> = (0..count)
            .map(|_| {
                let particle = Particle::random(rng);
                let position = self.position_for(&particle, rng);
                (particle, position)
            })
            .collect();
        let added = scene.spawn_boxes(batch);
        tracing::debug!(added, total = scene.box_count(), "spawned batch");
        added
    }

    /// Run up to `max_batches` batches while the scene is below the ceiling.
    pub fn fill<R: Rng>(
        &self,
        scene: &mut SceneState,
        rng: &mut R,
        max_batches: usize,
    ) -> usize {
        let mut added = 0;
        for _ in 0..max_batches {
            let n = self.spawn_batch(scene, rng);
            if n == 0 {
                break;
            }
            added += n;
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LightRig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const PLANE: Vec2 = Vec2::new(600.0, 400.0);

    fn scene() -> SceneState {
        SceneState::new(PLANE, LightRig::for_plane(PLANE, Rgb::BLACK, Rgb::WHITE))
    }

    #[test]
    fn particle_dimensions_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let p = Particle::random(&mut rng);
            for d in [p.width, p.height, p.depth] {
                assert!((0.0..MAX_PARTICLE_EXTENT).contains(&d));
            }
            assert!(p.color.0 <= 0xffffff);
        }
    }

    #[test]
    fn particle_keeps_given_dimensions() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = Particle::new(&mut rng, Some(1.5), None, Some(3.0));
        assert_eq!(p.width, 1.5);
        assert_eq!(p.depth, 3.0);
        assert!((0.0..MAX_PARTICLE_EXTENT).contains(&p.height));
    }

    #[test]
    fn batch_rests_on_plane() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = scene();
        let spawner = Spawner::new(PLANE, 1000, 100);
        assert_eq!(spawner.spawn_batch(&mut s, &mut rng), 100);
        for b in s.boxes() {
            let p = b.transform.position;
            assert!((-300.0..=300.0).contains(&p.x), "x out of range: {}", p.x);
            assert!((-200.0..=200.0).contains(&p.z), "z out of range: {}", p.z);
            assert_eq!(p.y, b.size.y / 2.0);
        }
    }

    #[test]
    fn batch_truncated_at_ceiling() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut s = scene();
        let spawner = Spawner::new(PLANE, 150, 100);
        assert_eq!(spawner.spawn_batch(&mut s, &mut rng), 100);
        assert_eq!(spawner.spawn_batch(&mut s, &mut rng), 50);
        assert_eq!(spawner.spawn_batch(&mut s, &mut rng), 0);
        assert_eq!(s.box_count(), 150);
    }

    #[test]
    fn fill_stops_at_ceiling() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = scene();
        let spawner = Spawner::new(PLANE, 1000, 100);
        assert_eq!(spawner.fill(&mut s, &mut rng, 3), 300);
        assert_eq!(spawner.fill(&mut s, &mut rng, 100), 700);
        assert_eq!(s.box_count(), 1000);
        assert_eq!(spawner.fill(&mut s, &mut rng, 100), 0);
    }
}
