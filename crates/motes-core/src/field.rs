//! Per-particle buffers and the regeneration that replaces them wholesale.

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::color::Color;

/// Half-extent of the cube particles are scattered in on regeneration.
pub const SPREAD: f32 = 30.0;

/// Initial velocity components are drawn from `-MAX_INITIAL_VELOCITY..MAX_INITIAL_VELOCITY`.
pub const MAX_INITIAL_VELOCITY: f32 = 0.05;

const HUE_JITTER: f32 = 0.1;
const SATURATION_JITTER: f32 = 0.05;
const LIGHTNESS_JITTER: f32 = 0.05;

/// Uniform sample in `[-half_extent, half_extent)`.
pub(crate) fn centered<R: Rng + ?Sized>(rng: &mut R, half_extent: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * half_extent
}

/// Point sprite settings shared by every particle of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMaterial {
    pub size: f32,
    needs_update: bool,
}

impl PointMaterial {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            needs_update: false,
        }
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }
}

/// Parallel position/color/velocity arrays for one particle cloud.
///
/// All three arrays always have the same length. A field is never resized;
/// changing the count or the base color builds a new one.
#[derive(Debug, Clone)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    colors: Vec<Color>,
    velocities: Vec<Vec3>,
    material: PointMaterial,
    generation: u64,
}

impl ParticleField {
    /// Scatter `count` particles over `[-SPREAD, SPREAD]` on each axis.
    pub fn regenerate<R: Rng + ?Sized>(
        count: u32,
        base_color: Color,
        point_size: f32,
        rng: &mut R,
    ) -> Self {
        Self::regenerate_with_spread(count, base_color, point_size, SPREAD, rng)
    }

    pub fn regenerate_with_spread<R: Rng + ?Sized>(
        count: u32,
        base_color: Color,
        point_size: f32,
        spread: f32,
        rng: &mut R,
    ) -> Self {
        let count = count as usize;
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);

        for _ in 0..count {
            positions.push(Vec3::new(
                centered(rng, spread),
                centered(rng, spread),
                centered(rng, spread),
            ));
            colors.push(base_color.offset_hsl(
                centered(rng, HUE_JITTER),
                centered(rng, SATURATION_JITTER),
                centered(rng, LIGHTNESS_JITTER),
            ));
            velocities.push(Vec3::new(
                centered(rng, MAX_INITIAL_VELOCITY),
                centered(rng, MAX_INITIAL_VELOCITY),
                centered(rng, MAX_INITIAL_VELOCITY),
            ));
        }

        debug!(count, %base_color, spread, "particle field regenerated");

        Self {
            positions,
            colors,
            velocities,
            material: PointMaterial::new(point_size),
            generation: 0,
        }
    }

    /// Assemble a field from existing buffers. Returns `None` when the
    /// lengths disagree.
    pub fn from_parts(
        positions: Vec<Vec3>,
        colors: Vec<Color>,
        velocities: Vec<Vec3>,
        point_size: f32,
    ) -> Option<Self> {
        if positions.len() != colors.len() || positions.len() != velocities.len() {
            return None;
        }
        Some(Self {
            positions,
            colors,
            velocities,
            material: PointMaterial::new(point_size),
            generation: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Positions as flat xyz triples, ready for upload.
    pub fn position_buffer(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as flat rgb triples, ready for upload.
    pub fn color_buffer(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn material(&self) -> &PointMaterial {
        &self.material
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Live size change; the renderer sees it on the next frame.
    pub fn set_size(&mut self, size: f32) {
        self.material.size = size;
        self.material.needs_update = true;
    }

    /// Clears and returns the pending size-update flag.
    pub(crate) fn take_size_update(&mut self) -> bool {
        std::mem::take(&mut self.material.needs_update)
    }

    pub(crate) fn motion_mut(&mut self) -> (&mut [Vec3], &mut [Vec3]) {
        (&mut self.positions, &mut self.velocities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_regenerate_count_and_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        let field = ParticleField::regenerate(1000, Color::from_hex(0x00ffaa), 0.1, &mut rng);

        assert_eq!(field.len(), 1000);
        assert_eq!(field.colors().len(), 1000);
        assert_eq!(field.velocities().len(), 1000);

        for p in field.positions() {
            assert!(p.abs().max_element() <= SPREAD);
        }
        for v in field.velocities() {
            assert!(v.abs().max_element() <= MAX_INITIAL_VELOCITY);
        }
        for c in field.colors() {
            assert!(c.is_normalized(), "{c:?} out of range");
        }
    }

    #[test]
    fn test_color_jitter_stays_near_base() {
        let mut rng = SmallRng::seed_from_u64(11);
        let base = Color::new(0.5, 0.5, 0.5);
        let field = ParticleField::regenerate(200, base, 0.1, &mut rng);
        // Gray has no saturation to start from, so only lightness and a
        // little saturation can move it.
        for c in field.colors() {
            let (_, s, l) = c.to_hsl();
            assert!(s <= SATURATION_JITTER + 1e-4);
            assert!((l - 0.5).abs() <= LIGHTNESS_JITTER + 1e-4);
        }
    }

    #[test]
    fn test_set_size_flags_update() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut field = ParticleField::regenerate(10, Color::BLACK, 0.1, &mut rng);
        let before = field.positions().to_vec();

        assert!(!field.material().needs_update());
        field.set_size(0.5);
        assert_eq!(field.material().size, 0.5);
        assert!(field.take_size_update());
        assert!(!field.take_size_update());
        assert_eq!(field.positions(), before.as_slice());
    }

    #[test]
    fn test_buffers_match_vectors() {
        let field = ParticleField::from_parts(
            vec![Vec3::new(1.0, 2.0, 3.0)],
            vec![Color::new(0.25, 0.5, 0.75)],
            vec![Vec3::ZERO],
            0.1,
        )
        .unwrap();
        assert_eq!(field.position_buffer(), &[[1.0, 2.0, 3.0]]);
        assert_eq!(field.color_buffer(), &[[0.25, 0.5, 0.75]]);
    }

    #[test]
    fn test_from_parts_rejects_mismatched_lengths() {
        let field = ParticleField::from_parts(vec![Vec3::ZERO; 2], vec![Color::BLACK], vec![Vec3::ZERO; 2], 0.1);
        assert!(field.is_none());
    }
}
