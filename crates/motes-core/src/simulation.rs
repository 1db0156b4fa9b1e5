//! Per-frame drift update.

use glam::Vec3;
use rand::Rng;

use crate::field::{centered, ParticleField};
use crate::params::Parameters;

/// Coordinates beyond this magnitude bounce back.
pub const BOUNDARY: f32 = 30.0;

/// Applied to a coordinate that crossed the boundary: flips it to the other
/// side and pulls it slightly inward.
pub const BOUNCE_FACTOR: f32 = -0.95;

/// Per-axis velocity kick, before scaling by the speed factor.
pub const VELOCITY_JITTER: f32 = 0.025;

/// Ties a speed factor around 0.01 to visually pleasant motion.
pub const INTEGRATION_SCALE: f32 = 100.0;

/// Advance every particle by one frame.
///
/// The velocity kick is not scaled by `dt`; only the position integration is.
/// Particles do not interact, so iteration order is irrelevant.
pub fn step<R: Rng + ?Sized>(field: &mut ParticleField, params: &Parameters, dt: f32, rng: &mut R) {
    let speed = params.speed_factor;
    let (positions, velocities) = field.motion_mut();

    for (position, velocity) in positions.iter_mut().zip(velocities.iter_mut()) {
        let kick = Vec3::new(
            centered(rng, VELOCITY_JITTER),
            centered(rng, VELOCITY_JITTER),
            centered(rng, VELOCITY_JITTER),
        );
        *velocity += kick * speed;
        *position += *velocity * dt * INTEGRATION_SCALE * speed;
        *position = bounce(*position);
    }
}

/// Multiplicative reversal, per axis. Not a reflection about the boundary plane.
#[inline]
pub fn bounce(position: Vec3) -> Vec3 {
    let outside = position.abs().cmpgt(Vec3::splat(BOUNDARY));
    Vec3::select(outside, position * BOUNCE_FACTOR, position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn single(position: Vec3, velocity: Vec3) -> ParticleField {
        ParticleField::from_parts(vec![position], vec![Color::BLACK], vec![velocity], 0.1).unwrap()
    }

    fn params_with_speed(speed_factor: f32) -> Parameters {
        Parameters {
            speed_factor,
            ..Parameters::default()
        }
    }

    #[test]
    fn test_bounce_only_touches_outside_axes() {
        let bounced = bounce(Vec3::new(31.0, 30.0, -40.0));
        assert!((bounced.x - -29.45).abs() < 1e-4);
        assert_eq!(bounced.y, 30.0);
        assert!((bounced.z - 38.0).abs() < 1e-4);
    }

    #[test]
    fn test_step_bounces_after_integration() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut field = single(Vec3::new(31.0, 0.0, 0.0), Vec3::ZERO);
        step(&mut field, &params_with_speed(0.0), 1.0 / 60.0, &mut rng);

        let p = field.positions()[0];
        assert!((p.x - -29.45).abs() < 1e-4);
        assert_eq!(p.y, 0.0);
        assert_eq!(field.velocities()[0], Vec3::ZERO);
    }

    #[test]
    fn test_step_integrates_velocity() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut field = single(Vec3::ZERO, Vec3::new(0.05, 0.0, -0.05));
        let speed = 0.01;
        let dt = 0.5;
        step(&mut field, &params_with_speed(speed), dt, &mut rng);

        // The kick is at most VELOCITY_JITTER * speed, so the integrated
        // position is within that much of the unperturbed result.
        let v = field.velocities()[0];
        assert!((v.x - 0.05).abs() <= VELOCITY_JITTER * speed);
        assert!((v.z + 0.05).abs() <= VELOCITY_JITTER * speed);

        let p = field.positions()[0];
        let expected = v * dt * INTEGRATION_SCALE * speed;
        assert!((p - expected).length() < 1e-6);
    }

    #[test]
    fn test_zero_dt_only_kicks_velocity() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut field = single(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        step(&mut field, &params_with_speed(1.0), 0.0, &mut rng);

        assert_eq!(field.positions()[0], Vec3::new(1.0, 2.0, 3.0));
        assert!(field.velocities()[0].abs().max_element() <= VELOCITY_JITTER);
    }

    #[test]
    fn test_many_steps_stay_inside_boundary() {
        let mut rng = SmallRng::seed_from_u64(17);
        let mut field = ParticleField::regenerate(500, Color::BLACK, 0.1, &mut rng);
        let params = params_with_speed(0.01);
        for _ in 0..600 {
            step(&mut field, &params, 1.0 / 60.0, &mut rng);
        }
        for p in field.positions() {
            assert!(p.abs().max_element() <= BOUNDARY);
        }
    }
}
