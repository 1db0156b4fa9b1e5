//! Runtime-tunable parameters and their reset snapshot.

use crate::color::Color;

/// Upper bound on particle count.
pub const MAX_PARTICLES: u32 = 20_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub particle_count: u32,
    pub speed_factor: f32,
    pub base_color: Color,
    pub particle_size: f32,
    pub background_color: Color,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            particle_count: 5000,
            speed_factor: 0.01,
            base_color: Color::from_hex(0x00ffaa),
            particle_size: 0.1,
            background_color: Color::from_hex(0x111111),
        }
    }
}

pub fn is_valid_particle_count(count: u32) -> bool {
    (1..=MAX_PARTICLES).contains(&count)
}

pub fn is_valid_speed_factor(speed: f32) -> bool {
    speed.is_finite() && speed >= 0.0
}

pub fn is_valid_particle_size(size: f32) -> bool {
    size.is_finite() && size > 0.0
}

/// The live parameter set plus the snapshot `reset` restores.
///
/// Setters do not validate; callers check ranges with the `is_valid_*`
/// helpers first.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    current: Parameters,
    defaults: Parameters,
}

impl ParameterStore {
    pub fn new(defaults: Parameters) -> Self {
        Self {
            current: defaults,
            defaults,
        }
    }

    pub fn get(&self) -> &Parameters {
        &self.current
    }

    pub fn defaults(&self) -> &Parameters {
        &self.defaults
    }

    pub fn set_particle_count(&mut self, count: u32) {
        self.current.particle_count = count;
    }

    pub fn set_speed_factor(&mut self, speed: f32) {
        self.current.speed_factor = speed;
    }

    pub fn set_base_color(&mut self, color: Color) {
        self.current.base_color = color;
    }

    pub fn set_particle_size(&mut self, size: f32) {
        self.current.particle_size = size;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.current.background_color = color;
    }

    pub fn reset(&mut self) {
        self.current = self.defaults;
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}
