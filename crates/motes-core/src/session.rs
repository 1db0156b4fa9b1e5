//! The coordinating context hosts drive once per frame and once per command.

use motes_platform::{FrameView, Renderer};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::MotesConfig;
use crate::error::ConfigError;
use crate::field::ParticleField;
use crate::params::{ParameterStore, Parameters};
use crate::simulation;

/// Owns everything a running visualization mutates: the parameters, the
/// current particle field and the RNG.
///
/// Hosts drive it from a single thread: [`Session::execute`] for console
/// input, [`Session::tick`] then [`Session::render`] once per frame. A
/// command always completes before the next tick sees its effects.
pub struct Session {
    params: ParameterStore,
    field: ParticleField,
    generations: u64,
    rng: SmallRng,
}

impl Session {
    /// Seeded from OS entropy.
    pub fn new(defaults: Parameters) -> Self {
        Self::with_rng(defaults, SmallRng::from_entropy())
    }

    /// Reproducible session for a given seed.
    pub fn with_seed(defaults: Parameters, seed: u64) -> Self {
        Self::with_rng(defaults, SmallRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &MotesConfig) -> Result<Self, ConfigError> {
        let defaults = config.parameters()?;
        Ok(match config.simulation.seed {
            Some(seed) => Self::with_seed(defaults, seed),
            None => Self::new(defaults),
        })
    }

    fn with_rng(defaults: Parameters, mut rng: SmallRng) -> Self {
        let field = ParticleField::regenerate(
            defaults.particle_count,
            defaults.base_color,
            defaults.particle_size,
            &mut rng,
        )
        .with_generation(1);
        Self {
            params: ParameterStore::new(defaults),
            field,
            generations: 1,
            rng,
        }
    }

    pub fn params(&self) -> &Parameters {
        self.params.get()
    }

    pub fn store(&self) -> &ParameterStore {
        &self.params
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Swap in a prepared field, e.g. a hand-placed one.
    pub fn replace_field(&mut self, field: ParticleField) {
        self.generations += 1;
        self.field = field.with_generation(self.generations);
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        simulation::step(&mut self.field, self.params.get(), dt, &mut self.rng);
    }

    /// Hand the current buffers to `renderer`.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> motes_platform::Result<()> {
        let size_changed = self.field.take_size_update();
        let frame = FrameView {
            positions: self.field.position_buffer(),
            colors: self.field.color_buffer(),
            point_size: self.field.material().size,
            size_changed,
            background: self.params.get().background_color.to_array(),
            generation: self.field.generation(),
        };
        renderer.render_frame(&frame)
    }

    pub(crate) fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }

    pub(crate) fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    /// Replace the field from the current parameters.
    pub(crate) fn regenerate(&mut self) {
        let p = *self.params.get();
        let field = ParticleField::regenerate(p.particle_count, p.base_color, p.particle_size, &mut self.rng);
        self.replace_field(field);
        debug!(generation = self.generations, "field replaced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motes_platform::OutputLine;

    #[derive(Default)]
    struct Capture {
        frames: Vec<(usize, f32, bool, u64)>,
    }

    impl Renderer for Capture {
        fn render_frame(&mut self, frame: &FrameView<'_>) -> motes_platform::Result<()> {
            assert_eq!(frame.positions.len(), frame.colors.len());
            self.frames
                .push((frame.len(), frame.point_size, frame.size_changed, frame.generation));
            Ok(())
        }
    }

    #[test]
    fn test_new_session_uses_defaults() {
        let session = Session::with_seed(Parameters::default(), 1);
        assert_eq!(session.field().len(), 5000);
        assert_eq!(session.field().generation(), 1);
        assert_eq!(session.field().material().size, 0.1);
    }

    #[test]
    fn test_render_reports_size_change_once() {
        let mut session = Session::with_seed(Parameters::default(), 2);
        let mut renderer = Capture::default();
        let mut out: Vec<OutputLine> = Vec::new();

        session.render(&mut renderer).unwrap();
        session.execute("size 0.5", &mut out);
        session.render(&mut renderer).unwrap();
        session.render(&mut renderer).unwrap();

        assert_eq!(
            renderer.frames,
            vec![(5000, 0.1, false, 1), (5000, 0.5, true, 1), (5000, 0.5, false, 1)]
        );
    }

    #[test]
    fn test_regeneration_bumps_generation() {
        let mut session = Session::with_seed(Parameters::default(), 3);
        let mut out: Vec<OutputLine> = Vec::new();
        session.execute("particles 10", &mut out);
        assert_eq!(session.field().generation(), 2);
        session.execute("color #ff0000", &mut out);
        assert_eq!(session.field().generation(), 3);
        session.execute("bgcolor #ff0000", &mut out);
        session.execute("speed 1", &mut out);
        assert_eq!(session.field().generation(), 3);
    }

    #[test]
    fn test_from_config_seed_is_reproducible() {
        let config = MotesConfig::from_toml_str("[simulation]\nseed = 9\n[defaults]\nparticle_count = 50").unwrap();
        let a = Session::from_config(&config).unwrap();
        let b = Session::from_config(&config).unwrap();
        assert_eq!(a.field().positions(), b.field().positions());
        assert_eq!(a.field().len(), 50);
    }
}
