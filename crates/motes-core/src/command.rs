//! Console command parsing and application.
//!
//! A line is lowercased, split on whitespace into a keyword and arguments,
//! and validated into a [`Command`] before anything is mutated. Applying a
//! command then cannot fail, so a rejected line never leaves the session
//! half-updated.

use std::panic::{self, AssertUnwindSafe};

use motes_platform::OutputSink;
use tracing::{info, warn};

use crate::color::Color;
use crate::error::{CommandError, Result};
use crate::params::{is_valid_particle_count, is_valid_particle_size, is_valid_speed_factor, MAX_PARTICLES};
use crate::session::Session;

pub const HELP_LINES: &[&str] = &[
    "Available commands:",
    "  help                          - Show this help message",
    "  particles <number>            - Set number of particles (e.g., particles 10000)",
    "  speed <factor>                - Set particle speed factor (e.g., speed 0.02)",
    "  color <r> <g> <b> / <hex>     - Set particle base color (0-1 or #RRGGBB, e.g., color 0 1 0 or color #00ff00)",
    "  bgcolor <r> <g> <b> / <hex>   - Set background color (e.g., bgcolor 0.1 0.1 0.1 or bgcolor #222222)",
    "  size <value>                  - Set particle size (e.g., size 0.05)",
    "  reset                         - Reset all parameters to default",
];

const SPEED_MESSAGE: &str = "Invalid speed factor. Must be a non-negative number.";
const SIZE_MESSAGE: &str = "Invalid particle size. Must be a positive number.";
const COLOR_FORMAT_MESSAGE: &str = "Invalid color format. Use <r> <g> <b> (0-1) or <#hex>.";
const RGB_RANGE_MESSAGE: &str = "Invalid RGB values. Must be between 0 and 1.";

fn particle_count_message() -> String {
    format!("Invalid particle count. Must be between 1 and {MAX_PARTICLES}.")
}

/// A fully validated console command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Help,
    Particles(u32),
    Speed(f32),
    Color(Color),
    BgColor(Color),
    Size(f32),
    Reset,
}

impl Command {
    /// Parse one console line. Blank lines yield `Ok(None)`.
    ///
    /// Arguments beyond the ones a command consumes are ignored, except for
    /// the color commands whose form is decided by the argument count.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let lowered = line.to_lowercase();
        let mut parts = lowered.split_whitespace();
        let Some(keyword) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let command = match keyword {
            "help" => Command::Help,
            "particles" => args
                .first()
                .and_then(|a| a.parse::<u32>().ok())
                .filter(|n| is_valid_particle_count(*n))
                .map(Command::Particles)
                .ok_or_else(|| CommandError::Validation(particle_count_message()))?,
            "speed" => parse_float(&args)
                .filter(|s| is_valid_speed_factor(*s))
                .map(Command::Speed)
                .ok_or_else(|| CommandError::Validation(SPEED_MESSAGE.into()))?,
            "color" => Command::Color(parse_color(&args)?),
            "bgcolor" => Command::BgColor(parse_color(&args)?),
            "size" => parse_float(&args)
                .filter(|s| is_valid_particle_size(*s))
                .map(Command::Size)
                .ok_or_else(|| CommandError::Validation(SIZE_MESSAGE.into()))?,
            "reset" => Command::Reset,
            other => return Err(CommandError::UnknownCommand(other.to_owned())),
        };
        Ok(Some(command))
    }
}

fn parse_float(args: &[&str]) -> Option<f32> {
    args.first().and_then(|a| a.parse::<f32>().ok())
}

/// `#rrggbb` (or `#rgb`) as a single token, or three components in 0..=1.
/// All three components are checked before any is accepted.
pub fn parse_color(args: &[&str]) -> Result<Color> {
    match args {
        [token] if token.starts_with('#') => {
            Color::parse_hex(token).ok_or_else(|| CommandError::Format(COLOR_FORMAT_MESSAGE.into()))
        }
        [r, g, b] => {
            let channel = |s: &str| s.parse::<f32>().ok().filter(|c| (0.0..=1.0).contains(c));
            match (channel(*r), channel(*g), channel(*b)) {
                (Some(r), Some(g), Some(b)) => Ok(Color::new(r, g, b)),
                _ => Err(CommandError::Validation(RGB_RANGE_MESSAGE.into())),
            }
        }
        _ => Err(CommandError::Format(COLOR_FORMAT_MESSAGE.into())),
    }
}

/// Run `f`, turning a panic into [`CommandError::Unexpected`] carrying the
/// panic message.
fn guarded(f: impl FnOnce() -> Result<()>) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "internal failure".to_owned());
        Err(CommandError::Unexpected(detail))
    })
}

impl Session {
    /// Run one console line, reporting feedback to `sink`.
    ///
    /// Never fails: rejected and unexpected inputs become error lines.
    pub fn execute(&mut self, line: &str, sink: &mut dyn OutputSink) {
        let result = guarded(|| {
            if let Some(command) = Command::parse(line)? {
                self.apply(command, &mut *sink);
            }
            Ok(())
        });

        if let Err(err) = result {
            warn!(line, error = %err, "command rejected");
            sink.error(&err.console_message());
        }
    }

    /// Console entry point: trims the line, echoes it as `> line`, then
    /// executes it. Blank input is ignored entirely.
    pub fn submit(&mut self, line: &str, sink: &mut dyn OutputSink) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        sink.info(&format!("> {line}"));
        self.execute(line, sink);
    }

    /// Apply an already validated command.
    pub fn apply(&mut self, command: Command, sink: &mut dyn OutputSink) {
        match command {
            Command::Help => {
                for line in HELP_LINES {
                    sink.info(line);
                }
            }
            Command::Particles(count) => {
                self.params_mut().set_particle_count(count);
                self.regenerate();
                sink.success(&format!("Particle count set to {count}"));
            }
            Command::Speed(speed) => {
                self.params_mut().set_speed_factor(speed);
                sink.success(&format!("Particle speed factor set to {speed}"));
            }
            Command::Color(color) => {
                self.params_mut().set_base_color(color);
                self.regenerate();
                sink.success(&format!("Particle base color set to {color}"));
            }
            Command::BgColor(color) => {
                self.params_mut().set_background_color(color);
                sink.success(&format!("Background color set to {color}"));
            }
            Command::Size(size) => {
                self.params_mut().set_particle_size(size);
                self.field_mut().set_size(size);
                sink.success(&format!("Particle size set to {size}"));
            }
            Command::Reset => {
                self.params_mut().reset();
                self.regenerate();
                sink.success("All parameters reset to default.");
            }
        }
        info!(?command, "command applied");
    }
}
