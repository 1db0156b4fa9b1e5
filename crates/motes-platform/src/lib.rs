//! Collaborator traits so `motes-core` stays independent of any display or console.

use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Tag attached to every console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLine {
    pub text: String,
    pub severity: Severity,
}

/// Append-only console output.
pub trait OutputSink {
    fn append(&mut self, text: &str, severity: Severity);

    fn info(&mut self, text: &str) {
        self.append(text, Severity::Info);
    }

    fn success(&mut self, text: &str) {
        self.append(text, Severity::Success);
    }

    fn error(&mut self, text: &str) {
        self.append(text, Severity::Error);
    }
}

impl OutputSink for Vec<OutputLine> {
    fn append(&mut self, text: &str, severity: Severity) {
        self.push(OutputLine {
            text: text.to_owned(),
            severity,
        });
    }
}

/// Read-only view of everything a renderer needs for one frame.
///
/// `positions` and `colors` always have the same length, but that length
/// (and the underlying buffers) may change between frames whenever the
/// particle field is regenerated. `generation` changes along with them.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub positions: &'a [[f32; 3]],
    pub colors: &'a [[f32; 3]],
    pub point_size: f32,
    /// Set when the point size changed since the previous frame.
    pub size_changed: bool,
    pub background: [f32; 3],
    pub generation: u64,
}

impl FrameView<'_> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Draws the particle cloud. Backed by egui in the windowed host and by a
/// tracing summary in the headless one.
pub trait Renderer {
    fn render_frame(&mut self, frame: &FrameView<'_>) -> Result<()>;
}
