//! Terminal host: commands from stdin, a fixed-rate ticker for frames, and a
//! renderer that only logs.

use std::io::{BufRead, IsTerminal, Write};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver};
use motes_core::config::HeadlessConfig;
use motes_core::Session;
use motes_platform::{FrameView, OutputSink, Renderer, Severity};
use tracing::{debug, info, warn};

pub fn run_headless(mut session: Session, config: &HeadlessConfig) -> anyhow::Result<()> {
    let lines = spawn_stdin_reader();
    let ticker = crossbeam_channel::tick(Duration::from_secs_f32(1.0 / config.frame_rate));
    let mut sink = StdoutSink::new();
    let mut renderer = LogRenderer::new(config.frame_rate.round().max(1.0) as u64);
    let mut last_tick = Instant::now();

    info!(frame_rate = config.frame_rate, "headless session started");
    sink.info("Type 'help' for a list of commands.");

    let mut running = true;
    while running {
        select! {
            recv(lines) -> line => match line {
                Ok(line) => session.submit(&line, &mut sink),
                Err(_) => {
                    info!("stdin closed, stopping");
                    running = false;
                }
            },
            recv(ticker) -> tick => {
                let now = tick.unwrap_or_else(|_| Instant::now());
                let dt = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;
                session.tick(dt);
                if let Err(err) = session.render(&mut renderer) {
                    warn!("render failed: {err}");
                }
            }
        }
    }
    if let Some(last) = renderer.last_summary() {
        info!(
            frames = last.frames,
            particles = last.particles,
            generation = last.generation,
            "headless session finished"
        );
    }
    Ok(())
}

/// Forward stdin lines until EOF; the channel disconnects when the reader
/// thread exits.
fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = crossbeam_channel::unbounded::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!("stdin read failed: {err}");
                    break;
                }
            }
        }
    });
    receiver
}

/// Prints console lines, colored when stdout is a terminal.
pub struct StdoutSink {
    color: bool,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputSink for StdoutSink {
    fn append(&mut self, text: &str, severity: Severity) {
        let mut out = std::io::stdout().lock();
        let result = match (self.color, severity) {
            (true, Severity::Success) => writeln!(out, "\x1b[38;2;102;255;102m{text}\x1b[0m"),
            (true, Severity::Error) => writeln!(out, "\x1b[38;2;255;102;102m{text}\x1b[0m"),
            _ => writeln!(out, "{text}"),
        };
        if let Err(err) = result {
            warn!("stdout write failed: {err}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub frames: u64,
    pub particles: usize,
    pub generation: u64,
    pub centroid: [f32; 3],
}

/// Logs a summary every `interval` frames instead of drawing.
pub struct LogRenderer {
    interval: u64,
    frames: u64,
    generation: Option<u64>,
    last_summary: Option<FrameSummary>,
}

impl LogRenderer {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
            generation: None,
            last_summary: None,
        }
    }

    pub fn last_summary(&self) -> Option<&FrameSummary> {
        self.last_summary.as_ref()
    }
}

impl Renderer for LogRenderer {
    fn render_frame(&mut self, frame: &FrameView<'_>) -> motes_platform::Result<()> {
        self.frames += 1;
        if self.generation != Some(frame.generation) {
            debug!(generation = frame.generation, particles = frame.len(), "new particle field");
            self.generation = Some(frame.generation);
        }
        if frame.size_changed {
            debug!(size = frame.point_size, "point size changed");
        }
        if self.frames % self.interval != 0 {
            return Ok(());
        }

        let mut sum = [0.0f32; 3];
        for p in frame.positions {
            for (acc, v) in sum.iter_mut().zip(p) {
                *acc += v;
            }
        }
        let n = frame.len().max(1) as f32;
        let summary = FrameSummary {
            frames: self.frames,
            particles: frame.len(),
            generation: frame.generation,
            centroid: sum.map(|s| s / n),
        };
        debug!(
            frames = summary.frames,
            particles = summary.particles,
            generation = summary.generation,
            centroid = ?summary.centroid,
            "frame summary"
        );
        self.last_summary = Some(summary);
        Ok(())
    }
}
