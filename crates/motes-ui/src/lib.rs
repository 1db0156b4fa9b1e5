//! Windowed host: egui canvas for the particle cloud plus a command console.

use std::time::Instant;

use motes_core::config::WindowConfig;
use motes_core::Session;
use motes_platform::{OutputLine, OutputSink, Severity};
use tracing::{info, warn};

mod canvas;

pub use canvas::{PointPainter, Projection};

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(0xff, 0x66, 0x66);
const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(0x66, 0xff, 0x66);

/// Open the window and run until it is closed. Blocks the calling thread,
/// which must be the main thread on most platforms.
pub fn run_console(session: Session, window: &WindowConfig) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(window.title.clone())
            .with_inner_size([window.width, window.height]),
        ..Default::default()
    };
    info!(title = %window.title, "opening console window");
    eframe::run_native(
        &window.title,
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(MotesApp::new(session)))),
    )
}

pub struct MotesApp {
    session: Session,
    log: Vec<OutputLine>,
    input: String,
    last_tick: Instant,
}

impl MotesApp {
    pub fn new(session: Session) -> Self {
        let mut log = Vec::new();
        log.info("Type 'help' for a list of commands.");
        Self {
            session,
            log,
            input: String::new(),
            last_tick: Instant::now(),
        }
    }

    fn submit_input(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.session.submit(&line, &mut self.log);
    }

    fn console_ui(&mut self, ui: &mut egui::Ui) {
        let log_height = (ui.available_height() - 32.0).max(0.0);
        egui::ScrollArea::vertical()
            .max_height(log_height)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.log {
                    let text = egui::RichText::new(&line.text).monospace();
                    let text = match line.severity {
                        Severity::Info => text,
                        Severity::Success => text.color(SUCCESS_COLOR),
                        Severity::Error => text.color(ERROR_COLOR),
                    };
                    ui.label(text);
                }
            });

        let response = ui.add(
            egui::TextEdit::singleline(&mut self.input)
                .hint_text("Enter command")
                .font(egui::TextStyle::Monospace)
                .desired_width(f32::INFINITY),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.submit_input();
            response.request_focus();
        }
    }
}

impl eframe::App for MotesApp {
    fn update(&mut self, context: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.session.tick(dt);

        egui::TopBottomPanel::bottom("console")
            .resizable(true)
            .default_height(180.0)
            .show(context, |ui| self.console_ui(ui));

        let [r, g, b] = self.session.params().background_color.to_array().map(canvas::channel_byte);
        let background = egui::Color32::from_rgb(r, g, b);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(background))
            .show(context, |ui| {
                let mut renderer = PointPainter::new(ui.painter_at(ui.max_rect()));
                if let Err(err) = self.session.render(&mut renderer) {
                    warn!("render failed: {err}");
                }
            });

        context.request_repaint();
    }
}
