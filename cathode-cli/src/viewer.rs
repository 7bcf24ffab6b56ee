//! Interactive viewer
//!
//! Paints the beam from the side and the spot pattern on the screen, with
//! sliders for the field tunables. The config file, when given, is watched
//! and reloaded between frames.

use cathode_core::{load_config, Apparatus, FieldConfig, FrameContext, ParticleState};
use eframe::egui;
use notify::{Event, RecommendedWatcher, Watcher};
use std::path::PathBuf;
use std::sync::mpsc;

/// Half extent of the side view along the beam, in world units
const SIDE_VIEW_HALF_LENGTH: f64 = 5.0;
/// Half extent of both views across the beam
const TRANSVERSE_HALF_EXTENT: f64 = 3.5;

pub struct ScopeApp {
    sim: FrameContext,
    /// Edited by the sliders, committed to the simulation once per frame
    field: FieldConfig,
    config_path: Option<PathBuf>,
    last_error: Option<String>,
    playing: bool,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ScopeApp {
    pub fn new(sim: FrameContext, config_path: Option<PathBuf>, _cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // the receiver is gone during shutdown
            let _ = tx.send(res);
        })
        .ok();

        if let (Some(w), Some(path)) = (watcher.as_mut(), config_path.as_ref()) {
            if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                log::warn!("not watching {}: {}", path.display(), e);
            }
        }

        Self {
            field: sim.config(),
            sim,
            config_path,
            last_error: None,
            playing: true,
            file_watcher: watcher,
            file_receiver: rx,
        }
    }

    fn reload_config(&mut self) {
        let Some(path) = self.config_path.as_ref() else {
            return;
        };
        match load_config(path) {
            Ok(config) => {
                log::info!("reloaded {}", path.display());
                self.sim.apparatus = config.apparatus;
                self.field = config.field;
                self.last_error = None;
            }
            Err(e) => {
                log::warn!("keeping previous config: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    ..
                }) => needs_reload = true,
                Ok(_) => {}
                Err(e) => log::warn!("file watcher error: {}", e),
            }
        }

        if needs_reload {
            self.reload_config();
        }
    }

    fn advance(&mut self, delta: f64) {
        if let Err(e) = self.sim.set_config(self.field) {
            self.last_error = Some(e.to_string());
            return;
        }
        if let Err(e) = self.sim.advance(delta) {
            self.last_error = Some(e.to_string());
            self.playing = false;
        }
    }

    fn tunables(&mut self, ui: &mut egui::Ui) {
        ui.heading("Vertical");
        ui.add(egui::Slider::new(&mut self.field.vertical.gain, 0.0..=2.0).text("gain"));
        ui.add(egui::Slider::new(&mut self.field.vertical.frequency, 0.05..=4.0).text("frequency"));

        ui.separator();
        ui.heading("Horizontal");
        ui.add(egui::Slider::new(&mut self.field.horizontal.gain, 0.0..=2.0).text("gain"));
        ui.add(egui::Slider::new(&mut self.field.horizontal.frequency, 0.05..=4.0).text("frequency"));
        ui.add(
            egui::Slider::new(&mut self.field.phase_offset_radians, 0.0..=std::f64::consts::TAU)
                .text("phase"),
        );

        ui.separator();
        ui.add(egui::Slider::new(&mut self.field.substeps_per_frame, 1..=32).text("substeps"));

        if ui.button("Clear").clicked() {
            self.sim.clear();
        }
    }
}

/// Maps a world-space rectangle onto a screen rectangle
struct ViewTransform {
    rect: egui::Rect,
    center: (f64, f64),
    scale: f64,
}

impl ViewTransform {
    fn new(rect: egui::Rect, center: (f64, f64), half_w: f64, half_h: f64) -> Self {
        let scale = (rect.width() as f64 / (2.0 * half_w)).min(rect.height() as f64 / (2.0 * half_h));
        Self { rect, center, scale }
    }

    fn to_screen(&self, u: f64, v: f64) -> egui::Pos2 {
        let c = self.rect.center();
        egui::pos2(
            c.x + ((u - self.center.0) * self.scale) as f32,
            c.y - ((v - self.center.1) * self.scale) as f32,
        )
    }
}

fn grey(brightness: f64) -> egui::Color32 {
    egui::Color32::from_gray((brightness.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Beam seen from the side: x to the right, y up
fn paint_side_view(painter: &egui::Painter, rect: egui::Rect, apparatus: &Apparatus, states: &[ParticleState]) {
    let view = ViewTransform::new(rect, (0.0, 0.0), SIDE_VIEW_HALF_LENGTH, TRANSVERSE_HALF_EXTENT);
    let plate_stroke = egui::Stroke::new(2.0, egui::Color32::from_rgb(120, 140, 200));

    let v = apparatus.vertical_plates;
    for y in [0.6, -0.6] {
        painter.line_segment([view.to_screen(v.start(), y), view.to_screen(v.end(), y)], plate_stroke);
    }
    // horizontal plates sit in front of and behind the beam
    let h = apparatus.horizontal_plates;
    painter.line_segment(
        [view.to_screen(h.start(), 0.0), view.to_screen(h.end(), 0.0)],
        egui::Stroke::new(6.0, egui::Color32::from_rgba_unmultiplied(120, 200, 140, 60)),
    );

    let c = apparatus.collector;
    painter.line_segment(
        [
            view.to_screen(c.threshold_x, -c.half_height),
            view.to_screen(c.threshold_x, c.half_height),
        ],
        egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
    );

    let g = apparatus.gun.emission_point;
    painter.circle_filled(view.to_screen(g.x, g.y), 5.0, egui::Color32::GRAY);

    for s in states {
        painter.circle_filled(view.to_screen(s.pos.x, s.pos.y), 1.5, grey(s.brightness));
    }
}

/// The screen face-on: z to the right, y up. Only pinned spots are drawn.
fn paint_screen_view(painter: &egui::Painter, rect: egui::Rect, apparatus: &Apparatus, states: &[ParticleState]) {
    let view = ViewTransform::new(rect, (0.0, 0.0), TRANSVERSE_HALF_EXTENT, TRANSVERSE_HALF_EXTENT);
    let c = apparatus.collector;

    let screen = egui::Rect::from_two_pos(
        view.to_screen(-c.half_depth, c.half_height),
        view.to_screen(c.half_depth, -c.half_height),
    );
    painter.rect_filled(screen, 0.0, egui::Color32::from_gray(17));
    painter.rect_stroke(screen, 0.0, egui::Stroke::new(1.0, egui::Color32::DARK_GRAY));

    let pinned_x = c.pinned_x();
    for s in states.iter().filter(|s| s.pos.x == pinned_x) {
        painter.circle_filled(view.to_screen(s.pos.z, s.pos.y), 1.5, grey(s.brightness));
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }

                if ui.button("⏭ Step").clicked() {
                    self.advance(1.0 / 60.0);
                }

                ui.separator();
                ui.label(format!(
                    "Frame: {}  t = {:.2}s  particles: {}",
                    self.sim.frame,
                    self.sim.clock.elapsed(),
                    self.sim.population.len()
                ));
            });
        });

        egui::SidePanel::left("tunables").show(ctx, |ui| self.tunables(ui));

        if let Some(ref error) = self.last_error {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.label(egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED));
            });
        }

        if self.playing {
            let delta = ctx.input(|i| i.stable_dt) as f64;
            self.advance(delta);
        }

        let states = self.sim.snapshot();
        let apparatus = self.sim.apparatus;

        egui::CentralPanel::default().show(ctx, |ui| {
            let size = ui.available_size();
            let side_size = egui::vec2(size.x * 0.62, size.y);
            let (side, painter) = ui.allocate_painter(side_size, egui::Sense::hover());
            painter.rect_filled(side.rect, 0.0, egui::Color32::BLACK);
            paint_side_view(&painter, side.rect, &apparatus, &states);

            let screen_rect = egui::Rect::from_min_max(
                egui::pos2(side.rect.max.x, side.rect.min.y),
                ui.max_rect().max,
            );
            let painter = ui.painter_at(screen_rect);
            painter.rect_filled(screen_rect, 0.0, egui::Color32::BLACK);
            paint_screen_view(&painter, screen_rect, &apparatus, &states);
        });

        if self.playing {
            ctx.request_repaint();
        }
    }
}
