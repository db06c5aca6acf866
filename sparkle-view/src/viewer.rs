//! Interactive particle canvas built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`FrameLoop`] and
//! implements [`eframe::App`] to paint the particle layer and feed user
//! input into it. The central panel is the drawing surface; its size is
//! the simulation viewport.

use eframe::App;
use glam::Vec2;
use rand::rngs::StdRng;
use sparkle_core::{
    color::Rgba,
    config::Config,
    frame_loop::FrameLoop,
    simulation::Simulation,
    surface::DrawSurface,
    types::{ParticleKind, Viewport},
};

/// Burst size when a point on the canvas is selected.
pub const SELECT_BURST: usize = 20;
/// Burst size for the centered reveal effect.
pub const REVEAL_BURST: usize = 50;
/// Burst size for the centered reshuffle effect.
pub const RESHUFFLE_BURST: usize = 30;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x12, 0x0e, 0x24);

/// Adapts an [`egui::Painter`] to [`DrawSurface`].
///
/// Simulation coordinates are relative to `origin`, the top-left corner of
/// the canvas rect.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl DrawSurface for PainterSurface<'_> {
    fn clear(&mut self, viewport: Viewport) {
        let rect =
            egui::Rect::from_min_size(self.origin, egui::vec2(viewport.width, viewport.height));
        self.painter.rect_filled(rect, 0.0, BACKGROUND);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Rgba) {
        let color = egui::Color32::from_rgba_unmultiplied(fill.r, fill.g, fill.b, fill.a);
        self.painter
            .circle_filled(self.origin + egui::vec2(center.x, center.y), radius, color);
    }
}

/// Main application state for the particle viewer.
///
/// ### Fields
/// - `frames` - The particle simulation and its start/stop state.
/// - `draft` - Config being edited in the side panel; applied on demand.
/// - `seed_pending` - Initial ambient seeding waits for the first canvas
///   size so particles cover the real viewport.
/// - `status` - Last config error shown in the side panel, if any.
pub struct Viewer {
    frames: FrameLoop<StdRng>,
    draft: Config,
    seed_pending: bool,
    status: Option<String>,
}

impl Viewer {
    /// Creates a viewer around `cfg` and `rng`.
    ///
    /// The simulation starts with an empty viewport; ambient seeding is
    /// deferred to the first frame when `cfg.seed_on_start` is set.
    ///
    /// ### Parameters
    /// - `cfg` - Validated particle config.
    /// - `rng` - Random source for every spawn.
    /// - `running` - Whether the loop starts ticking immediately.
    pub fn new(cfg: Config, rng: StdRng, running: bool) -> Self {
        let seed_pending = cfg.seed_on_start;
        let sim_cfg = Config {
            seed_on_start: false,
            ..cfg.clone()
        };
        let mut frames = FrameLoop::new(Simulation::new(Viewport::default(), sim_cfg, rng));
        if running {
            frames.start();
        }

        Self {
            frames,
            draft: cfg,
            seed_pending,
            status: None,
        }
    }

    fn sim(&self) -> &Simulation<StdRng> {
        self.frames.simulation()
    }

    fn sim_mut(&mut self) -> &mut Simulation<StdRng> {
        self.frames.simulation_mut()
    }

    /// Matches the simulation viewport to the canvas, seeding on the first
    /// non-empty size.
    fn sync_viewport(&mut self, viewport: Viewport) {
        self.sim_mut().resize(viewport);
        if self.seed_pending && !viewport.is_empty() {
            self.seed_pending = false;
            self.sim_mut().seed_ambient();
        }
    }

    /// Burst at a canvas-relative point, as when a card is selected.
    fn select_at(&mut self, pos: Vec2) -> usize {
        self.sim_mut().spawn_burst(pos, SELECT_BURST)
    }

    fn reveal(&mut self) -> usize {
        let center = self.sim().viewport().center();
        self.sim_mut().spawn_burst(center, REVEAL_BURST)
    }

    fn reshuffle(&mut self) -> usize {
        let center = self.sim().viewport().center();
        self.sim_mut().spawn_burst(center, RESHUFFLE_BURST)
    }

    /// Validates the draft config and hands it to the simulation.
    fn apply_draft(&mut self) {
        match self.draft.validate() {
            Ok(()) => {
                let cfg = self.draft.clone();
                self.sim_mut().set_config(cfg);
                self.status = None;
            }
            Err(e) => {
                log::warn!("Rejected config edit: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, effects).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let running = self.frames.is_running();
                if ui
                    .button(if running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.frames.toggle();
                }

                if ui
                    .add_enabled(!running, egui::Button::new("Step"))
                    .clicked()
                {
                    // Drawn on the next frame's refresh.
                    self.frames.step(&mut NullSurface);
                }

                ui.separator();
                if ui.button("✨ Reveal").clicked() {
                    self.reveal();
                }
                if ui.button("🔀 Reshuffle").clicked() {
                    self.reshuffle();
                }

                ui.separator();
                if ui.button("Reset").clicked() {
                    self.sim_mut().reset();
                }
                if ui.button("Clear bursts").clicked() {
                    self.sim_mut().clear_bursts();
                }
            });
        });
    }

    /// Builds the bottom status bar (tick, population breakdown).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let store = self.sim().store();
                let viewport = self.sim().viewport();
                ui.label(format!("{:.0}x{:.0}", viewport.width, viewport.height));
                ui.separator();
                if let Some(stats) = self.frames.last_stats() {
                    ui.label(format!("removed = {}", stats.removed));
                    ui.label(format!("drawn = {}", stats.drawn));
                    ui.separator();
                }
                let on_screen = store.iter().filter(|p| viewport.contains(p.pos())).count();
                ui.label(format!("on screen = {on_screen}"));
                ui.separator();
                ui.label(format!("burst = {}", store.count_kind(ParticleKind::Burst)));
                ui.label(format!(
                    "ambient = {}",
                    store.count_kind(ParticleKind::Ambient)
                ));
                ui.label(format!("live = {} / {}", store.len(), store.capacity()));
                ui.separator();
                ui.label(format!("tick = {}", self.sim().ticks()));
            });
        });
    }

    /// Builds the right-hand panel for editing the particle config.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Population");
                Self::labeled_drag_usize(
                    ui,
                    "ambient_target:",
                    &mut self.draft.ambient_target,
                    0..=2000,
                    1.0,
                );
                Self::labeled_drag_usize(
                    ui,
                    "max_particles:",
                    &mut self.draft.max_particles,
                    1..=100_000,
                    10.0,
                );
                ui.horizontal(|ui| {
                    ui.label("max_life:");
                    ui.add(
                        egui::DragValue::new(&mut self.draft.max_life)
                            .range(1..=1000)
                            .speed(1.0),
                    );
                });

                ui.separator();
                ui.label("Motion");
                Self::labeled_drag_f32(ui, "damping:", &mut self.draft.damping, 0.0..=1.0, 0.001);
                Self::labeled_drag_f32(
                    ui,
                    "ambient_speed:",
                    &mut self.draft.ambient_speed,
                    0.0..=20.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "burst_speed:",
                    &mut self.draft.burst_speed,
                    0.0..=50.0,
                    0.1,
                );

                ui.separator();
                ui.label("Size");
                Self::labeled_drag_f32(ui, "size_min:", &mut self.draft.size_min, 0.0..=50.0, 0.1);
                Self::labeled_drag_f32(ui, "size_max:", &mut self.draft.size_max, 0.0..=50.0, 0.1);

                ui.separator();
                ui.label("Palettes");
                for (name, palette) in [
                    ("ambient", &self.draft.ambient_palette),
                    ("burst", &self.draft.burst_palette),
                ] {
                    ui.horizontal(|ui| {
                        ui.label(format!("{name}:"));
                        for c in palette {
                            ui.colored_label(egui::Color32::from_rgb(c.r, c.g, c.b), c.to_string());
                        }
                    });
                }

                ui.separator();
                if ui.button("Apply").clicked() {
                    self.apply_draft();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.draft = Config::default();
                    self.apply_draft();
                }

                if let Some(msg) = &self.status {
                    ui.colored_label(egui::Color32::LIGHT_RED, msg);
                }
            });
    }

    /// Builds the central canvas: sizing, click bursts, and the refresh tick.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::click());
                let rect = response.rect;
                self.sync_viewport(Viewport::new(rect.width(), rect.height()));

                if response.clicked()
                    && let Some(p) = response.interact_pointer_pos()
                {
                    let local = p - rect.min;
                    self.select_at(Vec2::new(local.x, local.y));
                }

                let painter = ui.painter_at(rect);
                let mut surface = PainterSurface {
                    painter: &painter,
                    origin: rect.min,
                };
                self.frames.on_refresh(&mut surface);

                // Keep the refresh chain alive while ticking.
                if self.frames.is_running() {
                    ctx.request_repaint();
                }
            });
    }
}

/// Discards draw calls for ticks advanced outside a paint pass.
struct NullSurface;

impl DrawSurface for NullSurface {
    fn clear(&mut self, _viewport: Viewport) {}

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _fill: Rgba) {}
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
