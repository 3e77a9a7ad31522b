use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use nalgebra::Vector2;

use daedalus::config::SimConfig;
use daedalus::render::{Color, RenderSink, Sprite};
use daedalus::sim::{diagnostics, FrameDriver, Simulation};

const RADIUS_SAMPLE_EVERY: u64 = 5;
const RADIUS_HISTORY: usize = 4000;

/// Windowed star-and-planets gravity simulation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scenario file (TOML); defaults to the built-in Sun + Mercury setup
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Frames simulated per repaint
    #[arg(long, default_value_t = 1)]
    speed: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load scenario from {path}"))?,
        None => SimConfig::default(),
    };
    let sim = config.build().context("invalid scenario")?;

    let title = config.window.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([config.window.width as f32, config.window.height as f32 + 180.0]),
        ..Default::default()
    };
    let app = SimViz::new(sim, config, args.speed.max(1));
    eframe::run_native(&title, options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow!("window closed with error: {e}"))
}

struct SimViz {
    sim: Simulation,
    config: SimConfig,
    speed: u32,
    center: usize,
    weak_gravity: bool,
    radius_history: Vec<Vec<[f64; 2]>>,
}

impl SimViz {
    fn new(sim: Simulation, config: SimConfig, speed: u32) -> Self {
        let center = sim.anchor().unwrap_or(0);
        let radius_history = vec![Vec::new(); sim.bodies().len()];
        let peak = diagnostics::peak_acceleration(&sim.gravity, sim.bodies(), sim.time());
        let weak_gravity = peak < diagnostics::NEGLIGIBLE_ACCELERATION;
        Self { sim, config, speed, center, weak_gravity, radius_history }
    }

    fn step(&mut self) {
        for _ in 0..self.speed {
            let dt = self.sim.frame_dt();
            self.sim.advance_frame(dt);
            if self.sim.frame() % RADIUS_SAMPLE_EVERY == 0 {
                self.sample_radii();
            }
        }
    }

    fn sample_radii(&mut self) {
        let bodies = self.sim.bodies();
        let t = self.sim.time();
        for (i, history) in self.radius_history.iter_mut().enumerate() {
            if i == self.center {
                continue;
            }
            if history.len() == RADIUS_HISTORY {
                history.remove(0);
            }
            history.push([t, diagnostics::separation(&bodies[i], &bodies[self.center])]);
        }
    }
}

impl eframe::App for SimViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        self.step();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if self.weak_gravity {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    "Gravity is negligible under this law and G; try force_law = \"unnormalized\"",
                );
            }
            ui.label(format!(
                "t = {:.0} s  |  frame {}  |  G = {:.3e}  |  {} law  |  dt = {} s",
                self.sim.time(),
                self.sim.frame(),
                self.sim.gravity.g,
                self.sim.gravity.law,
                self.sim.dt,
            ));
        });

        egui::TopBottomPanel::bottom("radius").default_height(160.0).show(ctx, |ui| {
            let center = self.sim.bodies()[self.center].name().to_string();
            Plot::new("radius")
                .x_axis_label("Time (s)")
                .y_axis_label(format!("Distance to {center} (px)"))
                .legend(Legend::default())
                .show(ui, |plot_ui| {
                    for (i, history) in self.radius_history.iter().enumerate() {
                        if i == self.center || history.is_empty() {
                            continue;
                        }
                        let name = self.sim.bodies()[i].name().to_string();
                        let points: PlotPoints = history.iter().copied().collect();
                        plot_ui.line(Line::new(name, points));
                    }
                });
        });

        egui::CentralPanel::default().frame(egui::Frame::NONE).show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let rect = response.rect;
            let world_w = self.config.window.width as f32;
            let world_h = self.config.window.height as f32;
            let scale = (rect.width() / world_w).min(rect.height() / world_h);

            let mut sink = PainterSink {
                painter: &painter,
                origin: rect.min,
                scale,
                background: rgb(self.config.window.background),
            };
            self.sim.render(&mut sink);
        });

        ctx.request_repaint();
    }
}

// ---------------------------------------------------------------------------
// egui painter as a render sink
// ---------------------------------------------------------------------------

struct PainterSink<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    scale: f32,
    background: egui::Color32,
}

impl PainterSink<'_> {
    fn to_screen(&self, x: f64, y: f64) -> egui::Pos2 {
        self.origin + egui::vec2(x as f32, y as f32) * self.scale
    }
}

impl RenderSink for PainterSink<'_> {
    fn begin_frame(&mut self) {
        self.painter.rect_filled(self.painter.clip_rect(), 0.0, self.background);
    }

    fn draw_trail(&mut self, points: &[Vector2<f64>], color: Color) {
        let line: Vec<egui::Pos2> = points.iter().map(|p| self.to_screen(p.x, p.y)).collect();
        let [r, g, b] = color;
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(r, g, b, 90));
        self.painter.add(egui::Shape::line(line, stroke));
    }

    fn draw_body(&mut self, sprite: &Sprite<'_>) {
        let center = self.to_screen(sprite.pixel_x as f64, sprite.pixel_y as f64);
        let radius = (sprite.radius as f32 * self.scale).max(1.0);
        self.painter.circle_filled(center, radius, rgb(sprite.color));
    }
}

fn rgb([r, g, b]: Color) -> egui::Color32 {
    egui::Color32::from_rgb(r, g, b)
}
