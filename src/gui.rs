//! The eframe/egui radar display.
//!
//! Every frame prunes the shared history, turns the survivors into faded dots and
//! redraws the sweep line at the most recent angle. egui is asked to repaint again
//! after the configured interval; input events (mouse, resize) can add extra frames.
//!
//! Angle 0 points west (left) and angles grow counter-clockwise, so 90° points down.
use crate::config::{DisplayConfig, RadarConfig};
use crate::error::RadarResult;
use crate::history::{fade_alpha, HistoryStore};
use egui::Color32;
use egui_plot::{Line, MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text};
use std::time::{Duration, Instant};

const DETECTION_COLOR: (u8, u8, u8) = (255, 0, 0);
const SWEEP_COLOR: Color32 = Color32::from_rgb(0, 200, 0);
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(90, 90, 90, 160);
const RING_COUNT: u32 = 4;
const SPOKE_STEP_DEG: u32 = 30;
const RING_SEGMENTS: u32 = 120;

/// One detection ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Angle in radians.
    pub theta: f64,
    /// Distance in centimeters.
    pub distance: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

/// Everything one render tick needs, captured from the history in a single lock.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarFrame {
    /// Surviving detections in arrival order.
    pub detections: Vec<Detection>,
    /// Sweep angle in radians.
    pub sweep_theta: f64,
    /// Sweep angle in degrees, as received.
    pub latest_angle: i64,
}

impl RadarFrame {
    /// Prune `store` at `now` and build the frame from what survives.
    pub fn capture(store: &HistoryStore, now: Instant, fade_time: Duration) -> Self {
        let snapshot = store.prune_and_snapshot(now, fade_time);
        let detections = snapshot
            .samples
            .iter()
            .map(|s| Detection {
                theta: (s.angle as f64).to_radians(),
                distance: s.distance as f64,
                alpha: fade_alpha(s.age(now), fade_time),
            })
            .collect();

        Self {
            detections,
            sweep_theta: (snapshot.latest_angle as f64).to_radians(),
            latest_angle: snapshot.latest_angle,
        }
    }
}

/// Map polar coordinates (west zero, counter-clockwise) onto plot coordinates.
pub fn polar_to_plot(theta: f64, radius: f64) -> [f64; 2] {
    [-radius * theta.cos(), -radius * theta.sin()]
}

/// Red with the given opacity.
pub fn detection_color(alpha: f64) -> Color32 {
    let (r, g, b) = DETECTION_COLOR;
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// The radar window.
pub struct RadarApp {
    store: HistoryStore,
    display: DisplayConfig,
}

impl RadarApp {
    /// Creates the app drawing from `store`.
    pub fn new(store: HistoryStore, display: DisplayConfig) -> Self {
        Self { store, display }
    }
}

impl eframe::App for RadarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame = RadarFrame::capture(&self.store, Instant::now(), self.display.fade_time());

        egui::TopBottomPanel::top("title_panel").show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.heading(&self.display.title));
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Sweep: {}°", frame.latest_angle));
                ui.separator();
                ui.label(format!("Detections: {}", frame.detections.len()));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            radar_plot(ui, &frame, &self.display);
        });

        ctx.request_repaint_after(self.display.update_interval());
    }
}

fn radar_plot(ui: &mut egui::Ui, frame: &RadarFrame, display: &DisplayConfig) {
    let max_range = display.max_range_cm;

    Plot::new("radar")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [-max_range, -max_range],
                [max_range, max_range],
            ));

            for ring in 1..=RING_COUNT {
                let radius = max_range * f64::from(ring) / f64::from(RING_COUNT);
                let circle: PlotPoints = (0..=RING_SEGMENTS)
                    .map(|i| {
                        let theta = std::f64::consts::TAU * f64::from(i) / f64::from(RING_SEGMENTS);
                        polar_to_plot(theta, radius)
                    })
                    .collect();
                plot_ui.line(Line::new(circle).color(GRID_COLOR).width(1.0));
            }

            for deg in (0..360u32).step_by(SPOKE_STEP_DEG as usize) {
                let theta = f64::from(deg).to_radians();
                let rim = polar_to_plot(theta, max_range);
                plot_ui.line(Line::new(vec![[0.0, 0.0], rim]).color(GRID_COLOR).width(1.0));

                let label = polar_to_plot(theta, max_range * 1.06);
                plot_ui.text(
                    Text::new(PlotPoint::new(label[0], label[1]), format!("{deg}°"))
                        .color(GRID_COLOR),
                );
            }

            for detection in &frame.detections {
                let position = polar_to_plot(detection.theta, detection.distance);
                plot_ui.points(
                    Points::new(vec![position])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(display.point_radius)
                        .color(detection_color(detection.alpha)),
                );
            }

            let tip = polar_to_plot(frame.sweep_theta, max_range);
            plot_ui.line(
                Line::new(vec![[0.0, 0.0], tip])
                    .color(SWEEP_COLOR)
                    .width(display.sweep_width),
            );
        });
}

/// Open the radar window and block until it is closed.
pub fn run(config: &RadarConfig, store: HistoryStore) -> RadarResult<()> {
    let display = config.display.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([display.window_width, display.window_height])
            .with_title(display.title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        &config.display.title,
        options,
        Box::new(move |_cc| Ok(Box::new(RadarApp::new(store, display)))),
    )?;
    Ok(())
}
