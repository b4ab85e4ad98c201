use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use wheelchair_sim::config::ControllerConfig;
use wheelchair_sim::io::json::SessionSummary;
use wheelchair_sim::sim::{self, presets, Session, SessionConfig};

fn main() -> eframe::Result {
    let scenario_name = std::env::args().nth(1).unwrap_or_else(|| "ward".to_string());
    let scenario = presets::by_name(&scenario_name).unwrap_or_else(presets::ward);
    let session = match sim::run_scenario(scenario, &ControllerConfig::default(), &SessionConfig::default()) {
        Ok((session, _)) => session,
        Err(e) => {
            eprintln!("session failed: {e}");
            std::process::exit(1);
        }
    };
    let summary = SessionSummary::from_session(&session);

    let app = SessionViz { session, summary };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Wheelchair Session", options, Box::new(|_| Ok(Box::new(app))))
}

struct SessionViz {
    session: Session,
    summary: SessionSummary,
}

impl eframe::App for SessionViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let samples = &self.session.samples;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Scenario: {}", self.session.name));
            let events: Vec<String> = self.summary.events.iter().map(|(k, v)| format!("{k} ×{v}")).collect();
            ui.label(format!(
                "Distance: {:.2} m  |  Max speed: {:.2} m/s  |  Held: {:.1} s  |  {}",
                self.summary.distance_m,
                self.summary.max_speed_ms,
                self.summary.holding_time_s,
                events.join(", "),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Floor path, top view
                ui.vertical(|ui| {
                    ui.label("Path (m)");
                    let path: PlotPoints = samples.iter().map(|s| [s.position.x, s.position.z]).collect();
                    let held: PlotPoints = samples
                        .iter()
                        .filter(|s| s.holding)
                        .map(|s| [s.position.x, s.position.z])
                        .collect();
                    Plot::new("path")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("x (m)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Path", path));
                            plot_ui.points(Points::new("Holding", held).radius(2.0));
                        });
                });

                // Speed vs Time
                ui.vertical(|ui| {
                    ui.label("Speed (m/s)");
                    let points: PlotPoints = samples.iter().map(|s| [s.time, s.speed]).collect();
                    Plot::new("speed")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Speed", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                // Heading vs Time
                ui.vertical(|ui| {
                    ui.label("Heading (deg)");
                    let points: PlotPoints = samples.iter().map(|s| [s.time, s.yaw_deg]).collect();
                    Plot::new("heading")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Heading", points));
                        });
                });

                // Camera look offsets vs Time
                ui.vertical(|ui| {
                    ui.label("Camera look (deg)");
                    let yaw: PlotPoints = samples.iter().map(|s| [s.time, s.camera_yaw]).collect();
                    let pitch: PlotPoints = samples.iter().map(|s| [s.time, s.camera_pitch]).collect();
                    Plot::new("look")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Yaw offset", yaw));
                            plot_ui.line(Line::new("Pitch", pitch));
                        });
                });
            });
        });
    }
}
