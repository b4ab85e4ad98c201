use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use wheelchair_sim::config::ControllerConfig;
use wheelchair_sim::controller::ControllerEvent;
use wheelchair_sim::io::{csv, json};
use wheelchair_sim::sim::{self, presets, SessionConfig};

#[derive(Parser)]
#[command(name = "wheelchair-sim")]
#[command(about = "Run a scripted wheelchair controller session", long_about = None)]
struct Args {
    /// Scenario preset
    #[arg(default_value = "ward")]
    scenario: String,

    /// Controller tuning (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session length in seconds
    #[arg(short, long, default_value_t = 10.0)]
    duration: f64,

    /// Physics step in seconds
    #[arg(long, default_value_t = 0.02)]
    fixed_dt: f64,

    /// Look sensitivity override
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Write per-frame telemetry CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write session summary JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the timestamped event log CSV
    #[arg(long)]
    events: Option<PathBuf>,

    /// -v debug, -vv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let mut config = match &args.config {
        Some(path) => ControllerConfig::from_file(path)?,
        None => ControllerConfig::default(),
    };
    if let Some(s) = args.sensitivity {
        config.camera.sensitivity = s;
        config.validate().context("invalid --sensitivity")?;
    }

    let Some(scenario) = presets::by_name(&args.scenario) else {
        bail!("unknown scenario {:?} (available: {})", args.scenario, presets::NAMES.join(", "));
    };
    if args.duration <= 0.0 || args.fixed_dt <= 0.0 {
        bail!("duration and fixed step must be positive");
    }
    let session_config = SessionConfig { duration: args.duration, fixed_dt: args.fixed_dt, ..Default::default() };

    // -----------------------------------------------------------------------
    // Run session
    // -----------------------------------------------------------------------
    let (session, _world) = sim::run_scenario(scenario, &config, &session_config)
        .context("controller failed to start")?;
    let summary = json::SessionSummary::from_session(&session);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  WHEELCHAIR SESSION — {}", session.name);
    println!("====================================================================");
    println!();
    println!("  Controller Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    let m = &config.movement;
    let c = &config.camera;
    println!(
        "  Wheel force:   {:>8.1} N     Turn force:   {:>8.1} N·m",
        m.wheel_force, m.turn_force
    );
    println!(
        "  Max speed:     {:>8.1} m/s   Max turn:     {:>8.1} rad/s",
        m.max_speed, m.max_turn_speed
    );
    println!(
        "  Pitch range:   {:>4.0}..{:<4.0}°   Yaw range:    ±{:>6.0}°",
        c.min_vertical, c.max_vertical, c.max_horizontal
    );
    println!(
        "  Sensitivity:   {:>8.1}       Range:        {:>8.1} m",
        c.sensitivity, config.interaction.detection_range
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &session.events {
        let detail = match &e.event {
            ControllerEvent::PickedUp { body } => format!("body {}", body.0),
            ControllerEvent::Dropped { body, impulse: Some(j) } => {
                format!("body {} thrown |J|={:.2} N·s", body.0, j.norm())
            }
            ControllerEvent::Dropped { body, impulse: None } => format!("body {} released", body.0),
            ControllerEvent::Interacted { object } | ControllerEvent::GazeStarted { object } => {
                format!("object {object}")
            }
            ControllerEvent::MovementPulse | ControllerEvent::ScareCue => String::new(),
        };
        println!("  {:<16} t={:>6.2}s   {}", e.event.label().to_uppercase(), e.time, detail);
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Distance:      {:>8.2} m", summary.distance_m);
    println!("  Max speed:     {:>8.2} m/s", summary.max_speed_ms);
    println!(
        "  Final pose:    ({:.2}, {:.2}) m   heading {:.1}°",
        summary.final_position[0], summary.final_position[2], summary.final_yaw_deg
    );
    println!("  Holding time:  {:>8.2} s", summary.holding_time_s);
    println!();

    // -----------------------------------------------------------------------
    // Telemetry table (sampled)
    // -----------------------------------------------------------------------
    println!("  Telemetry");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>7}  {:>7}  {:>8}  {:>7}  {:>7}  {:>5}",
        "t (s)", "x (m)", "z (m)", "v (m/s)", "yaw °", "look °", "held"
    );
    println!("  {}", "─".repeat(60));

    let interval = (session.samples.len() / 30).max(1);
    for (i, s) in session.samples.iter().enumerate() {
        if i % interval != 0 && i != session.samples.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>7.2}  {:>7.2}  {:>8.3}  {:>7.1}  {:>7.1}  {:>5}",
            s.time,
            s.position.x,
            s.position.z,
            s.speed,
            s.yaw_deg,
            s.camera_yaw,
            if s.holding { "yes" } else { "" }
        );
    }

    println!();
    println!(
        "  Session: {} frames, {} fixed steps, dt_fixed={} s",
        session.frames, session.fixed_steps, session_config.fixed_dt
    );
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_session_file(path, &session.samples)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  Telemetry written to {}", path.display());
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &summary)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  Summary written to {}", path.display());
    }
    if let Some(path) = &args.events {
        csv::write_events_file(path, &session.events)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  Events written to {}", path.display());
    }

    Ok(())
}
