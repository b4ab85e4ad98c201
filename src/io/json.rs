use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::sim::Session;

/// Summary statistics computed from a recorded session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub duration_s: f64,
    pub frames: usize,
    pub fixed_steps: usize,
    pub distance_m: f64,
    pub max_speed_ms: f64,
    pub final_position: [f64; 3],
    pub final_yaw_deg: f64,
    pub holding_time_s: f64,
    /// Event counts keyed by label.
    pub events: BTreeMap<String, usize>,
}

impl SessionSummary {
    pub fn from_session(session: &Session) -> Self {
        let max_speed_ms = session.samples.iter().map(|s| s.speed).fold(0.0_f64, f64::max);

        let holding_time_s = session
            .samples
            .windows(2)
            .filter(|w| w[1].holding)
            .map(|w| w[1].time - w[0].time)
            .sum();

        let mut events = BTreeMap::new();
        for e in &session.events {
            *events.entry(e.event.label().to_string()).or_insert(0) += 1;
        }

        let (duration_s, final_position, final_yaw_deg) = session
            .samples
            .last()
            .map_or((0.0, [0.0; 3], 0.0), |s| (s.time, s.position.into(), s.yaw_deg));

        SessionSummary {
            name: session.name.clone(),
            duration_s,
            frames: session.frames,
            fixed_steps: session.fixed_steps,
            distance_m: session.distance_travelled(),
            max_speed_ms,
            final_position,
            final_yaw_deg,
            holding_time_s,
            events,
        }
    }
}

/// Write session summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &SessionSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer).map_err(serde_json::Error::io)
}

/// Write session summary JSON to a file.
pub fn write_summary_file(path: &Path, summary: &SessionSummary) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary).map_err(std::io::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerEvent, TimedEvent};
    use crate::physics::BodyHandle;
    use crate::sim::Sample;
    use nalgebra::Vector3;

    fn sample(time: f64, z: f64, speed: f64, holding: bool) -> Sample {
        Sample {
            time,
            position: Vector3::new(0.0, 0.5, z),
            yaw_deg: 10.0,
            speed,
            camera_pitch: 0.0,
            camera_yaw: 0.0,
            holding,
            prompt_visible: false,
        }
    }

    fn simple_session() -> Session {
        Session {
            name: "Test".into(),
            samples: vec![
                sample(0.0, 0.0, 0.0, false),
                sample(1.0, 1.0, 2.0, true),
                sample(2.0, 3.0, 1.0, true),
                sample(3.0, 3.0, 0.0, false),
            ],
            events: vec![
                TimedEvent { time: 0.5, event: ControllerEvent::MovementPulse },
                TimedEvent { time: 0.9, event: ControllerEvent::PickedUp { body: BodyHandle(1) } },
                TimedEvent { time: 1.5, event: ControllerEvent::MovementPulse },
            ],
            frames: 3,
            fixed_steps: 150,
        }
    }

    #[test]
    fn summary_computes_travel_and_counts() {
        let s = SessionSummary::from_session(&simple_session());
        assert!((s.distance_m - 3.0).abs() < 1e-12);
        assert_eq!(s.max_speed_ms, 2.0);
        assert!((s.holding_time_s - 2.0).abs() < 1e-12);
        assert_eq!(s.events.get("movement_pulse"), Some(&2));
        assert_eq!(s.events.get("picked_up"), Some(&1));
        assert_eq!(s.final_position, [0.0, 0.5, 3.0]);
    }

    #[test]
    fn json_output_is_valid() {
        let summary = SessionSummary::from_session(&simple_session());
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["name"], "Test");
        assert_eq!(value["events"]["movement_pulse"], 2);
        assert_eq!(value["fixed_steps"], 150);
    }
}
