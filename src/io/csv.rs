use std::io::{self, Write};
use std::path::Path;

use crate::controller::TimedEvent;
use crate::sim::Sample;

/// Write session telemetry to CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, yaw_deg, speed,
///          cam_pitch_deg, cam_yaw_deg, holding, prompt
pub fn write_session<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,yaw_deg,speed,\
         cam_pitch_deg,cam_yaw_deg,holding,prompt"
    )?;

    for s in samples {
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.2},{:.4},\
             {:.2},{:.2},{},{}",
            s.time,
            s.position.x, s.position.y, s.position.z,
            s.yaw_deg,
            s.speed,
            s.camera_pitch,
            s.camera_yaw,
            u8::from(s.holding),
            u8::from(s.prompt_visible),
        )?;
    }

    Ok(())
}

/// Write the event log as `time,event` rows.
pub fn write_events<W: Write>(writer: &mut W, events: &[TimedEvent]) -> io::Result<()> {
    writeln!(writer, "time,event")?;
    for e in events {
        writeln!(writer, "{:.4},{}", e.time, e.event.label())?;
    }
    Ok(())
}

/// Write session telemetry to a CSV file at the given path.
pub fn write_session_file(path: &Path, samples: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_session(&mut file, samples)
}

/// Write the event log to a CSV file at the given path.
pub fn write_events_file(path: &Path, events: &[TimedEvent]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_events(&mut file, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerEvent;
    use nalgebra::Vector3;

    fn sample(time: f64, z: f64, holding: bool) -> Sample {
        Sample {
            time,
            position: Vector3::new(0.0, 0.5, z),
            yaw_deg: 0.0,
            speed: 0.0,
            camera_pitch: 0.0,
            camera_yaw: 12.5,
            holding,
            prompt_visible: false,
        }
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let samples = vec![sample(0.0, 0.0, false), sample(0.0167, 0.01, true)];

        let mut buf = Vec::new();
        write_session(&mut buf, &samples).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,"));
        assert!(lines[2].ends_with(",12.50,1,0"));
    }

    #[test]
    fn event_rows_use_labels() {
        let events = vec![TimedEvent { time: 1.5, event: ControllerEvent::ScareCue }];
        let mut buf = Vec::new();
        write_events(&mut buf, &events).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output.lines().nth(1), Some("1.5000,scare_cue"));
    }

    #[test]
    fn event_file_matches_writer_output() {
        let events = vec![
            TimedEvent { time: 0.25, event: ControllerEvent::MovementPulse },
            TimedEvent { time: 1.5, event: ControllerEvent::ScareCue },
        ];
        let path = std::env::temp_dir().join(format!("wheelchair-events-{}.csv", std::process::id()));
        write_events_file(&path, &events).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, "time,event\n0.2500,movement_pulse\n1.5000,scare_cue\n");
    }
}
