use nalgebra::Vector2;

use crate::controller::{InputEvent, Signal};

// ---------------------------------------------------------------------------
// Input script trait
// ---------------------------------------------------------------------------

/// Source of input events for a scripted session.
pub trait InputScript {
    /// Events whose timestamp falls in `[from, to)`, in delivery order.
    fn poll(&mut self, from: f64, to: f64) -> Vec<InputEvent>;

    /// Rewind to the start.
    fn reset(&mut self);

    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Timed script
// ---------------------------------------------------------------------------

/// Fixed list of timestamped events. Events sharing a timestamp keep their
/// insertion order.
#[derive(Debug, Clone)]
pub struct TimedScript {
    name: String,
    steps: Vec<(f64, InputEvent)>,
    cursor: usize,
}

impl TimedScript {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), steps: vec![], cursor: 0 }
    }

    pub fn at(mut self, time: f64, event: InputEvent) -> Self {
        let idx = self.steps.partition_point(|(t, _)| *t <= time);
        self.steps.insert(idx, (time, event));
        self
    }

    pub fn press(self, time: f64, signal: Signal) -> Self {
        self.at(time, InputEvent::Pressed(signal))
    }

    pub fn release(self, time: f64, signal: Signal) -> Self {
        self.at(time, InputEvent::Released(signal))
    }

    /// Press now, release 50 ms later.
    pub fn tap(self, time: f64, signal: Signal) -> Self {
        self.press(time, signal).release(time + 0.05, signal)
    }

    /// Hold the look value from `start` until `end`, then return to rest.
    pub fn look(self, start: f64, end: f64, value: Vector2<f64>) -> Self {
        self.at(start, InputEvent::Look(value)).at(end, InputEvent::Look(Vector2::zeros()))
    }

    /// `count` scroll pushes of `amount`, `interval` seconds apart.
    pub fn pushes(mut self, start: f64, count: usize, interval: f64, amount: f64) -> Self {
        for i in 0..count {
            self = self.at(start + i as f64 * interval, InputEvent::Scroll(Vector2::new(0.0, amount)));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time of the last scripted event.
    pub fn end_time(&self) -> f64 {
        self.steps.last().map_or(0.0, |(t, _)| *t)
    }
}

impl InputScript for TimedScript {
    fn poll(&mut self, from: f64, to: f64) -> Vec<InputEvent> {
        let mut out = vec![];
        while let Some((t, event)) = self.steps.get(self.cursor) {
            if *t >= to {
                break;
            }
            if *t >= from {
                out.push(*event);
            }
            self.cursor += 1;
        }
        out
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_delivers_each_event_once_in_order() {
        let mut s = TimedScript::new("t")
            .press(0.5, Signal::Pickup)
            .tap(0.1, Signal::Interact)
            .pushes(0.2, 3, 0.1, 1.0);
        assert_eq!(s.len(), 6);

        let first = s.poll(0.0, 0.25);
        assert_eq!(first[0], InputEvent::Pressed(Signal::Interact));
        assert_eq!(first[1], InputEvent::Released(Signal::Interact));
        assert!(matches!(first[2], InputEvent::Scroll(_)));
        assert_eq!(first.len(), 3);

        let rest = s.poll(0.25, 1.0);
        assert_eq!(rest.len(), 3);
        assert_eq!(rest.last(), Some(&InputEvent::Pressed(Signal::Pickup)));
        assert!(s.poll(1.0, 2.0).is_empty());

        s.reset();
        assert_eq!(s.poll(0.0, 10.0).len(), 6);
    }

    #[test]
    fn same_time_keeps_insertion_order() {
        let mut s = TimedScript::new("t")
            .press(1.0, Signal::LeftWheel)
            .press(1.0, Signal::RightWheel);
        assert_eq!(
            s.poll(0.0, 2.0),
            vec![InputEvent::Pressed(Signal::LeftWheel), InputEvent::Pressed(Signal::RightWheel)]
        );
    }

    #[test]
    fn look_returns_to_rest() {
        let s = TimedScript::new("t").look(1.0, 2.0, Vector2::new(3.0, 0.0));
        assert_eq!(s.end_time(), 2.0);
        assert_eq!(s.steps[1].1, InputEvent::Look(Vector2::zeros()));
    }
}
