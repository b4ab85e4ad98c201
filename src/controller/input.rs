use std::collections::BTreeSet;
use std::fmt;

use nalgebra::Vector2;
use tracing::warn;

// ---------------------------------------------------------------------------
// Logical input signals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    LeftWheel,
    RightWheel,
    Scroll,
    Look,
    Interact,
    Pickup,
    Jumpscare,
}

impl Signal {
    pub const ALL: [Signal; 7] = [
        Signal::LeftWheel,
        Signal::RightWheel,
        Signal::Scroll,
        Signal::Look,
        Signal::Interact,
        Signal::Pickup,
        Signal::Jumpscare,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Signal::LeftWheel => "left_wheel",
            Signal::RightWheel => "right_wheel",
            Signal::Scroll => "scroll",
            Signal::Look => "look",
            Signal::Interact => "interact",
            Signal::Pickup => "pickup",
            Signal::Jumpscare => "jumpscare",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelSide {
    Left,
    Right,
}

/// One event delivered by the input host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pressed(Signal),
    Released(Signal),
    /// Scroll value; only `y` drives pushes.
    Scroll(Vector2<f64>),
    /// Look value, held until the next look event.
    Look(Vector2<f64>),
}

impl InputEvent {
    pub fn signal(&self) -> Signal {
        match self {
            InputEvent::Pressed(s) | InputEvent::Released(s) => *s,
            InputEvent::Scroll(_) => Signal::Scroll,
            InputEvent::Look(_) => Signal::Look,
        }
    }
}

// ---------------------------------------------------------------------------
// Input host seam
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("host rejected subscription: {0}")]
    Rejected(String),
}

/// Host-side input system. Unbound signals are skipped, not errors.
pub trait InputHost {
    fn is_bound(&self, signal: Signal) -> bool;
    fn enable(&mut self, signal: Signal);
    fn disable(&mut self, signal: Signal);
    fn subscribe(&mut self, signal: Signal) -> Result<(), BindingError>;
    fn unsubscribe(&mut self, signal: Signal);
}

/// Signals currently subscribed by a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    active: Vec<Signal>,
}

impl Subscriptions {
    pub fn is_active(&self, signal: Signal) -> bool {
        self.active.contains(&signal)
    }

    pub fn signals(&self) -> &[Signal] {
        &self.active
    }

    /// Unsubscribe and disable every signal, most recent first.
    pub fn release<H: InputHost + ?Sized>(self, host: &mut H) {
        for s in self.active.iter().rev() {
            host.unsubscribe(*s);
            host.disable(*s);
        }
    }
}

/// Releases everything acquired so far unless committed.
struct Acquisition<'h, H: InputHost + ?Sized> {
    host: &'h mut H,
    acquired: Vec<Signal>,
    committed: bool,
}

impl<H: InputHost + ?Sized> Drop for Acquisition<'_, H> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for s in self.acquired.iter().rev() {
            self.host.unsubscribe(*s);
            self.host.disable(*s);
        }
    }
}

/// Enable and subscribe every bound signal. On failure all signals acquired
/// by this call are released before the error is returned.
pub fn acquire<H: InputHost + ?Sized>(
    host: &mut H,
    signals: &[Signal],
) -> Result<Subscriptions, (Signal, BindingError)> {
    let mut guard = Acquisition { host, acquired: Vec::with_capacity(signals.len()), committed: false };
    for &signal in signals {
        if !guard.host.is_bound(signal) {
            continue;
        }
        guard.host.enable(signal);
        if let Err(e) = guard.host.subscribe(signal) {
            guard.host.disable(signal);
            warn!(%signal, error = %e, rolled_back = guard.acquired.len(), "input subscription failed");
            return Err((signal, e));
        }
        guard.acquired.push(signal);
    }
    guard.committed = true;
    Ok(Subscriptions { active: std::mem::take(&mut guard.acquired) })
}

// ---------------------------------------------------------------------------
// Momentary action edge detection
// ---------------------------------------------------------------------------

/// Turns press/release events into a once-per-tick "just pressed" flag.
/// Every up-to-down transition since the last sample counts, so a tap or a
/// release and re-press between two samples still reports one press.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    down: bool,
    fresh: bool,
}

impl EdgeDetector {
    pub fn press(&mut self) {
        if !self.down {
            self.fresh = true;
        }
        self.down = true;
    }

    pub fn release(&mut self) {
        self.down = false;
    }

    /// Call exactly once per variable tick.
    pub fn sample(&mut self) -> bool {
        std::mem::take(&mut self.fresh)
    }

    pub fn reset(&mut self) {
        *self = EdgeDetector::default();
    }
}

// ---------------------------------------------------------------------------
// In-memory host
// ---------------------------------------------------------------------------

/// Input host backed by sets, used by scripted sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub bound: BTreeSet<Signal>,
    pub enabled: BTreeSet<Signal>,
    pub subscribed: BTreeSet<Signal>,
    /// Signals whose subscription is refused.
    pub reject: BTreeSet<Signal>,
}

impl MemoryHost {
    /// Host with every signal bound.
    pub fn all_bound() -> Self {
        Self { bound: Signal::ALL.into_iter().collect(), ..Default::default() }
    }

    pub fn with_bound(signals: &[Signal]) -> Self {
        Self { bound: signals.iter().copied().collect(), ..Default::default() }
    }
}

impl InputHost for MemoryHost {
    fn is_bound(&self, signal: Signal) -> bool {
        self.bound.contains(&signal)
    }

    fn enable(&mut self, signal: Signal) {
        self.enabled.insert(signal);
    }

    fn disable(&mut self, signal: Signal) {
        self.enabled.remove(&signal);
    }

    fn subscribe(&mut self, signal: Signal) -> Result<(), BindingError> {
        if self.reject.contains(&signal) {
            return Err(BindingError::Rejected(format!("{signal} is locked by another consumer")));
        }
        self.subscribed.insert(signal);
        Ok(())
    }

    fn unsubscribe(&mut self, signal: Signal) {
        self.subscribed.remove(&signal);
    }
}
