use std::fmt;

// ---------------------------------------------------------------------------
// Scene object identity
// ---------------------------------------------------------------------------

/// Stable identifier of a scene object (collider owner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Classification tags authored on scene objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Authored as `Look-at`.
    LookAt,
    /// Authored as `Pick-Up`.
    PickUp,
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// What the interaction scanner may do with a hit object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Activatable,
    Gazeable,
    Pickupable,
}

/// Closed set of capabilities, resolved once when a ray hit is produced.
/// An empty set is the `None` classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CapabilitySet {
    bits: u8,
}

impl CapabilitySet {
    pub const NONE: CapabilitySet = CapabilitySet { bits: 0 };

    fn bit(cap: Capability) -> u8 {
        match cap {
            Capability::Activatable => 0b001,
            Capability::Gazeable => 0b010,
            Capability::Pickupable => 0b100,
        }
    }

    pub fn with(mut self, cap: Capability) -> Self {
        self.bits |= Self::bit(cap);
        self
    }

    pub fn contains(&self, cap: Capability) -> bool {
        self.bits & Self::bit(cap) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Resolve components and tags into capabilities.
    ///
    /// - activation target attached → `Activatable`
    /// - gaze target attached *and* tagged `Look-at` → `Gazeable`
    /// - tagged `Pick-Up` → `Pickupable` (the body check happens at pickup time)
    pub fn classify(has_activation: bool, has_gaze: bool, tags: &[Tag]) -> Self {
        let mut set = CapabilitySet::NONE;
        if has_activation {
            set = set.with(Capability::Activatable);
        }
        if has_gaze && tags.contains(&Tag::LookAt) {
            set = set.with(Capability::Gazeable);
        }
        if tags.contains(&Tag::PickUp) {
            set = set.with(Capability::Pickupable);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Target behaviours
// ---------------------------------------------------------------------------

/// Object that reacts to the interact action.
pub trait ActivationTarget {
    fn interact(&mut self);
}

/// Object that reacts to being looked at.
pub trait GazeTarget {
    fn looked_at(&mut self);
}

impl<F: FnMut()> ActivationTarget for F {
    fn interact(&mut self) {
        self()
    }
}

/// Closure adapter for gaze targets (closures already implement
/// [`ActivationTarget`]).
pub struct OnLookedAt<F: FnMut()>(pub F);

impl<F: FnMut()> GazeTarget for OnLookedAt<F> {
    fn looked_at(&mut self) {
        (self.0)()
    }
}
