use nalgebra::Vector3;

pub const G0: f64 = 9.80665; // standard gravity, m/s^2

/// Uniform gravity acceleration (world frame, +Y up).
pub fn gravity_accel() -> Vector3<f64> {
    Vector3::new(0.0, -G0, 0.0)
}

/// Velocity scale applied per step for a damping coefficient.
/// Matches the `v / (1 + c·dt)` rule of common game physics engines.
pub fn damping_factor(coefficient: f64, dt: f64) -> f64 {
    1.0 / (1.0 + coefficient.max(0.0) * dt)
}
