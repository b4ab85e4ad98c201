use nalgebra::{UnitQuaternion, Vector2, Vector3};

use crate::config::CameraConfig;
use crate::physics::Pose;

/// Accumulated look angles, degrees. Pitch positive looks down; yaw is an
/// offset from the vehicle heading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraOrientation {
    pub pitch: f64,
    pub yaw: f64,
}

/// Rotation for Euler angles `(pitch, yaw, 0)` in degrees, yaw applied last.
pub fn euler_rotation(pitch_deg: f64, yaw_deg: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_deg.to_radians())
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch_deg.to_radians())
}

/// First-person camera coupled to the vehicle body.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub config: CameraConfig,
    orientation: CameraOrientation,
    camera: Option<Pose>,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        Self { config, orientation: CameraOrientation::default(), camera: None }
    }

    /// Attach a camera transform. Without one, look and follow are skipped.
    pub fn attach(&mut self, pose: Pose) {
        self.camera = Some(pose);
    }

    pub fn pose(&self) -> Option<Pose> {
        self.camera
    }

    pub fn orientation(&self) -> CameraOrientation {
        self.orientation
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.config.sensitivity = sensitivity;
    }

    pub fn handle_look(&mut self, look: Vector2<f64>, dt: f64, body_yaw_deg: f64) {
        let Some(camera) = self.camera.as_mut() else { return };
        let c = &self.config;
        let o = &mut self.orientation;

        o.pitch = (o.pitch - look.y * c.sensitivity * dt).clamp(c.min_vertical, c.max_vertical);
        o.yaw = (o.yaw + look.x * c.sensitivity * dt).clamp(-c.max_horizontal, c.max_horizontal);

        camera.rotation = euler_rotation(o.pitch, body_yaw_deg + o.yaw);
    }

    /// Exponential smoothing toward `body_position + offset`.
    pub fn follow_target(&mut self, dt: f64, body_position: Vector3<f64>) {
        let Some(camera) = self.camera.as_mut() else { return };
        let target = body_position + self.config.offset_vec();
        let t = (dt * self.config.follow_smooth).clamp(0.0, 1.0);
        camera.position = camera.position.lerp(&target, t);
    }
}
