use chrono::{DateTime, Utc};
use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};
use std::f64::consts::PI;

/// Position and orientation of a body in the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    position: Vector3<f64>,
    orientation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self { position, orientation }
    }

    /// Builds a pose from raw quaternion components `(x, y, z, w)`,
    /// normalising them. A zero quaternion is read as identity.
    pub fn from_components(position: [f64; 3], orientation: [f64; 4]) -> Self {
        let [qx, qy, qz, qw] = orientation;
        let q = Quaternion::new(qw, qx, qy, qz);
        let orientation =
            UnitQuaternion::try_new(q, f64::EPSILON).unwrap_or_else(UnitQuaternion::identity);
        Self::new(Vector3::from(position), orientation)
    }

    pub fn at_height(x: f64, y: f64, z: f64) -> Self {
        Self::new(Vector3::new(x, y, z), UnitQuaternion::identity())
    }

    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.orientation = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
        self
    }

    pub fn x(&self) -> f64 { self.position.x }
    pub fn y(&self) -> f64 { self.position.y }
    pub fn z(&self) -> f64 { self.position.z }

    /// Heading about the world z axis (ZYX convention), in `(-pi, pi]`.
    pub fn yaw(&self) -> f64 {
        let (_roll, _pitch, yaw) = self.orientation.euler_angles();
        yaw
    }

    /// Horizontal position of `self` relative to `reference`, expressed in
    /// the heading frame of `self`.
    pub fn planar_offset_from(&self, reference: &Pose) -> Vector2<f64> {
        let world = Vector2::new(self.x() - reference.x(), self.y() - reference.y());
        let (sin, cos) = self.yaw().sin_cos();
        Vector2::new(cos * world.x + sin * world.y, -sin * world.x + cos * world.y)
    }
}

impl Default for Pose {
    fn default() -> Self { Self::new(Vector3::zeros(), UnitQuaternion::identity()) }
}

/// A vehicle pose together with the time it was valid at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampedPose {
    pub stamp: DateTime<Utc>,
    pub pose: Pose,
}

/// Most recent tracking target and the time it arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalPose {
    pub pose: Pose,
    pub received_at: DateTime<Utc>,
}

/// Wraps an angle into `(-pi, pi]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI { wrapped + 2.0 * PI } else { wrapped }
}
