//! Sources of the two poses the control law consumes: the vehicle pose
//! resolved in the world frame, and the latest tracking goal.

mod goal_monitor;
mod transform_buffer;

use crate::flight_control::common::{GoalPose, StampedPose};
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

pub use goal_monitor::{GoalMonitor, GoalPublisher, goal_channel};
pub use transform_buffer::TransformBuffer;

pub trait VehiclePoseSource {
    /// Pose of `frame` in `world_frame` valid at or before `at`.
    fn vehicle_pose(&self, world_frame: &str, frame: &str, at: DateTime<Utc>) -> Result<StampedPose, PoseError>;
}

pub trait GoalSource {
    fn goal(&self) -> Option<GoalPose>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoseError {
    UnknownFrames { parent: String, child: String },
    NoSampleBefore(DateTime<Utc>),
    Stale { age: TimeDelta },
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::UnknownFrames { parent, child } => {
                write!(f, "no transform between {parent} and {child}")
            }
            PoseError::NoSampleBefore(t) => write!(f, "no pose sample at or before {}", t.format("%H:%M:%S%.3f")),
            PoseError::Stale { age } => write!(f, "latest pose is {}ms old", age.num_milliseconds()),
        }
    }
}

impl std::error::Error for PoseError {}

#[cfg(test)]
mod tests;
