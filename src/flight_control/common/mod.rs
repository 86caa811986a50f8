mod loop_clock;
mod pose;

pub use loop_clock::{LoopClock, delta_from_secs, secs};
pub use pose::{GoalPose, Pose, StampedPose, wrap_angle};
