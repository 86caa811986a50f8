use super::{PoseError, VehiclePoseSource};
use crate::flight_control::common::{Pose, StampedPose};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{HashMap, VecDeque};

/// Bounded history of stamped poses per `(parent, child)` frame pair.
#[derive(Debug)]
pub struct TransformBuffer {
    history: HashMap<(String, String), VecDeque<StampedPose>>,
    max_age: TimeDelta,
}

impl TransformBuffer {
    /// Samples kept per frame pair.
    const CAPACITY: usize = 64;

    pub fn new(max_age: TimeDelta) -> Self { Self { history: HashMap::new(), max_age } }

    /// Stores a sample, keeping each history ordered by stamp.
    pub fn insert(&mut self, parent: &str, child: &str, stamp: DateTime<Utc>, pose: Pose) {
        let samples = self
            .history
            .entry((parent.to_string(), child.to_string()))
            .or_insert_with(|| VecDeque::with_capacity(Self::CAPACITY));
        let sample = StampedPose { stamp, pose };
        match samples.back() {
            Some(last) if last.stamp > stamp => {
                let idx = samples.partition_point(|s| s.stamp <= stamp);
                samples.insert(idx, sample);
            }
            _ => samples.push_back(sample),
        }
        while samples.len() > Self::CAPACITY {
            samples.pop_front();
        }
    }
}

impl VehiclePoseSource for TransformBuffer {
    fn vehicle_pose(&self, world_frame: &str, frame: &str, at: DateTime<Utc>) -> Result<StampedPose, PoseError> {
        let samples = self
            .history
            .get(&(world_frame.to_string(), frame.to_string()))
            .ok_or_else(|| PoseError::UnknownFrames { parent: world_frame.to_string(), child: frame.to_string() })?;
        let idx = samples.partition_point(|s| s.stamp <= at);
        let sample = idx.checked_sub(1).and_then(|i| samples.get(i)).ok_or(PoseError::NoSampleBefore(at))?;
        let age = at - sample.stamp;
        if age > self.max_age {
            return Err(PoseError::Stale { age });
        }
        Ok(*sample)
    }
}
