use super::{
    common::{GoalPose, Pose},
    flight_phase::PhaseRequest,
    pose_source::{GoalPublisher, TransformBuffer},
};
use crate::warn;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};

/// Cloneable write side of the control loop's shared inputs.
///
/// Every method returns without waiting on the control tick.
#[derive(Clone)]
pub struct ControllerHandle {
    requests: mpsc::Sender<PhaseRequest>,
    goals: GoalPublisher,
    poses: Arc<RwLock<TransformBuffer>>,
}

impl ControllerHandle {
    pub(super) fn new(
        requests: mpsc::Sender<PhaseRequest>,
        goals: GoalPublisher,
        poses: Arc<RwLock<TransformBuffer>>,
    ) -> Self {
        Self { requests, goals, poses }
    }

    pub fn request_takeoff(&self) -> bool { self.request(PhaseRequest::Takeoff) }

    pub fn request_land(&self) -> bool { self.request(PhaseRequest::Land) }

    /// Queues a request for the next tick; `false` if it had to be dropped.
    pub fn request(&self, request: PhaseRequest) -> bool {
        match self.requests.try_send(request) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping {request} request: {e}");
                false
            }
        }
    }

    pub fn update_goal(&self, pose: Pose) -> GoalPose { self.goals.publish(pose) }

    pub async fn update_vehicle_pose(&self, parent: &str, child: &str, stamp: DateTime<Utc>, pose: Pose) {
        self.poses.write().await.insert(parent, child, stamp, pose);
    }
}
