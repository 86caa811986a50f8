use super::GoalSource;
use crate::flight_control::common::{GoalPose, LoopClock, Pose};
use std::sync::Arc;
use tokio::sync::watch;

/// Creates the publisher/monitor pair sharing the latest goal.
pub fn goal_channel(clock: LoopClock) -> (GoalPublisher, GoalMonitor) {
    let (tx, rx) = watch::channel(None);
    (GoalPublisher { tx: Arc::new(tx), clock }, GoalMonitor { rx })
}

/// Write side; stamps each goal with its receive time.
#[derive(Debug, Clone)]
pub struct GoalPublisher {
    tx: Arc<watch::Sender<Option<GoalPose>>>,
    clock: LoopClock,
}

impl GoalPublisher {
    /// Replaces the current goal. Never waits on readers.
    pub fn publish(&self, pose: Pose) -> GoalPose {
        let goal = GoalPose { pose, received_at: self.clock.now() };
        self.tx.send_replace(Some(goal));
        goal
    }
}

/// Read side handed to the control loop.
#[derive(Debug, Clone)]
pub struct GoalMonitor {
    rx: watch::Receiver<Option<GoalPose>>,
}

impl GoalSource for GoalMonitor {
    fn goal(&self) -> Option<GoalPose> { *self.rx.borrow() }
}
