use crate::flight_control::common::Pose;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One line of the inbound stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    Goal {
        pose: PoseMessage,
    },
    VehiclePose {
        parent: String,
        child: String,
        /// Time the pose was valid at; receive time if absent.
        #[serde(default)]
        stamp: Option<DateTime<Utc>>,
        pose: PoseMessage,
    },
    Takeoff,
    Land,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PoseMessage {
    pub position: [f64; 3],
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default = "PoseMessage::identity")]
    pub orientation: [f64; 4],
}

impl PoseMessage {
    fn identity() -> [f64; 4] { [0.0, 0.0, 0.0, 1.0] }
}

impl From<PoseMessage> for Pose {
    fn from(msg: PoseMessage) -> Self { Pose::from_components(msg.position, msg.orientation) }
}
