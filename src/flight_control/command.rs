use crate::warn;
use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Velocity/thrust setpoint emitted once per tick.
///
/// `linear_z` carries the raw thrust value, not a vertical velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Command {
    pub linear_x: f64,
    pub linear_y: f64,
    pub linear_z: f64,
    pub angular_z: f64,
}

impl Command {
    pub const ZERO: Command = Command { linear_x: 0.0, linear_y: 0.0, linear_z: 0.0, angular_z: 0.0 };

    /// Pure vertical command: no x/y velocity and no yaw rate.
    pub fn thrust_only(thrust: f64) -> Self { Command { linear_z: thrust, ..Self::ZERO } }

    pub fn thrust(&self) -> f64 { self.linear_z }
}

/// Receives the command of every tick.
///
/// Implementations must not block: the control loop calls this from inside
/// its tick.
pub trait CommandSink: Send {
    fn emit(&mut self, command: Command);
}

/// Forwards commands into a bounded channel without waiting.
///
/// A full or closed channel drops the command; drops are reported on the
/// first occurrence and then every 50 drops.
pub struct ChannelSink {
    tx: mpsc::Sender<Command>,
    dropped: u64,
}

impl ChannelSink {
    const REPORT_EVERY: u64 = 50;

    pub fn new(tx: mpsc::Sender<Command>) -> Self { Self { tx, dropped: 0 } }

    pub fn dropped(&self) -> u64 { self.dropped }
}

impl CommandSink for ChannelSink {
    fn emit(&mut self, command: Command) {
        if let Err(e) = self.tx.try_send(command) {
            if self.dropped % Self::REPORT_EVERY == 0 {
                let reason = match e {
                    TrySendError::Full(_) => "queue full",
                    TrySendError::Closed(_) => "receiver closed",
                };
                warn!("Dropping command ({reason}), {} dropped so far", self.dropped + 1);
            }
            self.dropped += 1;
        }
    }
}
