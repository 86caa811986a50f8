//! Newline-delimited JSON transport between the controller and the outside
//! world: goals, vehicle poses and takeoff/land triggers come in on stdin,
//! commands go out on stdout.

mod dispatch;
mod messages;
mod stdio;

use std::fmt;

pub use dispatch::{dispatch_line, run_inbound};
pub use messages::{InboundMessage, PoseMessage};
pub use stdio::{MessageSource, ScriptedSource, StdinSource, run_outbound};

#[derive(Debug)]
pub enum BridgeError {
    Io(std::io::Error),
    Malformed(serde_json::Error),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Io(e) => write!(f, "transport i/o: {e}"),
            BridgeError::Malformed(e) => write!(f, "malformed message: {e}"),
        }
    }
}

impl std::error::Error for BridgeError {}
