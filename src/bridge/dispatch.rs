use super::{BridgeError, messages::InboundMessage, stdio::MessageSource};
use crate::flight_control::{ControllerHandle, common::LoopClock};
use crate::{error, event, info, warn};
use tokio_util::sync::CancellationToken;

/// Feeds inbound messages into the controller until the source ends or
/// `c_tok` is cancelled. Malformed lines are reported and skipped.
pub async fn run_inbound(
    mut source: Box<dyn MessageSource>,
    handle: ControllerHandle,
    clock: LoopClock,
    c_tok: CancellationToken,
) {
    loop {
        let line = tokio::select! {
            () = c_tok.cancelled() => break,
            line = source.next_line() => line,
        };
        match line {
            Ok(Some(line)) => {
                if let Err(e) = dispatch_line(&handle, clock, &line).await {
                    warn!("Skipping inbound line: {e}");
                }
            }
            Ok(None) => {
                info!("Inbound stream closed");
                break;
            }
            Err(e) => {
                error!("Inbound stream failed: {e}");
                break;
            }
        }
    }
}

pub async fn dispatch_line(handle: &ControllerHandle, clock: LoopClock, line: &str) -> Result<(), BridgeError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    let msg: InboundMessage = serde_json::from_str(line).map_err(BridgeError::Malformed)?;
    match msg {
        InboundMessage::Goal { pose } => {
            let goal = handle.update_goal(pose.into());
            event!("Goal at ({:.2}, {:.2}, {:.2})", goal.pose.x(), goal.pose.y(), goal.pose.z());
        }
        InboundMessage::VehiclePose { parent, child, stamp, pose } => {
            let stamp = stamp.unwrap_or_else(|| clock.now());
            handle.update_vehicle_pose(&parent, &child, stamp, pose.into()).await;
        }
        InboundMessage::Takeoff => {
            handle.request_takeoff();
        }
        InboundMessage::Land => {
            handle.request_land();
        }
    }
    Ok(())
}
