use super::{
    command::{Command, CommandSink},
    common::LoopClock,
    flight_phase::PhaseRequest,
    flight_controller::{FlightController, TickInput},
    handle::ControllerHandle,
    pose_source::{GoalMonitor, GoalSource, TransformBuffer, VehiclePoseSource, goal_channel},
};
use crate::config::ControllerConfig;
use crate::{event, info, warn};
use chrono::{DateTime, Utc};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{RwLock, mpsc},
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;

/// Fixed-rate driver around [`FlightController`].
///
/// Each tick drains the pending requests, snapshots goal and vehicle pose,
/// runs the controller and hands the command to the sink.
pub struct ControlLoop<S: CommandSink> {
    controller: FlightController,
    requests: mpsc::Receiver<PhaseRequest>,
    goals: GoalMonitor,
    poses: Arc<RwLock<TransformBuffer>>,
    sink: S,
    world_frame: String,
    frame: String,
    period: Duration,
    clock: LoopClock,
}

impl<S: CommandSink> ControlLoop<S> {
    const REQUEST_QUEUE: usize = 8;

    pub fn new(config: &ControllerConfig, clock: LoopClock, sink: S) -> (Self, ControllerHandle) {
        let (req_tx, req_rx) = mpsc::channel(Self::REQUEST_QUEUE);
        let (publisher, monitor) = goal_channel(clock);
        let poses = Arc::new(RwLock::new(TransformBuffer::new(config.max_pose_age_delta())));
        let handle = ControllerHandle::new(req_tx, publisher, Arc::clone(&poses));
        (
            Self {
                controller: FlightController::new(config),
                requests: req_rx,
                goals: monitor,
                poses,
                sink,
                world_frame: config.world_frame.clone(),
                frame: config.frame.clone(),
                period: config.period(),
                clock,
            },
            handle,
        )
    }

    pub fn controller(&self) -> &FlightController { &self.controller }

    /// Ticks at the configured rate until `c_tok` is cancelled.
    ///
    /// Late ticks are delayed rather than bunched, so two ticks never run
    /// closer than one period apart.
    pub async fn run(mut self, c_tok: CancellationToken) -> FlightController {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Control loop running at {:.1}Hz for {}", 1.0 / self.period.as_secs_f64(), self.frame);
        loop {
            tokio::select! {
                biased;
                () = c_tok.cancelled() => break,
                _ = ticker.tick() => {
                    let now = self.clock.now();
                    self.step(now).await;
                }
            }
        }
        let phase = self.controller.phase();
        if phase.is_airborne() {
            warn!("Control loop stopped while in {phase}");
        } else {
            info!("Control loop stopped");
        }
        self.controller
    }

    /// One control tick at `now`.
    pub async fn step(&mut self, now: DateTime<Utc>) -> Command {
        let mut requests = Vec::new();
        while let Ok(request) = self.requests.try_recv() {
            requests.push(request);
        }
        let goal = self.goals.goal();
        let vehicle = match self.poses.read().await.vehicle_pose(&self.world_frame, &self.frame, now) {
            Ok(sample) => Some(sample.pose),
            Err(e) => {
                event!("Pose lookup failed: {e}");
                None
            }
        };
        let command = self.controller.on_tick(now, TickInput { vehicle, goal, requests });
        self.sink.emit(command);
        command
    }
}
