use super::{
    command::Command,
    common::{GoalPose, Pose, secs, wrap_angle},
    flight_phase::{FlightPhase, PhaseRequest},
    phase_context::{DescentRamp, PhaseContext},
    pid::PidController,
};
use crate::config::ControllerConfig;
use crate::{event, info, phase, warn};
use chrono::{DateTime, TimeDelta, Utc};

/// Snapshot of everything a tick consumes, taken once at its start.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Current vehicle pose, `None` if the pose source could not resolve one.
    pub vehicle: Option<Pose>,
    pub goal: Option<GoalPose>,
    /// Requests received since the previous tick, oldest first.
    pub requests: Vec<PhaseRequest>,
}

/// Flight phase state machine and per-phase control laws.
///
/// Owns the four axis controllers, the active phase and its context. Only
/// [`FlightController::on_tick`] mutates any of them.
#[derive(Debug)]
pub struct FlightController {
    pid_x: PidController,
    pid_y: PidController,
    pid_z: PidController,
    pid_yaw: PidController,
    phase: FlightPhase,
    ctx: PhaseContext,
    xy_dead_band: Option<f64>,
    nominal_dt: f64,
    last_tick: Option<DateTime<Utc>>,
    last_command: Command,
    pose_outage: bool,
}

impl FlightController {
    /// Altitude gain over the start height that ends the takeoff ramp.
    pub const TAKEOFF_CLEARANCE: f64 = 0.05;
    /// Open-loop thrust increase per second while taking off.
    pub const TAKEOFF_RAMP_RATE: f64 = 10_000.0;
    pub const HOVER_HEIGHT: f64 = 0.7;
    pub const LANDING_HEIGHT: f64 = 0.05;
    /// Altitude at or below which landing switches to the final thrust ramp.
    pub const LANDING_CUTOFF_HEIGHT: f64 = 0.35;
    /// Thrust offset countering gravity around the hover point.
    pub const HOVER_THRUST: f64 = 39_000.0;
    /// Oldest goal still considered tracked.
    pub const GOAL_TIMEOUT: TimeDelta = TimeDelta::seconds(1);
    pub const DESCENT_WINDOW: TimeDelta = TimeDelta::seconds(3);
    pub const DESCENT_STEP_INTERVAL: TimeDelta = TimeDelta::milliseconds(100);
    pub const DESCENT_STEP: f64 = 2_000.0;
    pub const SAFETY_WINDOW: TimeDelta = TimeDelta::seconds(3);
    /// Thrust decrease per second during a safety landing.
    pub const SAFETY_DECAY_RATE: f64 = 10_000.0;

    pub fn new(config: &ControllerConfig) -> Self {
        let nominal_dt = config.period_secs();
        Self {
            pid_x: PidController::new("x", &config.pids.x, nominal_dt),
            pid_y: PidController::new("y", &config.pids.y, nominal_dt),
            pid_z: PidController::new("z", &config.pids.z, nominal_dt),
            pid_yaw: PidController::new("yaw", &config.pids.yaw, nominal_dt),
            phase: FlightPhase::Idle,
            ctx: PhaseContext::default(),
            xy_dead_band: config.xy_integral_dead_band,
            nominal_dt,
            last_tick: None,
            last_command: Command::ZERO,
            pose_outage: false,
        }
    }

    pub fn phase(&self) -> FlightPhase { self.phase }
    pub fn context(&self) -> &PhaseContext { &self.ctx }
    pub fn last_command(&self) -> Command { self.last_command }

    /// Runs one control tick and returns the command to emit.
    pub fn on_tick(&mut self, now: DateTime<Utc>, input: TickInput) -> Command {
        let dt = self.tick_dt(now);
        for request in &input.requests {
            self.apply_request(*request);
        }
        self.track_pose_outage(input.vehicle.is_some());

        let command = match self.phase {
            FlightPhase::Idle => Command::ZERO,
            FlightPhase::TakingOff => self.taking_off(dt, input.vehicle.as_ref()),
            FlightPhase::Landing => self.landing(now, input.vehicle.as_ref(), input.goal.as_ref()),
            FlightPhase::Automatic => self.automatic(now, input.vehicle.as_ref(), input.goal.as_ref()),
            FlightPhase::SafetyLanding => self.safety_landing(now, dt),
        };
        event!("{} tick dt={dt:.4}s -> {command:?}", self.phase);
        self.last_command = command;
        command
    }

    fn tick_dt(&mut self, now: DateTime<Utc>) -> f64 {
        let dt = self
            .last_tick
            .map(|previous| secs(now - previous))
            .filter(|dt| *dt > 0.0)
            .unwrap_or(self.nominal_dt);
        self.last_tick = Some(now);
        dt
    }

    fn apply_request(&mut self, request: PhaseRequest) {
        match self.phase.on_request(request) {
            Some(FlightPhase::TakingOff) => {
                info!("Takeoff requested!");
                self.reset_pids();
                self.ctx.enter_takeoff();
                self.transition(FlightPhase::TakingOff, "takeoff request");
            }
            Some(FlightPhase::Landing) => {
                warn!("Landing requested!");
                self.ctx.enter_landing(Self::LANDING_HEIGHT);
                self.transition(FlightPhase::Landing, "land request");
            }
            Some(other) => self.transition(other, "request"),
            None => {
                let already = matches!(
                    (self.phase, request),
                    (FlightPhase::TakingOff, PhaseRequest::Takeoff) | (FlightPhase::Landing, PhaseRequest::Land)
                );
                if already {
                    event!("{request} request while already in {}", self.phase);
                } else {
                    warn!("Ignoring {request} request in phase {}", self.phase);
                }
            }
        }
    }

    fn transition(&mut self, to: FlightPhase, cause: &str) {
        phase!("{} -> {to} ({cause})", self.phase);
        if to == FlightPhase::Idle {
            self.ctx.enter_idle();
        }
        self.phase = to;
    }

    fn track_pose_outage(&mut self, pose_available: bool) {
        if !self.phase.needs_pose() {
            return;
        }
        if !pose_available && !self.pose_outage {
            warn!("Vehicle pose unavailable in {}, holding last command", self.phase);
        } else if pose_available && self.pose_outage {
            info!("Vehicle pose restored");
        }
        self.pose_outage = !pose_available;
    }

    fn reset_pids(&mut self) {
        self.pid_x.reset();
        self.pid_y.reset();
        self.pid_z.reset();
        self.pid_yaw.reset();
    }

    fn taking_off(&mut self, dt: f64, vehicle: Option<&Pose>) -> Command {
        let Some(pose) = vehicle else {
            return self.last_command;
        };
        let start_z = match self.ctx.start_z {
            Some(z) => z,
            None => {
                info!("Takeoff from z={:.3}", pose.z());
                *self.ctx.start_z.insert(pose.z())
            }
        };

        if pose.z() > start_z + Self::TAKEOFF_CLEARANCE {
            self.reset_pids();
            self.ctx.thrust = 0.0;
            self.transition(FlightPhase::Automatic, "takeoff altitude reached");
            self.last_command
        } else {
            self.ctx.thrust += Self::TAKEOFF_RAMP_RATE * dt;
            self.ctx.last_thrust = self.ctx.thrust;
            Command::thrust_only(self.ctx.thrust)
        }
    }

    fn landing(&mut self, now: DateTime<Utc>, vehicle: Option<&Pose>, goal: Option<&GoalPose>) -> Command {
        if self.ctx.descent.is_some() {
            return self.descent_ramp(now);
        }
        if vehicle.is_some_and(|pose| pose.z() <= Self::LANDING_CUTOFF_HEIGHT) {
            info!("Below {}m, cutting thrust", Self::LANDING_CUTOFF_HEIGHT);
            self.ctx.descent = Some(DescentRamp { started: now, last_step: now });
            return self.descent_step();
        }
        // Closed-loop descent toward the landing height until near ground.
        self.automatic(now, vehicle, goal)
    }

    fn descent_ramp(&mut self, now: DateTime<Utc>) -> Command {
        let Some(mut ramp) = self.ctx.descent else {
            return Command::ZERO;
        };
        if now - ramp.started >= Self::DESCENT_WINDOW {
            self.transition(FlightPhase::Idle, "landing complete");
            return Command::ZERO;
        }
        if now - ramp.last_step >= Self::DESCENT_STEP_INTERVAL {
            ramp.last_step += Self::DESCENT_STEP_INTERVAL;
            self.ctx.descent = Some(ramp);
            return self.descent_step();
        }
        Command::thrust_only(self.ctx.last_thrust)
    }

    fn descent_step(&mut self) -> Command {
        self.ctx.last_thrust = (self.ctx.last_thrust - Self::DESCENT_STEP).max(0.0);
        Command::thrust_only(self.ctx.last_thrust)
    }

    fn automatic(&mut self, now: DateTime<Utc>, vehicle: Option<&Pose>, goal: Option<&GoalPose>) -> Command {
        let goal = match goal {
            Some(goal) if now - goal.received_at <= Self::GOAL_TIMEOUT => goal,
            _ => {
                warn!("Goal lost for more than {}s, safety landing", Self::GOAL_TIMEOUT.num_seconds());
                self.ctx.enter_safety_landing(now);
                self.transition(FlightPhase::SafetyLanding, "goal watchdog");
                return self.last_command;
            }
        };
        let Some(pose) = vehicle else {
            return self.last_command;
        };
        if self.phase != FlightPhase::Landing {
            self.ctx.target_height = Self::HOVER_HEIGHT;
        }

        let offset = pose.planar_offset_from(&goal.pose);
        let linear_x = if self.holds_integral(offset.x) {
            self.pid_x.update_without_i(0.0, offset.x, now)
        } else {
            self.pid_x.update(0.0, offset.x, now)
        };
        let linear_y = if self.holds_integral(offset.y) {
            self.pid_y.update_without_i(0.0, offset.y, now)
        } else {
            self.pid_y.update(0.0, offset.y, now)
        };
        let linear_z = Self::HOVER_THRUST + self.pid_z.update(self.ctx.target_height, pose.z(), now);
        let yaw_error = wrap_angle(pose.yaw() - goal.pose.yaw());
        let angular_z = self.pid_yaw.update(0.0, yaw_error, now);

        self.ctx.last_thrust = linear_z;
        Command { linear_x, linear_y, linear_z, angular_z }
    }

    /// Whether the x/y integrator is held for this offset. Without a
    /// configured dead-band it never is.
    fn holds_integral(&self, offset: f64) -> bool {
        self.xy_dead_band.is_some_and(|width| offset.abs() < width)
    }

    fn safety_landing(&mut self, now: DateTime<Utc>, dt: f64) -> Command {
        let started = *self.ctx.safety_start.get_or_insert(now);
        if now - started < Self::SAFETY_WINDOW && self.ctx.last_thrust > 0.0 {
            self.ctx.last_thrust = (self.ctx.last_thrust - Self::SAFETY_DECAY_RATE * dt).max(0.0);
            Command::thrust_only(self.ctx.last_thrust)
        } else {
            self.transition(FlightPhase::Idle, "safety landing complete");
            Command::ZERO
        }
    }
}
