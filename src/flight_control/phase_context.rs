use chrono::{DateTime, Utc};

/// Working state of the active flight phase.
///
/// Fields are written on phase entry and only read while that phase is
/// active; `last_thrust` is the one value carried across phases.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseContext {
    pub(super) start_z: Option<f64>,
    pub(super) target_height: f64,
    pub(super) thrust: f64,
    pub(super) last_thrust: f64,
    pub(super) safety_start: Option<DateTime<Utc>>,
    pub(super) descent: Option<DescentRamp>,
}

/// Open-loop thrust ramp that ends a landing, advanced one tick at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescentRamp {
    pub started: DateTime<Utc>,
    pub last_step: DateTime<Utc>,
}

impl PhaseContext {
    pub(super) fn enter_takeoff(&mut self) {
        self.start_z = None;
        self.thrust = 0.0;
        self.last_thrust = 0.0;
        self.descent = None;
        self.safety_start = None;
    }

    pub(super) fn enter_landing(&mut self, target_height: f64) {
        self.target_height = target_height;
        self.descent = None;
        self.safety_start = None;
    }

    pub(super) fn enter_safety_landing(&mut self, now: DateTime<Utc>) {
        self.safety_start = Some(now);
        self.descent = None;
    }

    pub(super) fn enter_idle(&mut self) {
        self.descent = None;
        self.safety_start = None;
        self.thrust = 0.0;
    }

    /// Altitude recorded at the start of the current takeoff.
    pub fn start_z(&self) -> Option<f64> { self.start_z }
    pub fn target_height(&self) -> f64 { self.target_height }
    /// Open-loop takeoff thrust accumulator.
    pub fn thrust(&self) -> f64 { self.thrust }
    pub fn last_thrust(&self) -> f64 { self.last_thrust }
    pub fn safety_start(&self) -> Option<DateTime<Utc>> { self.safety_start }
    pub fn descent(&self) -> Option<DescentRamp> { self.descent }
}
