use strum_macros::{Display, EnumIter};

#[derive(Debug, Display, EnumIter, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[strum(serialize_all = "snake_case")]
pub enum FlightPhase {
    #[default]
    Idle,
    TakingOff,
    Automatic,
    Landing,
    SafetyLanding,
}

impl FlightPhase {
    /// Phases whose control law needs a current vehicle pose.
    pub fn needs_pose(self) -> bool {
        matches!(self, FlightPhase::TakingOff | FlightPhase::Automatic | FlightPhase::Landing)
    }

    pub fn is_airborne(self) -> bool { self != FlightPhase::Idle }

    /// Phase a request leads to from `self`, or `None` if it is ignored.
    ///
    /// Takeoff is accepted from `Idle` and `Automatic`. Landing is accepted
    /// from every active phase. Re-requesting the current phase is a no-op.
    pub fn on_request(self, request: PhaseRequest) -> Option<FlightPhase> {
        match (self, request) {
            (FlightPhase::Idle | FlightPhase::Automatic, PhaseRequest::Takeoff) => {
                Some(FlightPhase::TakingOff)
            }
            (FlightPhase::TakingOff | FlightPhase::Automatic | FlightPhase::SafetyLanding, PhaseRequest::Land) => {
                Some(FlightPhase::Landing)
            }
            _ => None,
        }
    }
}

/// One-shot external trigger, applied on the next control tick.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PhaseRequest {
    Takeoff,
    Land,
}
