mod command;
pub(crate) mod common;
mod control_loop;
mod flight_controller;
mod flight_phase;
mod handle;
mod phase_context;
mod pid;
pub(crate) mod pose_source;

pub use command::{ChannelSink, Command, CommandSink};
pub use control_loop::ControlLoop;
pub use flight_controller::{FlightController, TickInput};
pub use flight_phase::{FlightPhase, PhaseRequest};
pub use handle::ControllerHandle;
pub use phase_context::{DescentRamp, PhaseContext};
pub use pid::PidController;
