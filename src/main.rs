#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod bridge;
mod config;
mod flight_control;
mod logger;

use crate::bridge::{StdinSource, run_inbound, run_outbound};
use crate::config::ControllerConfig;
use crate::flight_control::{ChannelSink, ControlLoop, common::LoopClock};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const COMMAND_QUEUE: usize = 16;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let config = match ControllerConfig::from_env() {
        Ok(config) => config,
        Err(e) => fatal!("Could not load controller config: {e}"),
    };
    info!(
        "Controlling {} in {} at {:.1}Hz",
        config.frame, config.world_frame, config.frequency
    );

    let clock = LoopClock::new();
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE);
    let (control, handle) = ControlLoop::new(&config, clock, ChannelSink::new(cmd_tx));
    let c_tok = CancellationToken::new();

    let control_task = tokio::spawn(control.run(c_tok.clone()));
    let inbound_task = tokio::spawn(run_inbound(Box::new(StdinSource::new()), handle, clock, c_tok.clone()));
    let outbound_task = tokio::spawn(run_outbound(cmd_rx, tokio::io::stdout(), c_tok.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => warn!("Interrupted, shutting down"),
        Err(e) => error!("Could not listen for Ctrl-C, shutting down: {e}"),
    }
    c_tok.cancel();

    match control_task.await {
        Ok(controller) => info!("Control loop stopped in phase {}", controller.phase()),
        Err(e) => error!("Control loop task failed: {e}"),
    }
    match outbound_task.await {
        Ok(Ok(())) => (),
        Ok(Err(e)) => error!("Command writer failed: {e}"),
        Err(e) => error!("Command writer task failed: {e}"),
    }
    inbound_task.abort();
    // The stdin reader can stay parked in a blocking read, which would keep
    // the runtime from shutting down.
    std::process::exit(0);
}
