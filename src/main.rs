#![allow(clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod flight_control;
mod logger;
mod sim;

use crate::config::AutopilotConfig;
use crate::flight_control::common::vec3d::Vec3D;
use crate::sim::{SimDestination, SimRegistry, SimWorld};
use chrono::TimeDelta;
use std::time::Duration;

/// Simulated time per tick.
const DT: TimeDelta = TimeDelta::milliseconds(100);
/// Wall-clock time per tick.
const TICK_INTERVAL: Duration = Duration::from_millis(5);
/// Upper bound on ticks spent on a single command.
const MAX_TICKS: usize = 6000;
const STATUS_EVERY: usize = 100;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = AutopilotConfig::from_env().unwrap_or_else(|e| fatal!("Bad configuration: {e}"));

    let ship = SimWorld::ship();
    let mut registry = SimRegistry::new(ship.clone());
    let home = registry.add(SimDestination::planetoid("Cinder Harbor", Vec3D::zero(), 250.0));
    registry.add(SimDestination::planetoid("Basalt Outpost", Vec3D::new(0.0, 0.0, 8000.0), 120.0));
    registry.add(SimDestination::floating(
        "Drifting Comet",
        Vec3D::new(60.0, 300.0, 4000.0),
        Vec3D::new(0.0, -2.0, 0.0),
        90.0,
    ));
    registry.add(SimDestination::operator("Operator", Vec3D::new(0.0, -600.0, 0.0)));
    registry.set_operator_location(Some(&home));
    registry.add_special_direction("Nova", Vec3D::new(1.0, 1.0, 0.0));
    ship.borrow_mut().land_on(&home, Vec3D::unit_y());

    let mut world = SimWorld::with_registry(ship, registry, config);
    info!("Starting autopilot demo with {:?}", world.autopilot.config());

    run_command(&mut world, "travel to Basalt Outpost", |ap| ap.try_travel("basalt outpost")).await;
    run_command(&mut world, "look at Nova", |ap| ap.try_orient("Nova")).await;
    run_command(&mut world, "take off", sim::SimAutopilot::try_take_off).await;
    run_command(&mut world, "land", sim::SimAutopilot::try_land).await;
    run_command(&mut world, "take off", sim::SimAutopilot::try_take_off).await;
    run_command(&mut world, "look at Nova", |ap| ap.try_orient("Nova")).await;
    run_command(&mut world, "spin", sim::SimAutopilot::try_spin).await;
    run_command(&mut world, "evade Drifting Comet", |ap| ap.try_evade("Drifting Comet")).await;
    run_command(&mut world, "abort", sim::SimAutopilot::try_abort).await;
    run_command(&mut world, "travel to Operator", |ap| ap.try_travel("Operator")).await;
    run_command(&mut world, "crash into Drifting Comet", |ap| ap.try_crash("Drifting Comet")).await;

    log!("Final status:\n{}", world.autopilot.status_report());
    let engine = world.autopilot.engine();
    info!("Navigation engine handled {} flight requests and {} aborts", engine.flight_requests, engine.aborts);

    let feed = world.autopilot.sink();
    log!("Agent feed ({} messages, {} cues):", feed.messages.len(), feed.cues.len());
    for (message, silent) in &feed.messages {
        log!("{} {message}", if *silent { " " } else { "!" });
    }
    if let Some(pinned) = &feed.pinned {
        log!("Pinned: {pinned}");
    }
}

/// Issues `command` and ticks the world until the autopilot is idle again.
async fn run_command<F>(world: &mut SimWorld, label: &str, command: F)
where F: FnOnce(&mut sim::SimAutopilot) -> Result<(), flight_control::CommandRejection> {
    info!("Command: {label}");
    if let Err(rejection) = command(&mut world.autopilot) {
        warn!("Command '{label}' rejected: {rejection}");
        return;
    }
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    for tick in 0..MAX_TICKS {
        interval.tick().await;
        let output = world.step(DT);
        if tick % STATUS_EVERY == 0 {
            log!("Status:\n{}", world.autopilot.status_report());
            event!(
                "Output: landing mode {}, alignment {} on {}",
                output.landing_mode,
                output.alignment_enabled,
                output.alignment_axis
            );
        }
        if !world.autopilot.is_active() && !world.autopilot.is_spinning() {
            info!("Command '{label}' settled after {tick} ticks");
            return;
        }
    }
    error!("Command '{label}' did not settle within {MAX_TICKS} ticks");
}
