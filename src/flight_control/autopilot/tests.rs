use super::{CommandRejection, control_output::AlignmentAxis};
use crate::config::AutopilotConfig;
use crate::flight_control::{
    common::vec3d::Vec3D,
    frame::DestinationRef,
    ship_interface::{Cue, EngineEvent, NavigationEngine},
    task::Task,
};
use crate::sim::{SimDestination, SimRegistry, SimWorld};
use chrono::TimeDelta;
use std::rc::Rc;

const DT: TimeDelta = TimeDelta::milliseconds(100);
const DEEP_SPACE: Vec3D<f32> = Vec3D::new(0.0, 0.0, 10_000.0);

struct Scene {
    world: SimWorld,
    home: Rc<SimDestination>,
    outpost: Rc<SimDestination>,
    comet: Rc<SimDestination>,
    operator: Rc<SimDestination>,
}

impl Scene {
    /// Ship landed on top of `Home`.
    fn landed() -> Self { Self::build(|scene| scene.ship_on_home(), false) }

    /// Ship drifting at rest far away from every destination.
    fn in_space() -> Self {
        Self::build(
            |scene| {
                let mut ship = scene.world.ship.borrow_mut();
                ship.position = DEEP_SPACE;
            },
            false,
        )
    }

    fn build(setup: impl FnOnce(&Scene), operator_at_home: bool) -> Self {
        let ship = SimWorld::ship();
        let mut registry = SimRegistry::new(Rc::clone(&ship));
        let home = registry.add(SimDestination::planetoid("Home", Vec3D::zero(), 250.0));
        let outpost =
            registry.add(SimDestination::planetoid("Outpost", Vec3D::new(0.0, 0.0, 20_000.0), 150.0));
        let comet = registry.add(SimDestination::floating(
            "Comet",
            Vec3D::new(5000.0, 0.0, 0.0),
            Vec3D::zero(),
            100.0,
        ));
        let operator = registry.add(SimDestination::operator("Operator", Vec3D::new(-5000.0, 0.0, 0.0)));
        registry.add_special_direction("Nova", Vec3D::new(1.0, 0.0, 0.0));
        if operator_at_home {
            registry.set_operator_location(Some(&home));
        }

        let world = SimWorld::with_registry(ship, registry, AutopilotConfig::default());
        let scene = Self { world, home, outpost, comet, operator };
        setup(&scene);
        scene
    }

    fn ship_on_home(&self) { self.world.ship.borrow_mut().land_on(&self.home, Vec3D::unit_y()); }

    fn queue(&self) -> Vec<Task> { self.world.autopilot.queued_tasks().cloned().collect() }

    fn step_until(&mut self, max_ticks: usize, done: impl Fn(&Scene) -> bool) -> usize {
        for tick in 0..max_ticks {
            if done(self) {
                return tick;
            }
            self.world.step(DT);
        }
        panic!("condition not reached within {max_ticks} ticks");
    }

    fn messages(&self) -> &crate::sim::RecordingSink { self.world.autopilot.sink() }
}

fn handle(dest: &Rc<SimDestination>) -> DestinationRef { DestinationRef::from(Rc::clone(dest)) }

#[test]
fn test_travel_from_landed_brackets_take_off() {
    let mut scene = Scene::landed();
    scene.world.autopilot.try_travel("Outpost").unwrap();

    assert_eq!(
        scene.queue(),
        vec![Task::TakeOff(handle(&scene.home)), Task::Travel(handle(&scene.outpost))]
    );
    assert_eq!(scene.messages().pinned.as_deref(), Some("AUTOPILOT ENGAGED: TAKE OFF FROM HOME."));

    // the ship is turned towards the travel target before climbing
    let output = scene.world.step(DT);
    assert!(output.angular_velocity_delta.is_some_and(|w| !w.is_zero()));
    assert!(output.landing_mode);
    assert_eq!(output.alignment_axis, AlignmentAxis::Down);
    assert!(scene.world.step(DT).angular_velocity_delta.is_none());
}

#[test]
fn test_crash_from_landed_brackets_take_off() {
    let mut scene = Scene::landed();
    scene.world.autopilot.try_crash("comet").unwrap();
    assert_eq!(
        scene.queue(),
        vec![Task::TakeOff(handle(&scene.home)), Task::Crash(handle(&scene.comet))]
    );
}

#[test]
fn test_travel_then_land_scenario() {
    let mut scene = Scene::landed();
    scene.world.autopilot.try_travel("Outpost").unwrap();

    scene.step_until(200, |s| matches!(s.world.autopilot.current_task(), Some(Task::Travel(_))));
    assert_eq!(scene.queue(), vec![Task::Travel(handle(&scene.outpost))]);
    assert!(scene.messages().contains("Autopilot has successfully taken off from Home."));

    scene.world.autopilot.handle_engine_event(EngineEvent::Arrived { arrival_error: 10.0 });
    assert!(scene.messages().contains("Autopilot successfully arrived at destination: Outpost."));
    assert_eq!(scene.queue(), vec![Task::Land(handle(&scene.outpost))]);
}

#[test]
fn test_full_flight_lands_at_destination() {
    let mut scene = Scene::landed();
    scene.world.autopilot.engine_mut().arrival_noise = 0.0;
    scene.world.autopilot.try_travel("Outpost").unwrap();

    scene.step_until(5000, |s| !s.world.autopilot.is_active());

    let ship = scene.world.ship.borrow();
    assert!(ship.landed);
    assert!(!ship.destroyed);
    assert!((ship.position.euclid_distance(&Vec3D::new(0.0, 0.0, 20_000.0)) - 150.0).abs() < 1.0);
    assert!(scene.messages().contains("Autopilot successfully arrived at destination: Outpost."));
    assert!(scene.messages().contains("Autopilot has successfully landed at Outpost."));
    assert!(scene.messages().pinned.is_none());
}

#[test]
fn test_operator_aboard_skips_landing() {
    let mut scene = Scene::in_space();
    scene.world.ship.borrow_mut().operator_aboard = true;
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.autopilot.handle_engine_event(EngineEvent::Arrived { arrival_error: 0.0 });
    assert!(scene.queue().is_empty());
}

#[test]
fn test_arrival_reports_precision() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.autopilot.handle_engine_event(EngineEvent::Arrived { arrival_error: 75.0 });
    assert!(scene.messages().contains("(undershot by 75.00 meters)"));

    scene.world.autopilot.try_travel("Comet").unwrap();
    scene.world.autopilot.handle_engine_event(EngineEvent::Arrived { arrival_error: -80.0 });
    assert!(scene.messages().contains("(overshot by 80.00 meters)"));
    // comets cannot be landed on
    assert!(scene.queue().is_empty());
}

#[test]
fn test_retry_does_not_grow_queue() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Outpost").unwrap();

    for error in [250.0, -400.0, 101.0, 1e6] {
        scene.world.autopilot.handle_engine_event(EngineEvent::Arrived { arrival_error: error });
        assert_eq!(scene.queue(), vec![Task::Travel(handle(&scene.outpost))]);
    }
    assert!(!scene.messages().contains("arrived at destination"));
}

#[test]
fn test_operator_arrival_substitutes_landing() {
    let mut scene = Scene::build(
        |scene| {
            scene.world.ship.borrow_mut().position = Vec3D::new(0.0, 600.0, 0.0);
        },
        true,
    );
    scene.world.autopilot.try_travel("Operator").unwrap();
    // hovering inside the approach zone of a landable body still takes off first
    assert_eq!(
        scene.queue(),
        vec![Task::TakeOff(handle(&scene.home)), Task::Travel(handle(&scene.operator))]
    );
    scene.world.step(DT);
    assert_eq!(scene.queue(), vec![Task::Travel(handle(&scene.operator))]);

    scene.world.autopilot.handle_engine_event(EngineEvent::Arrived { arrival_error: 500.0 });
    assert_eq!(scene.queue(), vec![Task::Land(handle(&scene.home))]);
}

#[test]
fn test_operator_arrival_elsewhere_retries() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Operator").unwrap();
    scene.world.autopilot.handle_engine_event(EngineEvent::Arrived { arrival_error: 500.0 });
    assert_eq!(scene.queue(), vec![Task::Travel(handle(&scene.operator))]);
}

#[test]
fn test_gate_runs_before_destination_checks() {
    let mut scene = Scene::in_space();
    {
        let mut ship = scene.world.ship.borrow_mut();
        ship.manual_override = true;
        ship.operator_at_console = true;
    }
    let autopilot = &mut scene.world.autopilot;
    assert_eq!(autopilot.try_travel("Nowhere"), Err(CommandRejection::ManualOverride));
    assert_eq!(autopilot.try_evade("Nowhere"), Err(CommandRejection::ManualOverride));
    assert_eq!(autopilot.try_crash("Nowhere"), Err(CommandRejection::ManualOverride));
    assert_eq!(autopilot.try_orient("Nowhere"), Err(CommandRejection::ManualOverride));
    assert_eq!(autopilot.try_take_off(), Err(CommandRejection::ManualOverride));
    assert_eq!(autopilot.try_land(), Err(CommandRejection::ManualOverride));
    assert_eq!(autopilot.try_spin(), Err(CommandRejection::ManualOverride));
    assert_eq!(autopilot.try_abort(), Err(CommandRejection::ManualOverride));

    // override alone does not block
    scene.world.ship.borrow_mut().operator_at_console = false;
    let Err(CommandRejection::UnknownDestination { name, valid }) =
        scene.world.autopilot.try_travel("Nowhere")
    else {
        panic!("expected an unknown destination");
    };
    assert_eq!(name, "Nowhere");
    assert_eq!(valid, vec!["Home", "Outpost", "Comet", "Operator"]);
}

#[test]
fn test_gate_order() {
    let mut scene = Scene::in_space();
    {
        let mut ship = scene.world.ship.borrow_mut();
        ship.powered = false;
        ship.destroyed = true;
    }
    scene.world.autopilot.engine_mut().damaged = true;
    assert_eq!(scene.world.autopilot.try_spin(), Err(CommandRejection::NotPowered));

    scene.world.ship.borrow_mut().powered = true;
    assert_eq!(scene.world.autopilot.try_spin(), Err(CommandRejection::NavigationDamaged));

    scene.world.autopilot.engine_mut().damaged = false;
    assert_eq!(scene.world.autopilot.try_spin(), Err(CommandRejection::ShipDestroyed));
    assert!(scene.world.autopilot.status_report().contains("The ship has been destroyed."));
}

#[test]
fn test_destination_checks() {
    let mut scene = Scene::in_space();
    scene.outpost.set_unavailable(Some("It is hidden behind the sun."));
    let rejection = scene.world.autopilot.try_travel("Outpost").unwrap_err();
    assert_eq!(
        rejection,
        CommandRejection::DestinationUnavailable {
            name: "Outpost".to_string(),
            reason: "It is hidden behind the sun.".to_string()
        }
    );
    assert!(rejection.to_string().ends_with("It is hidden behind the sun."));

    scene.outpost.set_unavailable(None);
    scene.outpost.set_resolvable(false);
    assert_eq!(
        scene.world.autopilot.try_travel("  outPOST "),
        Err(CommandRejection::NoLock { name: "Outpost".to_string() })
    );
    assert!(scene.queue().is_empty());
}

#[test]
fn test_abort_is_idempotent() {
    let mut scene = Scene::in_space();
    let idle = scene.world.autopilot.try_abort().unwrap_err();
    assert_eq!(idle.to_string(), "Autopilot is not currently engaged.");
    assert_eq!(scene.world.autopilot.try_abort(), Err(idle));

    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.autopilot.try_abort().unwrap();
    assert!(scene.queue().is_empty());
    assert_eq!(scene.messages().cues, vec![Cue::AutopilotOff]);
    assert_eq!(scene.world.autopilot.try_abort(), Err(CommandRejection::NotEngaged));
}

#[test]
fn test_abort_discards_brackets() {
    let mut scene = Scene::landed();
    scene.world.autopilot.try_travel("Outpost").unwrap();
    assert_eq!(scene.queue().len(), 2);
    scene.world.autopilot.try_abort().unwrap();
    assert!(scene.queue().is_empty());
    assert!(scene.messages().pinned.is_none());
}

#[test]
fn test_abort_cancels_flight_silently() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.step(DT);
    assert!(scene.world.autopilot.engine().is_flying());

    scene.world.autopilot.try_abort().unwrap();
    assert_eq!(scene.world.autopilot.engine().aborts, 1);
    assert!(!scene.world.autopilot.engine().is_flying());
    assert!(scene.messages().cues.is_empty());

    scene.world.step(DT);
    assert_eq!(scene.messages().count("has been aborted"), 1);
}

#[test]
fn test_new_command_replaces_active_task() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.autopilot.try_evade("Comet").unwrap();
    assert_eq!(scene.queue(), vec![Task::Evade(handle(&scene.comet))]);
}

#[test]
fn test_take_off_and_land_preconditions() {
    let mut scene = Scene::in_space();
    assert_eq!(scene.world.autopilot.try_take_off(), Err(CommandRejection::NoTakeOffLocation));
    assert_eq!(scene.world.autopilot.try_land(), Err(CommandRejection::NoLandingLocation));

    let mut scene = Scene::landed();
    assert_eq!(scene.world.autopilot.try_land(), Err(CommandRejection::AlreadyLanded));
    scene.world.autopilot.try_take_off().unwrap();
    assert_eq!(scene.queue(), vec![Task::TakeOff(handle(&scene.home))]);
}

#[test]
fn test_stuck_take_off_aborts() {
    let mut scene = Scene::landed();
    scene.world.ship.borrow_mut().thrust_permitted = false;
    scene.world.autopilot.try_take_off().unwrap();

    let output = scene.world.step(DT);
    assert!(output.thrust.is_none());
    assert!(!output.thrust_enabled);

    let ticks = scene.step_until(100, |s| !s.world.autopilot.is_active());
    assert!(ticks >= 49);
    assert!(scene.messages().contains("became stuck while trying to take off"));
}

#[test]
fn test_stuck_landing_completes() {
    let mut scene = Scene::build(
        |scene| {
            let mut ship = scene.world.ship.borrow_mut();
            ship.position = Vec3D::new(0.0, 400.0, 0.0);
            ship.thrust_permitted = false;
        },
        false,
    );
    scene.world.autopilot.try_land().unwrap();
    scene.step_until(100, |s| !s.world.autopilot.is_active());
    assert!(scene.messages().contains("may not be on solid ground"));
    assert!(!scene.messages().contains("aborted"));
}

#[test]
fn test_land_aborts_when_location_changes() {
    let mut scene = Scene::build(
        |scene| scene.world.ship.borrow_mut().position = Vec3D::new(0.0, 400.0, 0.0),
        false,
    );
    scene.world.autopilot.try_land().unwrap();
    scene.world.step(DT);
    assert!(scene.world.autopilot.is_active());

    scene.world.ship.borrow_mut().position = Vec3D::new(0.0, 0.0, 19_700.0);
    scene.world.step(DT);
    assert!(!scene.world.autopilot.is_active());
    assert!(scene.messages().contains("no longer at the intended landing location"));
}

#[test]
fn test_damage_aborts() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.step(DT);
    scene.world.autopilot.engine_mut().damaged = true;
    scene.world.step(DT);
    assert!(scene.queue().is_empty());
    assert!(scene.messages().contains("because the ship has been damaged"));

    let mut scene = Scene::in_space();
    scene.world.autopilot.try_evade("Comet").unwrap();
    scene.world.ship.borrow_mut().destroyed = true;
    let output = scene.world.step(DT);
    assert!(scene.queue().is_empty());
    assert!(output.thrust.is_none());
}

#[test]
fn test_refused_flight_aborts() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.engine_mut().refuse_requests = true;
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.step(DT);
    assert!(scene.queue().is_empty());
    assert_eq!(scene.world.autopilot.engine().flight_requests, 1);
    assert!(scene.messages().contains("Autopilot failed to engage travel to destination 'Outpost'."));
}

#[test]
fn test_restricted_zone_aborts_travel() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.step(DT);
    scene.world.ship.borrow_mut().in_restricted_zone = true;
    scene.world.step(DT);
    assert!(scene.queue().is_empty());
    assert_eq!(scene.world.autopilot.engine().aborts, 1);
    assert!(scene.messages().contains("cloaking field"));
}

#[test]
fn test_lost_lock_aborts() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.step(DT);
    scene.outpost.set_resolvable(false);
    scene.world.step(DT);
    assert!(scene.queue().is_empty());
    assert!(scene.messages().contains("lost its lock on Outpost"));
}

#[test]
fn test_engine_progress_and_abort_events() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.step(DT);
    scene.world.step(DT);
    assert!(scene.messages().contains("Autopilot engaged to travel to destination: Outpost."));
    assert!(scene.messages().contains("matched velocity with destination: Outpost"));

    scene.world.autopilot.engine_mut().push_event(EngineEvent::Aborted);
    scene.world.step(DT);
    assert!(scene.queue().is_empty());
    assert!(scene.messages().contains("Autopilot to destination 'Outpost' has been aborted."));

    // engine signals outside of travel are ignored
    scene.world.ship.borrow_mut().velocity = Vec3D::zero();
    scene.world.autopilot.try_evade("Comet").unwrap();
    scene.world.autopilot.engine_mut().push_event(EngineEvent::AlreadyAtDestination);
    scene.world.step(DT);
    assert_eq!(scene.queue(), vec![Task::Evade(handle(&scene.comet))]);
}

#[test]
fn test_obstacles_are_announced_once() {
    let mut scene = Scene::in_space();
    scene.comet.set_state(Vec3D::new(50.0, 0.0, 15_000.0), Vec3D::zero());
    scene.world.autopilot.try_travel("Outpost").unwrap();

    for _ in 0..20 {
        scene.world.step(DT);
    }
    let entered = "Obstacle detected: Comet is directly in the ship's flight path!";
    assert_eq!(scene.messages().count(entered), 1);
    assert_eq!(scene.world.autopilot.active_obstacles(), &[handle(&scene.comet)]);
    assert!(scene.world.autopilot.possible_obstacles().is_empty());
    assert!(scene.world.autopilot.status_report().contains("Obstacles in path: Comet"));

    scene.world.autopilot.try_abort().unwrap();
    scene.world.step(DT);
    assert!(scene.world.autopilot.active_obstacles().is_empty());
    assert!(!scene.messages().contains("no longer"));
}

#[test]
fn test_evade_completes() {
    let mut scene = Scene::in_space();
    scene.comet.set_state(Vec3D::new(300.0, 0.0, 12_000.0), Vec3D::zero());
    scene.world.ship.borrow_mut().velocity = Vec3D::new(0.0, 0.0, 100.0);
    scene.world.autopilot.try_evade("Comet").unwrap();

    let output = scene.world.step(DT);
    assert!(output.thrust.is_some());
    assert!(!output.landing_mode);

    scene.step_until(2000, |s| !s.world.autopilot.is_active());
    assert!(scene.messages().contains("Autopilot has successfully evaded Comet."));
    assert!(!scene.world.ship.borrow().destroyed);
}

#[test]
fn test_crash_completes_on_contact() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_crash("Outpost").unwrap();
    let output = scene.world.step(DT);
    assert!(output.thrust.is_some());
    assert_eq!(output.alignment_axis, AlignmentAxis::Down);

    scene.world.ship.borrow_mut().landed = true;
    scene.world.step(DT);
    assert!(scene.queue().is_empty());
    assert!(scene.messages().contains("The ship has collided with Outpost."));
}

#[test]
fn test_orient() {
    let mut scene = Scene::landed();
    assert_eq!(scene.world.autopilot.try_orient("Nova"), Err(CommandRejection::OrientWhileLanded));

    let mut scene = Scene::in_space();
    scene.world.autopilot.try_orient("nova").unwrap();
    let turn = scene.world.step(DT).angular_velocity_delta;
    assert!(turn.is_some_and(|w| !w.is_zero()));
    assert!(scene.world.step(DT).angular_velocity_delta.is_none());
    // the ship now faces the special direction
    let forward = scene.world.ship.borrow().orientation.forward();
    assert!((forward - Vec3D::unit_x()).abs() < 1e-3);

    scene.world.autopilot.try_orient("Outpost").unwrap();
    assert!(scene.queue().is_empty());
    assert!(matches!(
        scene.world.autopilot.try_orient("Nowhere"),
        Err(CommandRejection::UnknownDestination { .. })
    ));
}

#[test]
fn test_spin() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_spin().unwrap();
    assert!(scene.world.autopilot.is_spinning());

    let output = scene.world.step(DT);
    let rate = scene.world.autopilot.config().spin_rate;
    assert!((output.spin_bias.abs() - rate).abs() < 1e-3);
    assert!(!output.alignment_enabled);

    let ticks = scene.step_until(100, |s| !s.world.autopilot.is_spinning());
    assert_eq!(ticks, 29);
    assert!(scene.world.step(DT).spin_bias.is_zero());
}

#[test]
fn test_abort_stops_spin() {
    let mut scene = Scene::in_space();
    scene.world.autopilot.try_spin().unwrap();
    scene.world.step(DT);
    assert!(scene.world.autopilot.is_spinning());

    scene.world.autopilot.try_abort().unwrap();
    assert!(!scene.world.autopilot.is_spinning());
    assert!(scene.world.step(DT).spin_bias.is_zero());
    assert_eq!(scene.world.autopilot.try_abort(), Err(CommandRejection::NotEngaged));
}

#[test]
fn test_power_notice_once() {
    let mut scene = Scene::in_space();
    scene.world.ship.borrow_mut().powered = false;
    scene.world.step(DT);
    assert!(scene.messages().messages.is_empty());

    scene.world.ship.borrow_mut().powered = true;
    for _ in 0..3 {
        scene.world.step(DT);
    }
    assert_eq!(scene.messages().count("The ship has been powered on."), 1);
}

#[test]
fn test_output_flags_follow_task() {
    let mut scene = Scene::in_space();
    let idle = scene.world.step(DT);
    assert!(!idle.alignment_enabled);
    assert!(idle.thrust.is_none());

    scene.world.autopilot.try_travel("Outpost").unwrap();
    let travel = scene.world.step(DT);
    assert!(travel.alignment_enabled);
    assert_eq!(travel.alignment_axis, AlignmentAxis::Forward);
    assert!(travel.thrust.is_none());
    assert!(!travel.landing_mode);
}

#[test]
fn test_status_report() {
    let mut scene = Scene::landed();
    let idle = scene.world.autopilot.status_report();
    assert!(idle.contains("Autopilot: available"));
    assert!(idle.contains("Location: Home (landed)"));
    assert!(idle.contains("Current task: none"));

    scene.world.autopilot.try_travel("Outpost").unwrap();
    scene.world.step(DT);
    let status = scene.world.autopilot.status();
    assert_eq!(status.current_task, Some(Task::TakeOff(handle(&scene.home))));
    assert_eq!(status.pending_tasks, vec![Task::Travel(handle(&scene.outpost))]);
    assert!((status.target_landing_velocity - 200.0).abs() < 1e-3);

    let report = status.to_string();
    assert!(report.contains("Current task: take off from Home"));
    assert!(report.contains("Queued: travel to Outpost"));
    assert!(report.contains("Vertical speed:"));

    scene.world.ship.borrow_mut().manual_override = true;
    scene.world.ship.borrow_mut().operator_at_console = true;
    assert!(scene.world.autopilot.status_report().contains("Autopilot: unavailable (Manual override"));
}
