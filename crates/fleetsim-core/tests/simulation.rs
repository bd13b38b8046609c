use chrono::Utc;
use fleetsim_core::fleet::{build_initial_fleet, Fleet};
use fleetsim_core::geo::{bearing_deg, Waypoint};
use fleetsim_core::routes::{Route, RouteTable};
use fleetsim_core::simulation::{
    step, step_vehicle, FleetSimulator, StatusThresholds, MAX_MOVING_SPEED, MIN_MOVING_SPEED,
};
use fleetsim_core::vehicle::{Direction, VehicleSnapshot, VehicleStatus, HISTORY_CAPACITY};
use pretty_assertions::assert_eq;
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random source whose every draw is zero: no status changes, and every
/// perturbation takes the low end of its range.
fn zero_rng() -> StepRng {
    StepRng::new(0, 0)
}

fn single_vehicle(routes: &RouteTable) -> VehicleSnapshot {
    let mut rng = StdRng::seed_from_u64(1);
    build_initial_fleet(1, routes, &mut rng, Utc::now()).vehicles()[0].clone()
}

fn pair_table() -> RouteTable {
    // ~55 m apart on the equator
    RouteTable::new(vec![Route::new(
        "pair",
        vec![Waypoint::new(0.0, 0.0), Waypoint::new(0.0, 0.0005)],
    )])
    .unwrap()
}

fn tick(vehicle: &VehicleSnapshot, routes: &RouteTable) -> VehicleSnapshot {
    step_vehicle(
        vehicle,
        routes,
        1.0,
        &mut zero_rng(),
        &StatusThresholds::default(),
        Utc::now(),
    )
}

#[test]
fn test_invariants_hold_over_many_ticks() {
    let routes = RouteTable::san_francisco();
    let mut sim = FleetSimulator::with_seed(routes.clone(), 2024);
    let mut fleet = sim.build_initial_fleet(12);

    for _ in 0..3_000 {
        let next = sim.step(&fleet, 1.0);
        assert_eq!(next.len(), fleet.len());

        for (before, after) in fleet.iter().zip(next.iter()) {
            assert_eq!(before.id, after.id);
            let route = &routes[after.simulation_state.route_id];
            let state = &after.simulation_state;

            assert!(state.is_valid_for(route), "{} left its route: {:?}", after.id, state);
            assert!((0.0..1.0).contains(&state.progress));
            assert!(after.history.len() <= HISTORY_CAPACITY);
            assert!(after.coordinates.lat.is_finite() && after.coordinates.lng.is_finite());
            assert!((0.0..360.0).contains(&after.coordinates.heading));

            if after.status.is_in_motion() {
                assert!(after.telemetry.speed >= MIN_MOVING_SPEED);
                assert!(after.telemetry.speed <= MAX_MOVING_SPEED);
                assert!(after.telemetry.fuel_level <= before.telemetry.fuel_level);
                assert!(after.telemetry.odometer >= before.telemetry.odometer);

                let current = route[state.waypoint_index];
                let target = route[state.next_index(route).unwrap()];
                assert_eq!(after.coordinates.heading, bearing_deg(current, target));
            } else {
                assert_eq!(after.telemetry.speed, 0.0);
                assert_eq!(after.telemetry.rpm, 700.0);
            }
            assert!(after.telemetry.fuel_level >= 0.0);

            if after.telemetry.engine_temp > 112.0 {
                assert_eq!(after.status, VehicleStatus::Alert);
            }
        }

        fleet = next;
    }
}

#[test]
fn test_step_leaves_input_untouched() {
    let routes = RouteTable::san_francisco();
    let mut rng = StdRng::seed_from_u64(9);
    let fleet = build_initial_fleet(6, &routes, &mut rng, Utc::now());
    let copy = fleet.clone();

    let next = step(
        &fleet,
        &routes,
        1.0,
        &mut rng,
        &StatusThresholds::default(),
        Utc::now(),
    );

    assert_eq!(fleet, copy);
    assert!(next.iter().all(|v| v.history.len() == 1));
}

#[test]
fn test_two_waypoint_route_oscillates() {
    let routes = pair_table();
    let mut vehicle = single_vehicle(&routes);
    assert_eq!(vehicle.simulation_state.direction, Direction::Forward);

    let mut ticks = 0;
    while vehicle.simulation_state.waypoint_index == 0 {
        vehicle = tick(&vehicle, &routes);
        ticks += 1;
        assert!(ticks < 100, "never reached the far waypoint");
    }
    assert_eq!(vehicle.simulation_state.waypoint_index, 1);
    assert_eq!(vehicle.simulation_state.direction, Direction::Backward);
    assert_eq!(vehicle.simulation_state.progress, 0.0);
    assert_eq!(vehicle.coordinates.position(), routes[0][1]);

    while vehicle.simulation_state.waypoint_index == 1 {
        vehicle = tick(&vehicle, &routes);
        ticks += 1;
        assert!(ticks < 200, "never came back");
    }
    assert_eq!(vehicle.simulation_state.waypoint_index, 0);
    assert_eq!(vehicle.simulation_state.direction, Direction::Forward);
}

#[test]
fn test_moving_telemetry_with_pinned_draws() {
    let routes = pair_table();
    let mut vehicle = single_vehicle(&routes);
    vehicle.telemetry.speed = 50.0;
    vehicle.telemetry.engine_temp = 90.0;
    vehicle.telemetry.fuel_level = 0.001;

    let next = tick(&vehicle, &routes);

    assert_eq!(next.status, VehicleStatus::Moving);
    assert_eq!(next.telemetry.speed, 47.5);
    assert_eq!(next.telemetry.rpm, 1500.0 + 47.5 * 25.0);
    assert!((next.telemetry.engine_temp - 89.6).abs() < 1e-9);
    assert_eq!(next.telemetry.fuel_level, 0.0);
    assert!((next.telemetry.odometer - vehicle.telemetry.odometer - 47.5 / 3600.0).abs() < 1e-9);
}

#[test]
fn test_speed_floor() {
    let routes = pair_table();
    let mut vehicle = single_vehicle(&routes);
    vehicle.telemetry.speed = 31.0;
    assert_eq!(tick(&vehicle, &routes).telemetry.speed, MIN_MOVING_SPEED);
}

#[test]
fn test_idle_cooldown() {
    let routes = RouteTable::san_francisco();
    let mut vehicle = single_vehicle(&routes);
    vehicle.status = VehicleStatus::Idle;
    vehicle.telemetry.engine_temp = 90.0;
    let position = vehicle.coordinates;

    let next = tick(&vehicle, &routes);

    assert_eq!(next.status, VehicleStatus::Idle);
    assert!((next.telemetry.engine_temp - 89.8).abs() < 1e-9);
    assert_eq!(next.telemetry.speed, 0.0);
    assert_eq!(next.telemetry.rpm, 700.0);
    assert_eq!(next.coordinates, position);
    assert_eq!(next.simulation_state, vehicle.simulation_state);
}

#[test]
fn test_overheat_forces_alert() {
    let routes = RouteTable::san_francisco();

    let mut moving = single_vehicle(&routes);
    moving.telemetry.engine_temp = 114.9;
    let next = tick(&moving, &routes);
    assert!(next.telemetry.engine_temp > 112.0);
    assert_eq!(next.status, VehicleStatus::Alert);

    let mut parked = single_vehicle(&routes);
    parked.status = VehicleStatus::Stopped;
    parked.telemetry.engine_temp = 113.0;
    let next = tick(&parked, &routes);
    assert_eq!(next.status, VehicleStatus::Alert);

    // Cooled below the threshold: the override no longer applies
    parked.telemetry.engine_temp = 112.1;
    let next = tick(&parked, &routes);
    assert_eq!(next.status, VehicleStatus::Stopped);
}

#[test]
fn test_alert_vehicles_keep_moving() {
    let routes = RouteTable::san_francisco();
    let mut vehicle = single_vehicle(&routes);
    vehicle.status = VehicleStatus::Alert;

    let next = tick(&vehicle, &routes);
    assert_eq!(next.status, VehicleStatus::Alert);
    assert!(next.telemetry.speed >= MIN_MOVING_SPEED);
    assert!(next.simulation_state.progress > 0.0);
}

#[test]
fn test_history_is_a_sliding_window() {
    let routes = RouteTable::san_francisco();
    let mut vehicle = single_vehicle(&routes);
    let mut odometers = Vec::new();

    for _ in 0..30 {
        vehicle = tick(&vehicle, &routes);
        odometers.push(vehicle.telemetry.odometer);
    }

    let kept: Vec<f64> = vehicle.history.iter().map(|t| t.odometer).collect();
    assert_eq!(kept, odometers[10..].to_vec());
    assert_eq!(vehicle.history.latest(), Some(&vehicle.telemetry));
}

#[test]
fn test_zero_dt_does_not_move() {
    let routes = RouteTable::san_francisco();
    let vehicle = single_vehicle(&routes);
    let next = step_vehicle(
        &vehicle,
        &routes,
        0.0,
        &mut zero_rng(),
        &StatusThresholds::default(),
        Utc::now(),
    );
    assert_eq!(next.simulation_state.progress, 0.0);
    assert_eq!(next.coordinates.position(), vehicle.coordinates.position());
}

#[test]
fn test_seeded_simulators_agree() {
    let routes = RouteTable::san_francisco();
    let now = Utc::now();
    let run = || {
        let mut sim = FleetSimulator::with_seed(routes.clone(), 77);
        let mut fleet: Fleet = sim.build_initial_fleet(5);
        for _ in 0..50 {
            fleet = sim.step_at(&fleet, 1.0, now);
        }
        fleet
            .iter()
            .map(|v| (v.status, v.simulation_state, v.telemetry.speed))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
