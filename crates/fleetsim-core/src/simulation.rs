//! Simulation Step
//!
//! Advances every vehicle of a fleet by one tick: status changes, route
//! traversal with reversal at the route ends, and telemetry evolution.
//!
//! Each tick maps an input fleet to a brand-new output fleet. Vehicles are
//! independent of each other; the only shared input is the random source,
//! which is injected so tests can pin every draw.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fleet::{self, Fleet};
use crate::geo::{bearing_deg, interpolate, segment_length_km, Waypoint};
use crate::routes::{Route, RouteTable};
use crate::vehicle::{Coordinates, SimulationState, Telemetry, VehicleSnapshot, VehicleStatus};

/// Cruising speed band while moving (km/h)
pub const MIN_MOVING_SPEED: f64 = 30.0;
/// Upper bound of the cruising speed band (km/h)
pub const MAX_MOVING_SPEED: f64 = 100.0;
/// Largest per-tick speed change (km/h)
pub const SPEED_JITTER: f64 = 2.5;

/// Engine operating band while moving (°C)
pub const MIN_RUNNING_TEMP: f64 = 85.0;
/// Upper bound of the operating band (°C)
pub const MAX_RUNNING_TEMP: f64 = 115.0;
/// Temperature floor when parked (°C)
pub const AMBIENT_TEMP: f64 = 20.0;
/// Cooling per tick when parked (°C)
pub const COOLDOWN_PER_TICK: f64 = 0.2;
/// Temperature above which a vehicle is forced into `Alert` (°C)
pub const OVERHEAT_TEMP: f64 = 112.0;

/// Fuel burned per tick while moving (%)
pub const FUEL_PER_TICK: f64 = 0.002;
/// Engine speed when not moving
pub const IDLE_RPM: f64 = 700.0;

/// Bernoulli thresholds for the per-tick status transitions
///
/// Each transition fires when a uniform draw in `[0, 1)` exceeds its
/// threshold, so a threshold of `1.0` disables it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThresholds {
    /// `Idle -> Moving`, and gate for `Moving -> Idle`
    pub status_change: f64,
    /// Second draw required for `Moving -> Idle`
    pub pause: f64,
    /// Any non-alert status `-> Alert`
    pub alert: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            status_change: 0.98,
            pause: 0.7,
            alert: 0.998,
        }
    }
}

/// Fleet simulator owning the route table and the random source
pub struct FleetSimulator<R = StdRng> {
    routes: RouteTable,
    rng: R,
    thresholds: StatusThresholds,
}

impl FleetSimulator<StdRng> {
    /// Create a simulator seeded from OS entropy
    pub fn new(routes: RouteTable) -> Self {
        Self::with_rng(routes, StdRng::from_entropy())
    }

    /// Create a reproducible simulator
    pub fn with_seed(routes: RouteTable, seed: u64) -> Self {
        Self::with_rng(routes, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FleetSimulator<R> {
    /// Create a simulator drawing from `rng`
    pub fn with_rng(routes: RouteTable, rng: R) -> Self {
        Self {
            routes,
            rng,
            thresholds: StatusThresholds::default(),
        }
    }

    /// Replace the status transition thresholds
    pub fn with_thresholds(mut self, thresholds: StatusThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// The route table vehicles are bound to
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Build the startup fleet of `count` vehicles
    pub fn build_initial_fleet(&mut self, count: usize) -> Fleet {
        fleet::build_initial_fleet(count, &self.routes, &mut self.rng, Utc::now())
    }

    /// Advance `fleet` by `dt_seconds`, stamping vehicles with the current time
    pub fn step(&mut self, fleet: &Fleet, dt_seconds: f64) -> Fleet {
        self.step_at(fleet, dt_seconds, Utc::now())
    }

    /// Advance `fleet` by `dt_seconds`, stamping vehicles with `now`
    pub fn step_at(&mut self, fleet: &Fleet, dt_seconds: f64, now: DateTime<Utc>) -> Fleet {
        let next = step(
            fleet,
            &self.routes,
            dt_seconds,
            &mut self.rng,
            &self.thresholds,
            now,
        );

        let stats = next.stats();
        tracing::debug!(
            total = stats.total,
            active = stats.active,
            alert = stats.alert,
            "fleet advanced"
        );
        next
    }
}

/// Advance every vehicle of `fleet` by one tick of `dt_seconds`
///
/// Total for any fleet built by [`fleet::build_initial_fleet`] or a previous
/// call. The input fleet is left untouched.
pub fn step<R: Rng + ?Sized>(
    fleet: &Fleet,
    routes: &RouteTable,
    dt_seconds: f64,
    rng: &mut R,
    thresholds: &StatusThresholds,
    now: DateTime<Utc>,
) -> Fleet {
    fleet
        .iter()
        .map(|vehicle| step_vehicle(vehicle, routes, dt_seconds, rng, thresholds, now))
        .collect()
}

/// Advance one vehicle by one tick, producing a new snapshot
pub fn step_vehicle<R: Rng + ?Sized>(
    vehicle: &VehicleSnapshot,
    routes: &RouteTable,
    dt_seconds: f64,
    rng: &mut R,
    thresholds: &StatusThresholds,
    now: DateTime<Utc>,
) -> VehicleSnapshot {
    let dt_seconds = if dt_seconds.is_finite() {
        dt_seconds.max(0.0)
    } else {
        0.0
    };

    let mut status = roll_status(vehicle.status, rng, thresholds);
    let mut telemetry = vehicle.telemetry;
    let mut coordinates = vehicle.coordinates;
    let mut sim_state = vehicle.simulation_state;

    if status.is_in_motion() {
        let route = &routes[sim_state.route_id];
        debug_assert!(
            route.contains_index(sim_state.waypoint_index),
            "waypoint {} out of range for route '{}'",
            sim_state.waypoint_index,
            route.name
        );

        telemetry.speed = (telemetry.speed + rng.gen_range(-SPEED_JITTER..SPEED_JITTER))
            .clamp(MIN_MOVING_SPEED, MAX_MOVING_SPEED);
        let distance_km = telemetry.speed * dt_seconds / 3600.0;

        let (next_state, next_coordinates) = advance_along_route(sim_state, route, distance_km);
        sim_state = next_state;
        coordinates = next_coordinates;

        telemetry.rpm = 1500.0 + telemetry.speed * 25.0 + rng.gen_range(0.0..100.0);
        telemetry.engine_temp = (telemetry.engine_temp + rng.gen_range(-0.4..0.6))
            .clamp(MIN_RUNNING_TEMP, MAX_RUNNING_TEMP);
        telemetry.fuel_level = (telemetry.fuel_level - FUEL_PER_TICK).max(0.0);
        telemetry.odometer += distance_km;
    } else {
        telemetry = parked(telemetry);
    }

    if telemetry.engine_temp > OVERHEAT_TEMP {
        status = VehicleStatus::Alert;
    }

    VehicleSnapshot {
        id: vehicle.id.clone(),
        name: vehicle.name.clone(),
        vehicle_type: vehicle.vehicle_type,
        status,
        driver: vehicle.driver.clone(),
        coordinates,
        telemetry,
        history: vehicle.history.with_sample(telemetry),
        simulation_state: sim_state,
        last_update: now,
    }
}

/// Probabilistic status transition for one tick
fn roll_status<R: Rng + ?Sized>(
    status: VehicleStatus,
    rng: &mut R,
    thresholds: &StatusThresholds,
) -> VehicleStatus {
    let mut status = status;

    if rng.gen::<f64>() > thresholds.status_change {
        match status {
            VehicleStatus::Idle => status = VehicleStatus::Moving,
            VehicleStatus::Moving if rng.gen::<f64>() > thresholds.pause => {
                status = VehicleStatus::Idle
            }
            _ => {}
        }
    }

    if status != VehicleStatus::Alert && rng.gen::<f64>() > thresholds.alert {
        status = VehicleStatus::Alert;
    }

    status
}

/// Telemetry of a vehicle that is not moving this tick
fn parked(telemetry: Telemetry) -> Telemetry {
    Telemetry {
        speed: 0.0,
        rpm: IDLE_RPM,
        engine_temp: (telemetry.engine_temp - COOLDOWN_PER_TICK).max(AMBIENT_TEMP),
        ..telemetry
    }
}

/// Move `distance_km` along the active segment of `route`
///
/// Reverses at the route ends and rolls over to the next segment at most
/// once per call; any distance beyond the end of the segment is dropped.
/// Heading follows the active segment, not the position delta.
pub fn advance_along_route(
    state: SimulationState,
    route: &Route,
    distance_km: f64,
) -> (SimulationState, Coordinates) {
    let mut state = state.turned_at_ends(route);

    let (current, target) = active_segment(&state, route);
    state.progress += distance_km / segment_length_km(current, target);

    if state.progress >= 1.0 {
        state.progress = 0.0;
        if let Some(next) = state.next_index(route) {
            state.waypoint_index = next;
        }
        state = state.turned_at_ends(route);
    }

    let (current, target) = active_segment(&state, route);
    let position = interpolate(current, target, state.progress);
    (state, Coordinates::at(position, bearing_deg(current, target)))
}

/// Endpoints of the segment a vehicle is currently on
fn active_segment(state: &SimulationState, route: &Route) -> (Waypoint, Waypoint) {
    let current = route[state.waypoint_index];
    let target = state
        .next_index(route)
        .map(|i| route[i])
        .unwrap_or(current);
    (current, target)
}
