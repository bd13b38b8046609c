//! Fleet collection
//!
//! An ordered collection of vehicle snapshots, one per vehicle identity.
//! A fleet is replaced wholesale every tick; readers holding an older fleet
//! keep a consistent view.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geo::bearing_deg;
use crate::routes::RouteTable;
use crate::vehicle::{
    Coordinates, SimulationState, Telemetry, TelemetryHistory, VehicleSnapshot, VehicleStatus,
    VehicleType,
};

const NAMES: [&str; 8] = [
    "Unit Alpha",
    "Unit Bravo",
    "Unit Charlie",
    "Hauler X1",
    "Hauler X2",
    "Express 09",
    "Maint 01",
    "Interceptor",
];

const DRIVERS: [&str; 8] = [
    "J. Smith",
    "A. Doe",
    "M. Chen",
    "S. Gupta",
    "L. Rossi",
    "K. Tanaka",
    "R. Okafor",
    "E. Novak",
];

/// Counters shown in the dashboard header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetStats {
    /// Number of vehicles
    pub total: usize,
    /// Vehicles currently `Moving`
    pub active: usize,
    /// Vehicles currently in `Alert`
    pub alert: usize,
}

/// Ordered collection of vehicle snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fleet {
    vehicles: Vec<VehicleSnapshot>,
}

impl Fleet {
    /// Wrap an ordered list of snapshots
    pub fn new(vehicles: Vec<VehicleSnapshot>) -> Self {
        Self { vehicles }
    }

    /// Number of vehicles
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Iterate vehicles in fleet order
    pub fn iter(&self) -> impl Iterator<Item = &VehicleSnapshot> {
        self.vehicles.iter()
    }

    /// All vehicles in fleet order
    pub fn vehicles(&self) -> &[VehicleSnapshot] {
        &self.vehicles
    }

    /// Look up a vehicle by id
    pub fn get(&self, id: &str) -> Option<&VehicleSnapshot> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Header counters
    pub fn stats(&self) -> FleetStats {
        FleetStats {
            total: self.vehicles.len(),
            active: self.count_status(VehicleStatus::Moving),
            alert: self.count_status(VehicleStatus::Alert),
        }
    }

    /// Number of vehicles with `status`
    pub fn count_status(&self, status: VehicleStatus) -> usize {
        self.vehicles.iter().filter(|v| v.status == status).count()
    }

    /// Vehicles whose name or driver contains `query`, case-insensitively
    ///
    /// An empty query matches every vehicle. Fleet order is preserved.
    pub fn search(&self, query: &str) -> Vec<&VehicleSnapshot> {
        let query = query.to_lowercase();
        self.vehicles
            .iter()
            .filter(|v| {
                v.name.to_lowercase().contains(&query) || v.driver.to_lowercase().contains(&query)
            })
            .collect()
    }
}

impl FromIterator<VehicleSnapshot> for Fleet {
    fn from_iter<I: IntoIterator<Item = VehicleSnapshot>>(iter: I) -> Self {
        Self {
            vehicles: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Fleet {
    type Item = &'a VehicleSnapshot;
    type IntoIter = std::slice::Iter<'a, VehicleSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.vehicles.iter()
    }
}

/// Build the startup fleet
///
/// Vehicle `i` patrols route `i % routes.len()`, starts at that route's
/// first waypoint facing the second, and is `Moving`.
pub fn build_initial_fleet<R: Rng + ?Sized>(
    count: usize,
    routes: &RouteTable,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Fleet {
    (0..count)
        .map(|i| {
            let route_id = routes.route_for_ordinal(i);
            let route = &routes[route_id];
            let start = route[0];

            VehicleSnapshot {
                id: format!("v-{}", i),
                name: format!("{}-{}", NAMES[i % NAMES.len()], i + 1),
                vehicle_type: VehicleType::for_ordinal(i),
                status: VehicleStatus::Moving,
                driver: DRIVERS[i % DRIVERS.len()].to_string(),
                coordinates: Coordinates::at(start, bearing_deg(start, route[1])),
                telemetry: Telemetry {
                    speed: rng.gen_range(40.0..60.0),
                    fuel_level: rng.gen_range(0.0..100.0_f64).floor(),
                    engine_temp: 85.0,
                    battery_voltage: 12.6,
                    rpm: 2000.0,
                    odometer: 12000.0 + rng.gen_range(0.0..50000.0),
                    tire_pressure: [32.0; 4],
                },
                history: TelemetryHistory::new(),
                simulation_state: SimulationState::at_route_start(route_id),
                last_update: now,
            }
        })
        .collect()
}
