//! Vehicle snapshot model
//!
//! One [`VehicleSnapshot`] is the full observable state of a vehicle at one
//! instant. Snapshots are values: the simulator builds a new one every tick
//! and never mutates the previous one.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Waypoint;
use crate::routes::Route;

/// Number of past telemetry samples kept per vehicle
pub const HISTORY_CAPACITY: usize = 20;

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Driving along its route
    Moving,
    /// Engine running, parked
    Idle,
    /// Engine off
    Stopped,
    /// Not reporting
    Offline,
    /// Needs attention; still driving
    Alert,
}

impl VehicleStatus {
    /// Whether the vehicle advances along its route this tick
    pub fn is_in_motion(&self) -> bool {
        matches!(self, VehicleStatus::Moving | VehicleStatus::Alert)
    }

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Moving => "Moving",
            VehicleStatus::Idle => "Idle",
            VehicleStatus::Stopped => "Stopped",
            VehicleStatus::Offline => "Offline",
            VehicleStatus::Alert => "Alert",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body type of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Truck,
    Van,
    Car,
}

impl VehicleType {
    /// Type assigned to the vehicle at fleet ordinal `ordinal`
    pub fn for_ordinal(ordinal: usize) -> Self {
        if ordinal % 3 == 0 {
            VehicleType::Truck
        } else if ordinal % 2 == 0 {
            VehicleType::Van
        } else {
            VehicleType::Car
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VehicleType::Truck => "Truck",
            VehicleType::Van => "Van",
            VehicleType::Car => "Car",
        };
        f.write_str(label)
    }
}

/// Sensor readings at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    /// Speed in km/h
    pub speed: f64,
    /// Fuel level in percent (0-100)
    pub fuel_level: f64,
    /// Engine coolant temperature in °C
    pub engine_temp: f64,
    /// Battery voltage in volts
    pub battery_voltage: f64,
    /// Engine speed
    pub rpm: f64,
    /// Total distance in km
    pub odometer: f64,
    /// Tire pressures in PSI (front-left, front-right, rear-left, rear-right)
    pub tire_pressure: [f64; 4],
}

/// A single telemetry field, for extracting chart series from history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryChannel {
    Speed,
    FuelLevel,
    EngineTemp,
    BatteryVoltage,
    Rpm,
    Odometer,
}

impl Telemetry {
    /// Value of one channel
    pub fn channel(&self, channel: TelemetryChannel) -> f64 {
        match channel {
            TelemetryChannel::Speed => self.speed,
            TelemetryChannel::FuelLevel => self.fuel_level,
            TelemetryChannel::EngineTemp => self.engine_temp,
            TelemetryChannel::BatteryVoltage => self.battery_voltage,
            TelemetryChannel::Rpm => self.rpm,
            TelemetryChannel::Odometer => self.odometer,
        }
    }
}

/// Sliding window of past telemetry, most recent last
///
/// Holds at most [`HISTORY_CAPACITY`] samples; pushing onto a full window
/// evicts the oldest sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Telemetry>", into = "Vec<Telemetry>")]
pub struct TelemetryHistory {
    samples: VecDeque<Telemetry>,
}

impl TelemetryHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Copy of this history with `sample` appended
    pub fn with_sample(&self, sample: Telemetry) -> Self {
        let mut next = self.clone();
        next.push(sample);
        next
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, sample: Telemetry) {
        while self.samples.len() >= HISTORY_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&Telemetry> {
        self.samples.back()
    }

    /// Iterate samples oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Telemetry> {
        self.samples.iter()
    }

    /// Values of one channel across the window, oldest first
    pub fn series(&self, channel: TelemetryChannel) -> Vec<f64> {
        self.samples.iter().map(|t| t.channel(channel)).collect()
    }
}

impl From<Vec<Telemetry>> for TelemetryHistory {
    fn from(samples: Vec<Telemetry>) -> Self {
        let mut history = Self::new();
        for sample in samples {
            history.push(sample);
        }
        history
    }
}

impl From<TelemetryHistory> for Vec<Telemetry> {
    fn from(history: TelemetryHistory) -> Self {
        history.samples.into()
    }
}

/// Travel direction along a route's waypoint sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    /// Towards higher waypoint indices (+1)
    Forward,
    /// Towards lower waypoint indices (-1)
    Backward,
}

impl Direction {
    /// Index offset: +1 or -1
    pub fn offset(&self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// The opposite direction
    pub fn reversed(&self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> i8 {
        direction.offset() as i8
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Forward),
            -1 => Ok(Direction::Backward),
            other => Err(format!("direction must be 1 or -1, got {}", other)),
        }
    }
}

/// Position of a vehicle within its route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    /// Index into the route table
    pub route_id: usize,
    /// Starting waypoint of the active segment
    pub waypoint_index: usize,
    /// Fraction of the active segment covered, in `[0, 1)`
    pub progress: f64,
    /// Direction of travel
    pub direction: Direction,
}

impl SimulationState {
    /// Start of `route_id`, heading forward
    pub fn at_route_start(route_id: usize) -> Self {
        Self {
            route_id,
            waypoint_index: 0,
            progress: 0.0,
            direction: Direction::Forward,
        }
    }

    /// Index one step along `direction`, if it stays inside `route`
    pub fn next_index(&self, route: &Route) -> Option<usize> {
        self.waypoint_index
            .checked_add_signed(self.direction.offset())
            .filter(|&i| route.contains_index(i))
    }

    /// Flip direction if the next index would leave the route
    pub fn turned_at_ends(mut self, route: &Route) -> Self {
        if self.next_index(route).is_none() {
            self.direction = self.direction.reversed();
        }
        self
    }

    /// Both the current index and the next index are inside `route`
    pub fn is_valid_for(&self, route: &Route) -> bool {
        route.contains_index(self.waypoint_index) && self.next_index(route).is_some()
    }
}

/// Geographic position and heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Degrees clockwise from north, in `[0, 360)`
    pub heading: f64,
}

impl Coordinates {
    /// Coordinates at `point` facing `heading`
    pub fn at(point: Waypoint, heading: f64) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
            heading,
        }
    }

    /// Position without heading
    pub fn position(&self) -> Waypoint {
        Waypoint::new(self.lat, self.lng)
    }
}

/// Full observable state of one vehicle at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSnapshot {
    /// Stable identity, never reused
    pub id: String,
    /// Display name
    pub name: String,
    /// Body type
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    /// Operational status
    pub status: VehicleStatus,
    /// Driver name
    pub driver: String,
    /// Position and heading
    pub coordinates: Coordinates,
    /// Latest sensor readings
    pub telemetry: Telemetry,
    /// Recent readings for charts
    pub history: TelemetryHistory,
    /// Route traversal state
    pub simulation_state: SimulationState,
    /// Wall-clock time of the last tick that produced this snapshot
    pub last_update: DateTime<Utc>,
}
