//! # FleetSim Core Library
//!
//! Core functionality for the FleetSim fleet-tracking dashboard.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Great-circle geometry for waypoints (distance, bearing, interpolation)
//! - A fixed catalog of patrol routes
//! - The vehicle snapshot and telemetry model
//! - The per-tick simulation step that advances a whole fleet
//! - A driver loop that publishes each new fleet atomically
//! - Fleet and vehicle summaries backed by a text-generation service
//!
//! ## Example
//!
//! ```rust,ignore
//! use fleetsim_core::prelude::*;
//!
//! let mut simulator = FleetSimulator::with_seed(RouteTable::san_francisco(), 7);
//! let fleet = simulator.build_initial_fleet(8);
//! let next = simulator.step(&fleet, 1.0);
//! println!("{} moving", next.stats().active);
//! ```

pub mod config;
pub mod driver;
pub mod fleet;
pub mod geo;
pub mod routes;
pub mod simulation;
pub mod summarizer;
pub mod vehicle;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{FleetConfig, SummarizerConfig};
    pub use crate::driver::FleetDriver;
    pub use crate::fleet::{Fleet, FleetStats};
    pub use crate::geo::{bearing_deg, distance_km, Waypoint};
    pub use crate::routes::{Route, RouteTable};
    pub use crate::simulation::FleetSimulator;
    pub use crate::summarizer::{FleetSummarizer, GeminiClient, TextGenerator};
    pub use crate::vehicle::{
        Coordinates, Direction, SimulationState, Telemetry, TelemetryHistory, VehicleSnapshot,
        VehicleStatus, VehicleType,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
