//! Route Table
//!
//! A fixed, ordered catalog of named polylines. Vehicles hold an index into
//! the table and patrol their route back and forth for the process lifetime.

use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Waypoint;

/// Errors raised when building a route table from caller-supplied routes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("Route table has no routes")]
    Empty,

    #[error("Route '{name}' has {count} waypoint(s), at least 2 are required")]
    TooShort { name: String, count: usize },

    #[error("Route '{name}' has a non-finite coordinate at waypoint {index}")]
    NonFinite { name: String, index: usize },
}

/// A named, ordered sequence of at least two waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Display name
    pub name: String,
    /// Ordered waypoints
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    /// Create a new route
    pub fn new(name: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        Self {
            name: name.into(),
            waypoints,
        }
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if the route has no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at `index`, if in range
    pub fn get(&self, index: usize) -> Option<Waypoint> {
        self.waypoints.get(index).copied()
    }

    /// Whether `index` addresses a waypoint of this route
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.waypoints.len()
    }

    fn validate(&self) -> Result<(), RouteError> {
        if self.waypoints.len() < 2 {
            return Err(RouteError::TooShort {
                name: self.name.clone(),
                count: self.waypoints.len(),
            });
        }
        if let Some(index) = self.waypoints.iter().position(|w| !w.is_finite()) {
            return Err(RouteError::NonFinite {
                name: self.name.clone(),
                index,
            });
        }
        Ok(())
    }
}

impl Index<usize> for Route {
    type Output = Waypoint;

    fn index(&self, index: usize) -> &Waypoint {
        &self.waypoints[index]
    }
}

/// Immutable, validated catalog of routes
///
/// Cloning is cheap; clones share the same route storage.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    routes: Arc<[Route]>,
}

impl RouteTable {
    /// Build a table from routes, rejecting any route shorter than two waypoints
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        if routes.is_empty() {
            return Err(RouteError::Empty);
        }
        for route in &routes {
            route.validate()?;
        }
        Ok(Self {
            routes: routes.into(),
        })
    }

    /// Built-in downtown San Francisco routes approximating real roads
    pub fn san_francisco() -> Self {
        let routes = vec![
            Route::new(
                "Market St",
                vec![
                    Waypoint::new(37.7953, -122.3937),
                    Waypoint::new(37.7881, -122.4025),
                    Waypoint::new(37.7718, -122.4223),
                    Waypoint::new(37.7635, -122.4357),
                ],
            ),
            Route::new(
                "The Embarcadero",
                vec![
                    Waypoint::new(37.7885, -122.3879),
                    Waypoint::new(37.7997, -122.3966),
                    Waypoint::new(37.8080, -122.4101),
                    Waypoint::new(37.8060, -122.4220),
                ],
            ),
            Route::new(
                "Van Ness Ave",
                vec![
                    Waypoint::new(37.7713, -122.4196),
                    Waypoint::new(37.7865, -122.4217),
                    Waypoint::new(37.8050, -122.4246),
                ],
            ),
            Route::new(
                "Central Fwy to Octavia",
                vec![
                    Waypoint::new(37.7660, -122.4070),
                    Waypoint::new(37.7695, -122.4150),
                    Waypoint::new(37.7715, -122.4200),
                    Waypoint::new(37.7745, -122.4250),
                ],
            ),
            Route::new(
                "Mission St",
                vec![
                    Waypoint::new(37.7915, -122.3980),
                    Waypoint::new(37.7525, -122.4180),
                ],
            ),
            Route::new(
                "3rd Street",
                vec![
                    Waypoint::new(37.7870, -122.4000),
                    Waypoint::new(37.7760, -122.3920),
                    Waypoint::new(37.7650, -122.3850),
                ],
            ),
        ];

        Self {
            routes: routes.into(),
        }
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Always false for a constructed table
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route at `id`, if in range
    pub fn get(&self, id: usize) -> Option<&Route> {
        self.routes.get(id)
    }

    /// Iterate routes in table order
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Round-robin route assignment for the vehicle at fleet ordinal `ordinal`
    pub fn route_for_ordinal(&self, ordinal: usize) -> usize {
        ordinal % self.routes.len()
    }
}

impl Index<usize> for RouteTable {
    type Output = Route;

    fn index(&self, id: usize) -> &Route {
        &self.routes[id]
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::san_francisco()
    }
}
