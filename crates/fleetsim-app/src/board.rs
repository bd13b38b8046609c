//! Text status board
//!
//! Plain-text stand-in for the map and sidebar: a header with fleet
//! counters and one row per vehicle.

use std::fmt::Write;

use fleetsim_core::fleet::Fleet;

/// Render the header and the rows of vehicles matching `query`
pub fn render(fleet: &Fleet, query: &str, tick: u64) -> String {
    let stats = fleet.stats();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "tick {:>5} | total {} | active {} | alerts {}",
        tick, stats.total, stats.active, stats.alert
    );
    let _ = writeln!(
        out,
        "{:<6} {:<16} {:<6} {:<8} {:>6} {:>6} {:>6} {:>5} {:>10} {:>11}",
        "ID", "NAME", "TYPE", "STATUS", "KM/H", "FUEL%", "TEMP", "HDG", "LAT", "LNG"
    );

    for v in fleet.search(query) {
        let t = &v.telemetry;
        let _ = writeln!(
            out,
            "{:<6} {:<16} {:<6} {:<8} {:>6.1} {:>6.1} {:>6.1} {:>5.0} {:>10.5} {:>11.5}",
            v.id,
            v.name,
            v.vehicle_type.to_string(),
            v.status.as_str(),
            t.speed,
            t.fuel_level,
            t.engine_temp,
            v.coordinates.heading,
            v.coordinates.lat,
            v.coordinates.lng,
        );
    }

    out
}
