//! Fleet Summarizer
//!
//! Turns fleet and vehicle snapshots into prose through a text-generation
//! backend. Every call returns presentable text: backend failures are
//! logged and replaced with a fixed fallback message, and nothing here
//! touches simulation state.
//!
//! Calls are independent. Dropping an in-flight future abandons that
//! request without affecting later ones.
//!
//! ## Usage
//!
//! ```ignore
//! let summarizer = FleetSummarizer::from_config(&config.summarizer);
//! let report = summarizer.summarize_fleet(&driver.current()).await;
//! println!("{report}");
//! ```

mod error;
mod gemini;

pub use error::SummaryError;
pub use gemini::GeminiClient;

use std::future::Future;

use serde::Serialize;

use crate::config::SummarizerConfig;
use crate::fleet::Fleet;
use crate::vehicle::{VehicleSnapshot, VehicleStatus};

/// Vehicle analysis when no API key is configured
pub const VEHICLE_KEY_MISSING: &str = "API Key missing. Cannot generate analysis.";
/// Vehicle analysis when the backend call fails
pub const VEHICLE_FAILED: &str = "Failed to analyze vehicle health due to an API error.";
/// Vehicle analysis when the backend returns no text
pub const VEHICLE_EMPTY: &str = "No analysis generated.";
/// Fleet insights when no API key is configured
pub const FLEET_KEY_MISSING: &str = "API Key missing.";
/// Fleet insights when the backend call fails
pub const FLEET_FAILED: &str = "Failed to generate fleet insights.";
/// Fleet insights when the backend returns no text
pub const FLEET_EMPTY: &str = "No insights generated.";

/// A backend that completes a prompt with text
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, SummaryError>> + Send;
}

/// Fleet and vehicle analysis with guaranteed text output
pub struct FleetSummarizer<G = GeminiClient> {
    backend: Option<G>,
}

impl FleetSummarizer<GeminiClient> {
    /// Summarizer backed by the Generative Language API
    ///
    /// Without an API key in the configured environment variable the
    /// summarizer still works but only returns the key-missing messages.
    pub fn from_config(config: &SummarizerConfig) -> Self {
        match GeminiClient::from_env(config) {
            Ok(client) => Self::new(client),
            Err(e) => {
                tracing::warn!("Fleet summaries disabled: {e}");
                Self::unconfigured()
            }
        }
    }
}

impl<G: TextGenerator> FleetSummarizer<G> {
    /// Summarizer using `backend`
    pub fn new(backend: G) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Summarizer with no backend
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    /// Whether a backend is available
    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Maintenance assessment of one vehicle
    pub async fn analyze_vehicle(&self, vehicle: &VehicleSnapshot) -> String {
        let Some(backend) = &self.backend else {
            return VEHICLE_KEY_MISSING.to_string();
        };

        match backend.generate(&vehicle_prompt(vehicle)).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => VEHICLE_EMPTY.to_string(),
            Err(e) => {
                tracing::warn!("Vehicle analysis for {} failed: {e}", vehicle.id);
                VEHICLE_FAILED.to_string()
            }
        }
    }

    /// Strategic overview of the whole fleet
    pub async fn summarize_fleet(&self, fleet: &Fleet) -> String {
        let Some(backend) = &self.backend else {
            return FLEET_KEY_MISSING.to_string();
        };

        match backend.generate(&fleet_prompt(fleet)).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => FLEET_EMPTY.to_string(),
            Err(e) => {
                tracing::warn!("Fleet insights failed: {e}");
                FLEET_FAILED.to_string()
            }
        }
    }
}

/// Per-vehicle line of the fleet digest sent to the backend
#[derive(Debug, Serialize)]
struct DigestEntry<'a> {
    name: &'a str,
    status: VehicleStatus,
    fuel: f64,
    temp: f64,
}

/// Prompt asking for a maintenance assessment of `vehicle`
pub fn vehicle_prompt(vehicle: &VehicleSnapshot) -> String {
    let t = &vehicle.telemetry;
    let tires = t
        .tire_pressure
        .iter()
        .map(|p| format!("{:.0}", p))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a senior fleet maintenance engineer. Analyze the following telemetry for vehicle {name} ({kind}).\n\
         \n\
         Current Status: {status}\n\
         Speed: {speed:.1} km/h\n\
         RPM: {rpm:.0}\n\
         Engine Temp: {temp:.1}°C\n\
         Fuel Level: {fuel:.1}%\n\
         Battery: {battery:.1}V\n\
         Tire Pressures (PSI): {tires}\n\
         \n\
         Provide a concise, professional assessment in markdown.\n\
         1. Identify any immediate anomalies or safety risks (e.g. high temp, low pressure).\n\
         2. Give a maintenance recommendation.\n\
         3. Rate the driver's current efficiency based on speed/rpm balance (assume highway driving).\n\
         \n\
         Keep it under 150 words.\n",
        name = vehicle.name,
        kind = vehicle.vehicle_type,
        status = vehicle.status,
        speed = t.speed,
        rpm = t.rpm,
        temp = t.engine_temp,
        fuel = t.fuel_level,
        battery = t.battery_voltage,
        tires = tires,
    )
}

/// Prompt asking for a strategic overview of `fleet`
pub fn fleet_prompt(fleet: &Fleet) -> String {
    let digest: Vec<DigestEntry<'_>> = fleet
        .iter()
        .map(|v| DigestEntry {
            name: &v.name,
            status: v.status,
            fuel: v.telemetry.fuel_level,
            temp: v.telemetry.engine_temp,
        })
        .collect();
    let digest = serde_json::to_string_pretty(&digest).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a logistics operations manager. Here is a snapshot of the current fleet status:\n\
         {digest}\n\
         \n\
         Provide a high-level strategic overview.\n\
         - How many vehicles are critical?\n\
         - Are there systemic fuel issues?\n\
         - Suggest a routing optimization strategy based on the status mix.\n\
         \n\
         Be brief and actionable.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::build_initial_fleet;
    use crate::routes::RouteTable;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    /// Backend returning a canned result and recording prompts
    struct Canned {
        reply: Result<&'static str, &'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(reply: Result<&'static str, &'static str>) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .map(str::to_string)
                .map_err(|e| SummaryError::InvalidResponse(e.to_string()))
        }
    }

    fn fleet() -> Fleet {
        let mut rng = StdRng::seed_from_u64(3);
        build_initial_fleet(3, &RouteTable::san_francisco(), &mut rng, Utc::now())
    }

    #[tokio::test]
    async fn test_passes_backend_text_through() {
        let summarizer = FleetSummarizer::new(Canned::new(Ok("All units nominal.")));
        assert_eq!(summarizer.summarize_fleet(&fleet()).await, "All units nominal.");
    }

    #[tokio::test]
    async fn test_backend_error_becomes_fallback() {
        let summarizer = FleetSummarizer::new(Canned::new(Err("boom")));
        let fleet = fleet();
        assert_eq!(summarizer.summarize_fleet(&fleet).await, FLEET_FAILED);
        assert_eq!(
            summarizer.analyze_vehicle(&fleet.vehicles()[0]).await,
            VEHICLE_FAILED
        );
    }

    #[tokio::test]
    async fn test_blank_reply_becomes_fallback() {
        let summarizer = FleetSummarizer::new(Canned::new(Ok("  \n")));
        let fleet = fleet();
        assert_eq!(summarizer.summarize_fleet(&fleet).await, FLEET_EMPTY);
        assert_eq!(
            summarizer.analyze_vehicle(&fleet.vehicles()[1]).await,
            VEHICLE_EMPTY
        );
    }

    #[tokio::test]
    async fn test_unconfigured_reports_missing_key() {
        assert_eq!(FLEET_KEY_MISSING, "API Key missing.");
        assert_eq!(VEHICLE_KEY_MISSING, "API Key missing. Cannot generate analysis.");

        let summarizer = FleetSummarizer::<Canned>::unconfigured();
        assert!(!summarizer.is_configured());
        let fleet = fleet();
        assert_eq!(summarizer.summarize_fleet(&fleet).await, FLEET_KEY_MISSING);
        assert_eq!(
            summarizer.analyze_vehicle(&fleet.vehicles()[0]).await,
            VEHICLE_KEY_MISSING
        );
    }

    #[tokio::test]
    async fn test_fleet_prompt_contains_digest() {
        let backend = Canned::new(Ok("ok"));
        let summarizer = FleetSummarizer::new(backend);
        let fleet = fleet();
        summarizer.summarize_fleet(&fleet).await;

        let prompts = summarizer
            .backend
            .as_ref()
            .map(|b| b.prompts.lock().unwrap().clone())
            .unwrap_or_default();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"name\": \"Unit Alpha-1\""));
        assert!(prompts[0].contains("\"status\": \"Moving\""));
        assert!(prompts[0].contains("\"temp\": 85.0"));
    }

    #[test]
    fn test_vehicle_prompt_lists_telemetry() {
        let fleet = fleet();
        let prompt = vehicle_prompt(&fleet.vehicles()[0]);
        assert!(prompt.contains("vehicle Unit Alpha-1 (Truck)"));
        assert!(prompt.contains("Current Status: Moving"));
        assert!(prompt.contains("Engine Temp: 85.0°C"));
        assert!(prompt.contains("Battery: 12.6V"));
        assert!(prompt.contains("Tire Pressures (PSI): 32, 32, 32, 32"));
    }
}
