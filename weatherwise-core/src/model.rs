use serde::{Deserialize, Serialize};

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Label used when the location came from the device position rather than
    /// from typed text, e.g. `Current Location (40.71, -74.01)`.
    pub fn current_location_label(&self) -> String {
        format!("Current Location ({:.2}, {:.2})", self.lat, self.lon)
    }
}

/// Result of resolving free-form location text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub coordinates: Coordinates,
    pub label: String,
}

/// One weather observation, produced once per lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub temperature_c: i32,
    /// Free text such as "Partly Cloudy"; matched case-insensitively.
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: u32,
    pub location_label: String,
}

const CONDITION_ICONS: &[(&str, &str)] = &[
    ("sunny", "☀️"),
    ("cloudy", "☁️"),
    ("partlycloudy", "⛅"),
    ("rainy", "🌧️"),
    ("thunderstorms", "⛈️"),
    ("snow", "❄️"),
    ("fog", "🌫️"),
    ("windy", "💨"),
];

const DEFAULT_ICON: &str = "🌤️";

/// Display icon for a condition label. The first keyword contained in the
/// lower-cased label wins, so "Partly Cloudy" renders as cloudy.
pub fn condition_icon(condition: &str) -> &'static str {
    let normalized = condition.to_lowercase();

    CONDITION_ICONS
        .iter()
        .find(|(key, _)| normalized.contains(key))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_location_label_rounds_to_two_decimals() {
        let coords = Coordinates::new(40.7128, -74.0060);
        assert_eq!(coords.current_location_label(), "Current Location (40.71, -74.01)");
    }

    #[test]
    fn condition_icon_is_case_insensitive() {
        assert_eq!(condition_icon("SUNNY"), "☀️");
        assert_eq!(condition_icon("Light snow"), "❄️");
    }

    #[test]
    fn condition_icon_falls_back_to_default() {
        assert_eq!(condition_icon("Hazy"), DEFAULT_ICON);
        assert_eq!(condition_icon(""), DEFAULT_ICON);
    }

    #[test]
    fn partly_cloudy_matches_cloudy_first() {
        assert_eq!(condition_icon("Partly Cloudy"), "☁️");
    }
}
