//! Offline providers used when no real service is configured.

use anyhow::Result;
use async_trait::async_trait;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use std::sync::Mutex;

use crate::model::{Coordinates, Place, WeatherSample};

use super::{Geocoder, WeatherProvider};

const CONDITIONS: &[&str] = &[
    "Sunny",
    "Cloudy",
    "Partly Cloudy",
    "Rainy",
    "Thunderstorms",
    "Snow",
];

/// Produces plausible random weather for any coordinates.
#[derive(Debug)]
pub struct MockWeatherProvider {
    rng: Mutex<StdRng>,
}

impl MockWeatherProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible sequence of samples.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for MockWeatherProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn fetch_weather(&self, coordinates: Coordinates, label: &str) -> Result<WeatherSample> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("Mock weather generator is poisoned"))?;

        let condition = CONDITIONS.choose(&mut *rng).copied().unwrap_or("Sunny");

        let sample = WeatherSample {
            temperature_c: rng.random_range(5..40),
            condition: condition.to_string(),
            humidity_pct: rng.random_range(30..80),
            wind_speed_kmh: rng.random_range(5..25),
            location_label: label.to_string(),
        };

        tracing::debug!(lat = coordinates.lat, lon = coordinates.lon, ?sample, "Generated mock weather");
        Ok(sample)
    }
}

/// Resolves every input to the same coordinates, keeping the text as label.
#[derive(Debug, Clone, Copy)]
pub struct StubGeocoder {
    coordinates: Coordinates,
}

impl StubGeocoder {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

impl Default for StubGeocoder {
    fn default() -> Self {
        Self::new(Coordinates::new(40.7128, -74.0060))
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, location: &str) -> Result<Place> {
        Ok(Place {
            coordinates: self.coordinates,
            label: location.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_samples_stay_in_range() {
        let provider = MockWeatherProvider::seeded(7);
        let coords = Coordinates::new(0.0, 0.0);

        for _ in 0..200 {
            let s = provider.fetch_weather(coords, "Anywhere").await.unwrap();
            assert!((5..40).contains(&s.temperature_c));
            assert!((30..80).contains(&s.humidity_pct));
            assert!((5..25).contains(&s.wind_speed_kmh));
            assert!(CONDITIONS.contains(&s.condition.as_str()));
            assert_eq!(s.location_label, "Anywhere");
        }
    }

    #[tokio::test]
    async fn same_seed_same_samples() {
        let a = MockWeatherProvider::seeded(42);
        let b = MockWeatherProvider::seeded(42);
        let coords = Coordinates::new(1.0, 2.0);

        for _ in 0..5 {
            assert_eq!(
                a.fetch_weather(coords, "X").await.unwrap(),
                b.fetch_weather(coords, "X").await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn stub_geocoder_keeps_text_as_label() {
        let place = StubGeocoder::default().resolve("Paris").await.unwrap();
        assert_eq!(place.label, "Paris");
        assert_eq!(place.coordinates, Coordinates::new(40.7128, -74.0060));
    }
}
