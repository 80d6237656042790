use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::model::{Coordinates, Place, WeatherSample};

use super::{Geocoder, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeatherMap current-weather and direct-geocoding client.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, coordinates: Coordinates, label: &str) -> Result<WeatherSample> {
        tracing::debug!(lat = coordinates.lat, lon = coordinates.lon, "Fetching OpenWeather current weather");

        let parsed: OwCurrentResponse = self
            .get_json(
                "/data/2.5/weather",
                &[
                    ("lat", coordinates.lat.to_string()),
                    ("lon", coordinates.lon.to_string()),
                    ("units", "metric".to_string()),
                ],
                "current weather",
            )
            .await?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(WeatherSample {
            temperature_c: parsed.main.temp.round() as i32,
            condition,
            humidity_pct: parsed.main.humidity.min(100),
            wind_speed_kmh: mps_to_kmh(parsed.wind.speed),
            location_label: label.to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for OpenWeatherProvider {
    async fn resolve(&self, location: &str) -> Result<Place> {
        tracing::debug!(location, "Resolving location with OpenWeather geocoding");

        let entries: Vec<OwGeoEntry> = self
            .get_json(
                "/geo/1.0/direct",
                &[("q", location.to_string()), ("limit", "1".to_string())],
                "geocoding",
            )
            .await?;

        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Unknown location '{location}'"))?;

        let label = match entry.country {
            Some(country) => format!("{}, {}", entry.name, country),
            None => entry.name,
        };

        Ok(Place {
            coordinates: Coordinates::new(entry.lat, entry.lon),
            label,
        })
    }
}

fn mps_to_kmh(speed: f64) -> u32 {
    (speed.max(0.0) * 3.6).round() as u32
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
