use crate::{
    Config,
    model::{Coordinates, Place, WeatherSample},
    provider::{
        mock::{MockWeatherProvider, StubGeocoder},
        openweather::OpenWeatherProvider,
    },
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod mock;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Mock,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Mock => "mock",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Mock, ProviderId::OpenWeather]
    }

    /// Whether this provider needs an API key before it can be used.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "mock" => Ok(ProviderId::Mock),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: mock, openweather."
            )),
        }
    }
}

/// Source of weather samples for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current weather at `coordinates`. `label` becomes the sample's
    /// location label.
    async fn fetch_weather(
        &self,
        coordinates: Coordinates,
        label: &str,
    ) -> anyhow::Result<WeatherSample>;
}

/// Resolves free-form location text to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, location: &str) -> anyhow::Result<Place>;
}

/// Geocoder and weather provider backed by the same service.
#[derive(Debug, Clone)]
pub struct ProviderPair {
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherProvider>,
}

/// Construct a provider pair from config and explicit ProviderId.
pub fn provider_from_config(id: ProviderId, config: &Config) -> anyhow::Result<ProviderPair> {
    let pair = match id {
        ProviderId::Mock => ProviderPair {
            geocoder: Arc::new(StubGeocoder::default()),
            weather: Arc::new(MockWeatherProvider::new()),
        },
        ProviderId::OpenWeather => {
            let api_key = config.provider_api_key(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for provider '{id}'.\n\
                         Hint: run `weatherwise configure {id}` and enter your API key."
                )
            })?;
            let provider = Arc::new(OpenWeatherProvider::new(api_key.to_owned()));
            ProviderPair {
                geocoder: provider.clone(),
                weather: provider,
            }
        }
    };

    Ok(pair)
}

/// Construct the default provider pair from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<ProviderPair> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_is_case_insensitive() {
        assert_eq!(ProviderId::try_from("OpenWeather").unwrap(), ProviderId::OpenWeather);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(ProviderId::OpenWeather, &cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider"));
    }

    #[test]
    fn mock_provider_needs_no_key() {
        let cfg = Config::default();
        assert!(provider_from_config(ProviderId::Mock, &cfg).is_ok());
        assert!(!ProviderId::Mock.requires_api_key());
    }

    #[test]
    fn default_provider_falls_back_to_mock() {
        let cfg = Config::default();
        assert!(default_provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn default_provider_from_config_works_when_set_and_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::OpenWeather);
        assert!(default_provider_from_config(&cfg).is_ok());
    }
}
