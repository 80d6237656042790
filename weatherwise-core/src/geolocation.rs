//! Device position, supplied by the host.

use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

use crate::{error::GeolocationError, model::Coordinates};

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the host may return instead of taking a new one.
    pub max_cached_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_cached_age: Duration::from_secs(300),
        }
    }
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync + Debug {
    /// Whether the host can produce a position at all.
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

/// Request a position, enforcing `options.timeout` regardless of whether the
/// provider honours it.
pub async fn request_position(
    provider: &dyn GeolocationProvider,
    options: &PositionOptions,
) -> Result<Coordinates, GeolocationError> {
    match tokio::time::timeout(options.timeout, provider.current_position(options)).await {
        Ok(result) => result,
        Err(_) => Err(GeolocationError::Timeout),
    }
}

/// Host with no positioning capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl GeolocationProvider for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable(
            "no positioning capability".to_string(),
        ))
    }
}

/// Host that already knows where it is, e.g. from command-line flags.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition {
    coordinates: Coordinates,
}

impl FixedPosition {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        Ok(self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Stalled;

    #[async_trait]
    impl GeolocationProvider for Stalled {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, GeolocationError> {
            std::future::pending().await
        }
    }

    #[test]
    fn default_options_match_browser_request() {
        let opts = PositionOptions::default();
        assert!(opts.high_accuracy);
        assert_eq!(opts.timeout, Duration::from_millis(10_000));
        assert_eq!(opts.max_cached_age, Duration::from_millis(300_000));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_provider_times_out() {
        let err = request_position(&Stalled, &PositionOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::Timeout);
    }

    #[tokio::test]
    async fn fixed_position_is_returned() {
        let coords = Coordinates::new(51.5, -0.12);
        let got = request_position(&FixedPosition::new(coords), &PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(got, coords);
    }

    #[test]
    fn unsupported_reports_itself() {
        assert!(!Unsupported.is_supported());
        assert!(FixedPosition::new(Coordinates::new(0.0, 0.0)).is_supported());
    }
}
