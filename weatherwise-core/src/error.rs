use thiserror::Error;

/// Failures surfaced by a lookup or a favorites mutation.
///
/// None of these are fatal: the caller shows `user_message()` and the user
/// can retry.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("location input is empty")]
    EmptyInput,

    #[error("weather provider failed: {0}")]
    ProviderFailure(String),

    #[error("geolocation is not supported by this host")]
    GeolocationUnsupported,

    #[error("geolocation failed: {0}")]
    GeolocationFailure(String),

    #[error("failed to persist favorites: {0}")]
    PersistFailure(String),
}

impl LookupError {
    /// Short message suitable for the presentation layer.
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::EmptyInput => "Please enter a location",
            LookupError::ProviderFailure(_) => "Failed to fetch weather data. Please try again.",
            LookupError::GeolocationUnsupported => {
                "Geolocation is not supported by this browser."
            }
            LookupError::GeolocationFailure(_) => {
                "Unable to get your location. Please enter manually."
            }
            LookupError::PersistFailure(_) => "Could not save favorites. Please try again.",
        }
    }

    /// Wrap an `anyhow` chain from a provider, keeping every cause.
    pub fn provider(err: &anyhow::Error) -> Self {
        LookupError::ProviderFailure(format!("{err:#}"))
    }
}

/// Failures reported by a geolocation provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location request timed out")]
    Timeout,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn provider_failure_keeps_cause_chain() {
        let err = Err::<(), _>(anyhow::anyhow!("connection refused"))
            .context("Failed to send request")
            .unwrap_err();

        let msg = LookupError::provider(&err).to_string();
        assert!(msg.contains("Failed to send request"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn user_messages_are_not_technical() {
        let err = LookupError::GeolocationFailure("code 1".into());
        assert!(!err.user_message().contains("code 1"));
        assert_eq!(LookupError::EmptyInput.user_message(), "Please enter a location");
    }
}
