//! Orchestrates one lookup at a time and keeps favorites in step.

use std::sync::Arc;

use crate::{
    error::LookupError,
    event::{EventSink, LookupEvent},
    favorites::{FavoritesStore, KeyValueStore, Toggle},
    geolocation::{GeolocationProvider, PositionOptions, request_position},
    model::WeatherSample,
    provider::{Geocoder, ProviderPair, WeatherProvider},
    recommend::derive_recommendations,
};

/// Drives searches and favorites on behalf of a presentation layer.
///
/// Lookups take `&mut self`, so a controller never has two lookups in flight.
pub struct WeatherLookupController<S, E> {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    geolocation: Arc<dyn GeolocationProvider>,
    position_options: PositionOptions,
    favorites: FavoritesStore<S>,
    events: E,
    current: Option<String>,
}

impl<S: KeyValueStore, E: EventSink> WeatherLookupController<S, E> {
    pub fn new(
        providers: ProviderPair,
        geolocation: Arc<dyn GeolocationProvider>,
        favorites: FavoritesStore<S>,
        events: E,
    ) -> Self {
        Self {
            geocoder: providers.geocoder,
            weather: providers.weather,
            geolocation,
            position_options: PositionOptions::default(),
            favorites,
            events,
            current: None,
        }
    }

    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.position_options = options;
        self
    }

    /// Label of the most recently displayed sample, if the last lookup succeeded.
    pub fn current_selection(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Look up weather for typed location text.
    pub async fn search(&mut self, raw: &str) -> Result<WeatherSample, LookupError> {
        let location = raw.trim();
        if location.is_empty() {
            // Nothing was looked up, so the displayed weather stays selected.
            return Err(self.report(LookupError::EmptyInput));
        }

        self.events.emit(LookupEvent::LoadingStarted);

        let result = self.lookup_text(location).await;
        self.finish(result)
    }

    /// Look up weather at the host's current position.
    pub async fn search_by_current_position(&mut self) -> Result<WeatherSample, LookupError> {
        if !self.geolocation.is_supported() {
            return Err(self.fail(LookupError::GeolocationUnsupported));
        }

        self.events.emit(LookupEvent::LoadingStarted);

        let position = request_position(self.geolocation.as_ref(), &self.position_options).await;
        let coordinates = match position {
            Ok(coordinates) => coordinates,
            Err(err) => return Err(self.fail(LookupError::GeolocationFailure(err.to_string()))),
        };

        let label = coordinates.current_location_label();
        tracing::debug!(%label, "Resolved current position");

        let result = self
            .weather
            .fetch_weather(coordinates, &label)
            .await
            .map_err(|err| LookupError::provider(&err));
        self.finish(result)
    }

    /// Re-run a search for a saved location.
    pub async fn search_favorite(&mut self, label: &str) -> Result<WeatherSample, LookupError> {
        self.search(label).await
    }

    /// Re-read favorites from storage and publish them.
    pub fn load_favorites(&mut self) -> Vec<String> {
        let labels = self.favorites.reload().to_vec();
        self.events.emit(LookupEvent::FavoritesChanged(labels.clone()));
        labels
    }

    pub fn favorites(&self) -> &[String] {
        self.favorites.labels()
    }

    pub fn is_current_favorite(&self) -> bool {
        self.current
            .as_deref()
            .is_some_and(|label| self.favorites.contains(label))
    }

    /// Toggle the current selection. `Ok(None)` when nothing is selected.
    pub fn toggle_current_favorite(&mut self) -> Result<Option<Toggle>, LookupError> {
        let Some(label) = self.current.clone() else {
            return Ok(None);
        };
        self.toggle_favorite(&label).map(Some)
    }

    pub fn toggle_favorite(&mut self, label: &str) -> Result<Toggle, LookupError> {
        match self.favorites.toggle(label) {
            Ok(outcome) => {
                self.publish_favorites();
                Ok(outcome)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub fn remove_favorite(&mut self, label: &str) -> Result<bool, LookupError> {
        match self.favorites.remove(label) {
            Ok(true) => {
                self.publish_favorites();
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(err) => Err(self.report(err)),
        }
    }

    async fn lookup_text(&self, location: &str) -> Result<WeatherSample, LookupError> {
        let place = self
            .geocoder
            .resolve(location)
            .await
            .map_err(|err| LookupError::provider(&err))?;

        self.weather
            .fetch_weather(place.coordinates, &place.label)
            .await
            .map_err(|err| LookupError::provider(&err))
    }

    fn finish(
        &mut self,
        result: Result<WeatherSample, LookupError>,
    ) -> Result<WeatherSample, LookupError> {
        let sample = result.map_err(|err| self.fail(err))?;

        tracing::info!(
            location = %sample.location_label,
            temperature_c = sample.temperature_c,
            condition = %sample.condition,
            "Weather displayed"
        );

        self.current = Some(sample.location_label.clone());
        self.events.emit(LookupEvent::WeatherDisplayed(sample.clone()));
        self.events
            .emit(LookupEvent::RecommendationsReady(derive_recommendations(&sample)));

        Ok(sample)
    }

    /// A lookup that got under way failed: the previous selection is gone.
    fn fail(&mut self, err: LookupError) -> LookupError {
        self.current = None;
        self.report(err)
    }

    fn report(&self, err: LookupError) -> LookupError {
        tracing::warn!(error = %err, "Weather action failed");
        self.events
            .emit(LookupEvent::ErrorOccurred(err.user_message().to_string()));
        err
    }

    fn publish_favorites(&self) {
        self.events
            .emit(LookupEvent::FavoritesChanged(self.favorites.labels().to_vec()));
    }
}
