use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;

use crate::{model::WeatherSample, recommend::RecommendationCard};

/// What the presentation layer is told during a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupEvent {
    /// Reset temperature/condition to placeholders and hide recommendations.
    LoadingStarted,
    WeatherDisplayed(WeatherSample),
    RecommendationsReady(Vec<RecommendationCard>),
    FavoritesChanged(Vec<String>),
    /// Show the message, hide recommendations and the favorite toggle.
    ErrorOccurred(String),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: LookupEvent);
}

impl EventSink for UnboundedSender<LookupEvent> {
    fn emit(&self, event: LookupEvent) {
        if self.send(event).is_err() {
            tracing::debug!("Presentation channel closed, dropping event");
        }
    }
}

/// Keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LookupEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<LookupEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: LookupEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn emit(&self, event: LookupEvent) {
        (**self).emit(event)
    }
}
