//! Core library for WeatherWise.
//!
//! This crate defines:
//! - Shared domain models (coordinates, weather samples)
//! - The recommendation rules derived from a sample
//! - The persisted favorites list
//! - Abstractions over weather, geocoding and geolocation providers
//! - The lookup controller that ties them together
//! - Configuration & credentials handling
//!
//! It is used by `weatherwise-cli`, but any host that can render
//! [`LookupEvent`]s can drive it.

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod favorites;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod recommend;

pub use config::{Config, ProviderConfig};
pub use controller::WeatherLookupController;
pub use error::{GeolocationError, LookupError};
pub use event::{EventSink, LookupEvent, RecordingSink};
pub use favorites::{FAVORITES_KEY, FavoritesStore, FileStore, KeyValueStore, MemoryStore, Toggle};
pub use geolocation::{FixedPosition, GeolocationProvider, PositionOptions, Unsupported};
pub use model::{Coordinates, Place, WeatherSample, condition_icon};
pub use provider::{Geocoder, ProviderId, ProviderPair, WeatherProvider};
pub use recommend::{Category, RecommendationCard, RuleId, derive_recommendations};
