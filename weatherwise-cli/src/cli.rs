use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use weatherwise_core::{
    Config, Coordinates, FavoritesStore, FileStore, FixedPosition, GeolocationProvider,
    LookupError, LookupEvent, ProviderId, ProviderPair, RecommendationCard, Toggle, Unsupported,
    WeatherLookupController, WeatherSample, condition_icon,
    provider::{default_provider_from_config, mock::MockWeatherProvider},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weatherwise",
    version,
    about = "Weather with clothing, activity and health tips"
)]
pub struct Cli {
    /// Seed the offline mock provider for repeatable output.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "mock" or "openweather".
        provider: String,
    },

    /// Show weather for a location.
    Show {
        /// Address or location name.
        location: String,

        /// Toggle the location in favorites after showing it.
        #[arg(long)]
        favorite: bool,
    },

    /// Show weather for the current position.
    Here {
        /// Latitude of the current position.
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude of the current position.
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// Manage favorite locations.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List saved locations.
    List,
    /// Add a location, or remove it if already saved.
    Toggle { label: String },
    /// Remove a saved location.
    Remove { label: String },
    /// Show weather for a saved location.
    Show { label: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure { provider } => configure(config, &provider),
            Command::Show { location, favorite } => {
                session(&config, self.seed, Arc::new(Unsupported), |mut c| async move {
                    if rendered(c.search(&location).await).is_none() {
                        return Ok::<_, anyhow::Error>(());
                    }
                    if favorite && let Some(outcome) = rendered(c.toggle_current_favorite()) {
                        let label = c.current_selection().unwrap_or(location.trim());
                        report_toggle(label, outcome);
                    }
                    Ok(())
                })
                .await
            }
            Command::Here { lat, lon } => {
                let geolocation: Arc<dyn GeolocationProvider> = match (lat, lon) {
                    (Some(lat), Some(lon)) => {
                        Arc::new(FixedPosition::new(Coordinates::new(lat, lon)))
                    }
                    _ => Arc::new(Unsupported),
                };
                session(&config, self.seed, geolocation, |mut c| async move {
                    rendered(c.search_by_current_position().await);
                    Ok::<_, anyhow::Error>(())
                })
                .await
            }
            Command::Favorites { action } => {
                let action = action.unwrap_or(FavoritesCommand::List);
                session(&config, self.seed, Arc::new(Unsupported), |mut c| async move {
                    match action {
                        FavoritesCommand::List => {
                            c.load_favorites();
                        }
                        FavoritesCommand::Toggle { label } => {
                            if let Some(outcome) = rendered(c.toggle_favorite(&label)) {
                                report_toggle(&label, Some(outcome));
                            }
                        }
                        FavoritesCommand::Remove { label } => {
                            if rendered(c.remove_favorite(&label)) == Some(false) {
                                println!("'{label}' is not a favorite.");
                            }
                        }
                        FavoritesCommand::Show { label } => {
                            rendered(c.search_favorite(&label).await);
                        }
                    }
                    Ok::<_, anyhow::Error>(())
                })
                .await
            }
        }
    }
}

type Controller = WeatherLookupController<FileStore, tokio::sync::mpsc::UnboundedSender<LookupEvent>>;

/// Build a controller, run `action` against it while a renderer prints events.
async fn session<F, Fut>(
    config: &Config,
    seed: Option<u64>,
    geolocation: Arc<dyn GeolocationProvider>,
    action: F,
) -> anyhow::Result<()>
where
    F: FnOnce(Controller) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<()>>,
{
    let mut providers = default_provider_from_config(config)?;
    if let Some(seed) = seed
        && config.default_provider_id()? == ProviderId::Mock
    {
        providers = ProviderPair {
            weather: Arc::new(MockWeatherProvider::seeded(seed)),
            ..providers
        };
    }

    let favorites_dir = config.favorites_dir()?;
    tracing::debug!(dir = %favorites_dir.display(), "Using favorites directory");
    let favorites = FavoritesStore::load(FileStore::new(favorites_dir));

    let (tx, rx) = unbounded_channel();
    let renderer = tokio::spawn(render(rx));

    let controller = WeatherLookupController::new(providers, geolocation, favorites, tx);
    // The controller owns the sender; the renderer stops once it is dropped.
    let result = action(controller).await;

    renderer.await.context("Renderer task failed")?;
    result
}

async fn render(mut rx: UnboundedReceiver<LookupEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            LookupEvent::LoadingStarted => println!("--°C  Loading..."),
            LookupEvent::WeatherDisplayed(sample) => print_sample(&sample),
            LookupEvent::RecommendationsReady(cards) => print_cards(&cards),
            LookupEvent::FavoritesChanged(labels) => print_favorites(&labels),
            LookupEvent::ErrorOccurred(message) => eprintln!("{message}"),
        }
    }
}

fn print_sample(sample: &WeatherSample) {
    println!();
    println!("{}°C", sample.temperature_c);
    println!("{} {}", condition_icon(&sample.condition), sample.condition);
    println!("  Humidity:   {}%", sample.humidity_pct);
    println!("  Wind Speed: {} km/h", sample.wind_speed_kmh);
    println!("  Location:   {}", sample.location_label);
}

fn print_cards(cards: &[RecommendationCard]) {
    if cards.is_empty() {
        return;
    }

    println!();
    println!("Recommendations");
    for card in cards {
        println!("  [{}] {}", card.category, card.title);
        println!("      {}", card.description);
    }
}

fn print_favorites(labels: &[String]) {
    println!();
    if labels.is_empty() {
        println!("No favorite locations yet.");
        return;
    }

    println!("Favorite locations");
    for label in labels {
        println!("  - {label}");
    }
}

/// Lookup failures reach the user through `ErrorOccurred`; only the value is kept.
fn rendered<T>(result: Result<T, LookupError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(error = %err, "Failure already rendered");
            None
        }
    }
}

fn report_toggle(label: &str, outcome: Option<Toggle>) {
    match outcome {
        Some(Toggle::Added) => println!("Added '{label}' to favorites."),
        Some(Toggle::Removed) => println!("Removed '{label}' from favorites."),
        None => {}
    }
}

fn configure(mut config: Config, provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    if id.requires_api_key() {
        let api_key = inquire::Password::new(&format!("API key for {id}:"))
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;

        if api_key.trim().is_empty() {
            anyhow::bail!("API key must not be empty");
        }
        config.upsert_provider_api_key(id, api_key.trim().to_string());
    }

    let current_default = config.default_provider_id()?;
    if current_default != id {
        let make_default = inquire::Confirm::new(&format!("Use {id} as the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;

        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
