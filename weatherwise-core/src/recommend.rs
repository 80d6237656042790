//! Advisory cards derived from a single weather sample.
//!
//! Rules are grouped by category. Inside a group the first matching rule
//! wins; groups are evaluated independently. Health has two groups: one for
//! humidity and one for extreme heat, so both can appear together.

use serde::{Deserialize, Serialize};

use crate::model::WeatherSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Activity,
    Health,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothing => "clothing",
            Category::Activity => "activity",
            Category::Health => "health",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of each rule, independent of the prose shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    WarmClothing,
    LightJacket,
    LightClothing,
    IndoorActivities,
    OutdoorFun,
    WinterSports,
    StayHydrated,
    Moisturize,
    HeatSafety,
}

impl RuleId {
    pub fn category(&self) -> Category {
        match self {
            RuleId::WarmClothing | RuleId::LightJacket | RuleId::LightClothing => {
                Category::Clothing
            }
            RuleId::IndoorActivities | RuleId::OutdoorFun | RuleId::WinterSports => {
                Category::Activity
            }
            RuleId::StayHydrated | RuleId::Moisturize | RuleId::HeatSafety => Category::Health,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RuleId::WarmClothing => "🧥 Warm Clothing",
            RuleId::LightJacket => "🧢 Light Jacket",
            RuleId::LightClothing => "👕 Light Clothing",
            RuleId::IndoorActivities => "🏠 Indoor Activities",
            RuleId::OutdoorFun => "🚴 Outdoor Fun",
            RuleId::WinterSports => "⛄ Winter Sports",
            RuleId::StayHydrated => "💧 Stay Hydrated",
            RuleId::Moisturize => "🧴 Moisturize",
            RuleId::HeatSafety => "🌡️ Heat Safety",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RuleId::WarmClothing => {
                "It's quite cold! Wear a heavy coat, scarf, and gloves. Layer up to stay warm."
            }
            RuleId::LightJacket => {
                "Cool weather ahead. A light jacket or sweater would be perfect."
            }
            RuleId::LightClothing => {
                "Hot weather! Wear light, breathable clothing and don't forget sunscreen."
            }
            RuleId::IndoorActivities => {
                "Rainy weather is perfect for indoor activities. Try a museum visit or cozy up with a book."
            }
            RuleId::OutdoorFun => {
                "Perfect weather for outdoor activities! Great time for cycling, hiking, or a picnic."
            }
            RuleId::WinterSports => {
                "Snowy conditions! Perfect for skiing, snowboarding, or building snowmen."
            }
            RuleId::StayHydrated => {
                "High humidity levels. Drink plenty of water and take breaks in air-conditioned spaces."
            }
            RuleId::Moisturize => {
                "Low humidity can dry out your skin. Use moisturizer and drink extra water."
            }
            RuleId::HeatSafety => {
                "Very hot weather! Avoid prolonged sun exposure and stay in shaded or cool areas."
            }
        }
    }

    pub fn card(self) -> RecommendationCard {
        RecommendationCard {
            rule: self,
            category: self.category(),
            title: self.title().to_string(),
            description: self.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCard {
    pub rule: RuleId,
    pub category: Category,
    pub title: String,
    pub description: String,
}

fn clothing(temp: i32) -> Option<RuleId> {
    if temp < 5 {
        Some(RuleId::WarmClothing)
    } else if temp < 15 {
        Some(RuleId::LightJacket)
    } else if temp > 25 {
        Some(RuleId::LightClothing)
    } else {
        None
    }
}

fn activity(condition: &str, temp: i32) -> Option<RuleId> {
    if condition.contains("rain") || condition.contains("storm") {
        Some(RuleId::IndoorActivities)
    } else if condition.contains("sunny") && temp > 15 && temp < 30 {
        Some(RuleId::OutdoorFun)
    } else if condition.contains("snow") {
        Some(RuleId::WinterSports)
    } else {
        None
    }
}

fn humidity(humidity_pct: u8) -> Option<RuleId> {
    if humidity_pct > 70 {
        Some(RuleId::StayHydrated)
    } else if humidity_pct < 30 {
        Some(RuleId::Moisturize)
    } else {
        None
    }
}

fn heat(temp: i32) -> Option<RuleId> {
    (temp > 30).then_some(RuleId::HeatSafety)
}

/// Rule ids that apply to `sample`, in display order.
pub fn matching_rules(sample: &WeatherSample) -> Vec<RuleId> {
    let temp = sample.temperature_c;
    let condition = sample.condition.to_lowercase();

    [
        clothing(temp),
        activity(&condition, temp),
        humidity(sample.humidity_pct),
        heat(temp),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Build the ordered advisory cards for `sample`.
pub fn derive_recommendations(sample: &WeatherSample) -> Vec<RecommendationCard> {
    matching_rules(sample).into_iter().map(RuleId::card).collect()
}
