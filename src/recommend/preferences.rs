use crate::catalog::HeatingMethod;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// User's experience level, normalized to the four levels the
/// compatibility matrix is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UsageFrequency {
    Rarely,
    Occasionally,
    Regularly,
    Daily,
    MultipleDaily,
}

/// How much the user cares about temperature control. The engine rule is
/// keyed on this tier, not on a literal control type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TempControlImportance {
    VeryImportant,
    SomewhatImportant,
    NotImportant,
}

/// One quiz dimension. The strum serialization doubles as the key in the
/// raw answer map, so mapping errors name the exact key that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
pub enum Dimension {
    #[strum(serialize = "mood")]
    Mood,
    #[strum(serialize = "context")]
    Context,
    #[strum(serialize = "experience")]
    Experience,
    #[strum(serialize = "frequency")]
    Frequency,
    #[strum(serialize = "budget")]
    Budget,
    #[strum(serialize = "heatingMethod")]
    HeatingMethod,
    #[strum(serialize = "tempControl")]
    TempControl,
    #[strum(serialize = "portability")]
    Portability,
    #[strum(serialize = "discreetness")]
    Discreetness,
    #[strum(serialize = "deliveryMethod")]
    DeliveryMethod,
}

impl Dimension {
    pub fn key(&self) -> &'static str {
        self.into()
    }
}

/// Structured preferences derived from one recommendation request.
///
/// Every field is optional: `None` / empty means "no constraint" and the
/// scoring engine skips the corresponding category entirely. The quiz
/// mapper fills documented defaults for budget and the importance scores,
/// so quiz-derived preferences always score those categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub moods: Vec<String>,
    pub contexts: Vec<String>,
    pub scenarios: Vec<String>,
    pub best_for: Vec<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub usage_frequency: Option<UsageFrequency>,
    pub heating_method_preference: Option<HeatingMethod>,
    pub temp_control_preference: Option<TempControlImportance>,
    /// 1-10 scales.
    pub portability_importance: Option<u8>,
    pub discreetness_importance: Option<u8>,
    pub min_budget: Option<f32>,
    pub max_budget: Option<f32>,
    pub delivery_methods: Vec<String>,
}

impl UserPreferences {
    /// True when no dimension carries a constraint, i.e. scoring any item
    /// against these preferences yields a 0% match.
    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
            && self.contexts.is_empty()
            && self.delivery_methods.is_empty()
            && self.experience_level.is_none()
            && self.heating_method_preference.is_none()
            && self.temp_control_preference.is_none()
            && self.portability_importance.is_none()
            && self.discreetness_importance.is_none()
            && (self.min_budget.is_none() || self.max_budget.is_none())
    }
}
