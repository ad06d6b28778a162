pub mod engine;
pub mod mapper;
pub mod matchers;
pub mod preferences;

pub use engine::{score_items, Category, MatchDetail, RecommendationResult};
pub use mapper::{map_answer, map_answers_to_preferences, MappingError, MappingErrors};
pub use preferences::{
    Dimension, ExperienceLevel, TempControlImportance, UsageFrequency, UserPreferences,
};
