use crate::catalog::HeatingMethod;
use crate::recommend::preferences::{
    Dimension, ExperienceLevel, TempControlImportance, UsageFrequency, UserPreferences,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use strum::IntoEnumIterator;
use thiserror::Error;

/// Defaults applied when a dimension was skipped entirely.
pub const DEFAULT_MIN_BUDGET: f32 = 0.0;
pub const DEFAULT_MAX_BUDGET: f32 = 1000.0;
pub const DEFAULT_IMPORTANCE: u8 = 5;

/// Sentinel upper bound for open-ended budget answers.
pub const BUDGET_SENTINEL: f32 = f32::MAX;

/// Partial preferences produced by one dimension's rule table. `None`
/// means the rule says nothing about that field; merging later fragments
/// overwrites earlier explicit keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceFragment {
    pub moods: Option<Vec<&'static str>>,
    pub contexts: Option<Vec<&'static str>>,
    pub scenarios: Option<Vec<&'static str>>,
    pub best_for: Option<Vec<&'static str>>,
    pub delivery_methods: Option<Vec<&'static str>>,
    pub experience_level: Option<ExperienceLevel>,
    pub usage_frequency: Option<UsageFrequency>,
    pub heating_method_preference: Option<HeatingMethod>,
    pub temp_control_preference: Option<TempControlImportance>,
    pub portability_importance: Option<u8>,
    pub discreetness_importance: Option<u8>,
    pub min_budget: Option<f32>,
    pub max_budget: Option<f32>,
}

/// An answer string with no entry in its dimension's rule table. This is
/// a contract violation between the quiz UI and the mapping tables, so it
/// fails loudly instead of defaulting.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unknown {dimension} answer: {answer:?}")]
pub struct MappingError {
    pub dimension: Dimension,
    pub answer: String,
}

/// Every mapping failure from one request, aggregated so the caller gets
/// the full list of corrective messages in a single round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingErrors(pub Vec<MappingError>);

impl fmt::Display for MappingErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to map {} quiz answer(s): ", self.0.len())?;
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for MappingErrors {}

type RuleTable = HashMap<&'static str, PreferenceFragment>;

static MOOD_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    [
        "relaxed",
        "energetic",
        "creative",
        "focused",
        "sleepy",
        "euphoric",
        "happy",
    ]
    .into_iter()
    .map(|mood| {
        (
            mood,
            PreferenceFragment {
                moods: Some(vec![mood]),
                ..Default::default()
            },
        )
    })
    .collect()
});

static CONTEXT_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    HashMap::from([
        (
            "at home",
            PreferenceFragment {
                contexts: Some(vec!["home"]),
                portability_importance: Some(3),
                ..Default::default()
            },
        ),
        (
            "on the go",
            PreferenceFragment {
                scenarios: Some(vec!["on_the_go"]),
                portability_importance: Some(9),
                discreetness_importance: Some(8),
                ..Default::default()
            },
        ),
        (
            "social gatherings",
            PreferenceFragment {
                contexts: Some(vec!["social_gathering"]),
                best_for: Some(vec!["group_sessions"]),
                ..Default::default()
            },
        ),
        (
            "medical relief",
            PreferenceFragment {
                contexts: Some(vec!["medical_relief"]),
                temp_control_preference: Some(TempControlImportance::VeryImportant),
                ..Default::default()
            },
        ),
        (
            "outdoor activities",
            PreferenceFragment {
                scenarios: Some(vec!["outdoor_activity"]),
                portability_importance: Some(8),
                ..Default::default()
            },
        ),
        (
            "in a vehicle",
            PreferenceFragment {
                scenarios: Some(vec!["in_the_car"]),
                discreetness_importance: Some(9),
                ..Default::default()
            },
        ),
    ])
});

static EXPERIENCE_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    HashMap::from([
        (
            "complete beginner",
            PreferenceFragment {
                experience_level: Some(ExperienceLevel::Beginner),
                best_for: Some(vec!["beginner_friendly"]),
                ..Default::default()
            },
        ),
        (
            "some experience",
            PreferenceFragment {
                experience_level: Some(ExperienceLevel::Intermediate),
                ..Default::default()
            },
        ),
        (
            "experienced user",
            PreferenceFragment {
                experience_level: Some(ExperienceLevel::Advanced),
                best_for: Some(vec!["heavy_user"]),
                ..Default::default()
            },
        ),
        (
            "expert/enthusiast",
            PreferenceFragment {
                experience_level: Some(ExperienceLevel::Expert),
                ..Default::default()
            },
        ),
    ])
});

static FREQUENCY_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    HashMap::from([
        (
            "rarely (special occasions)",
            PreferenceFragment {
                usage_frequency: Some(UsageFrequency::Rarely),
                contexts: Some(vec!["special_occasion"]),
                ..Default::default()
            },
        ),
        (
            "occasionally (few times a month)",
            PreferenceFragment {
                usage_frequency: Some(UsageFrequency::Occasionally),
                ..Default::default()
            },
        ),
        (
            "regularly (few times a week)",
            PreferenceFragment {
                usage_frequency: Some(UsageFrequency::Regularly),
                best_for: Some(vec!["daily_use"]),
                ..Default::default()
            },
        ),
        (
            "daily",
            PreferenceFragment {
                usage_frequency: Some(UsageFrequency::Daily),
                best_for: Some(vec!["heavy_user"]),
                ..Default::default()
            },
        ),
        (
            "multiple times daily",
            PreferenceFragment {
                usage_frequency: Some(UsageFrequency::MultipleDaily),
                best_for: Some(vec!["heavy_user"]),
                ..Default::default()
            },
        ),
    ])
});

static BUDGET_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    let range = |min: f32, max: f32| PreferenceFragment {
        min_budget: Some(min),
        max_budget: Some(max),
        ..Default::default()
    };
    HashMap::from([
        ("under $100", range(0.0, 99.99)),
        ("$100-$200", range(100.0, 199.99)),
        ("$200-$300", range(200.0, 299.99)),
        ("$300-$500", range(300.0, 499.99)),
        ("$500+", range(500.0, BUDGET_SENTINEL)),
    ])
});

static HEATING_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    let method = |m: HeatingMethod| PreferenceFragment {
        heating_method_preference: Some(m),
        ..Default::default()
    };
    HashMap::from([
        ("conduction", method(HeatingMethod::Conduction)),
        ("convection", method(HeatingMethod::Convection)),
        ("hybrid", method(HeatingMethod::Hybrid)),
        // Valid answers that impose no constraint.
        ("no preference", PreferenceFragment::default()),
        ("i don't know", PreferenceFragment::default()),
    ])
});

static TEMP_CONTROL_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    let tier = |t: TempControlImportance| PreferenceFragment {
        temp_control_preference: Some(t),
        ..Default::default()
    };
    HashMap::from([
        ("very important", tier(TempControlImportance::VeryImportant)),
        (
            "somewhat important",
            tier(TempControlImportance::SomewhatImportant),
        ),
        ("not important", tier(TempControlImportance::NotImportant)),
    ])
});

static PORTABILITY_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    let importance = |score: u8| PreferenceFragment {
        portability_importance: Some(score),
        ..Default::default()
    };
    HashMap::from([
        ("very important", importance(9)),
        ("somewhat important", importance(6)),
        ("not important", importance(3)),
    ])
});

static DISCREETNESS_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    let importance = |score: u8| PreferenceFragment {
        discreetness_importance: Some(score),
        ..Default::default()
    };
    HashMap::from([
        ("very important", importance(9)),
        ("somewhat important", importance(6)),
        ("not important", importance(3)),
    ])
});

static DELIVERY_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    let methods = |tags: Vec<&'static str>| PreferenceFragment {
        delivery_methods: Some(tags),
        ..Default::default()
    };
    HashMap::from([
        ("direct draw", methods(vec!["direct_draw"])),
        ("through water", methods(vec!["water_pipe_compatible"])),
        ("balloon/bag", methods(vec!["balloon"])),
        ("whip/tube", methods(vec!["whip"])),
    ])
});

fn rules_for(dimension: Dimension) -> &'static RuleTable {
    match dimension {
        Dimension::Mood => &MOOD_RULES,
        Dimension::Context => &CONTEXT_RULES,
        Dimension::Experience => &EXPERIENCE_RULES,
        Dimension::Frequency => &FREQUENCY_RULES,
        Dimension::Budget => &BUDGET_RULES,
        Dimension::HeatingMethod => &HEATING_RULES,
        Dimension::TempControl => &TEMP_CONTROL_RULES,
        Dimension::Portability => &PORTABILITY_RULES,
        Dimension::Discreetness => &DISCREETNESS_RULES,
        Dimension::DeliveryMethod => &DELIVERY_RULES,
    }
}

/// Maps one dimension's answer through its rule table. Unknown answers
/// are a hard failure; recognition is a plain membership test.
pub fn map_answer(dimension: Dimension, answer: &str) -> Result<PreferenceFragment, MappingError> {
    let normalized = answer.trim().to_lowercase();
    rules_for(dimension)
        .get(normalized.as_str())
        .cloned()
        .ok_or_else(|| MappingError {
            dimension,
            answer: answer.to_string(),
        })
}

fn to_strings(tags: &[&'static str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

fn apply_fragment(prefs: &mut UserPreferences, fragment: &PreferenceFragment) {
    if let Some(ref moods) = fragment.moods {
        prefs.moods = to_strings(moods);
    }
    if let Some(ref contexts) = fragment.contexts {
        prefs.contexts = to_strings(contexts);
    }
    if let Some(ref scenarios) = fragment.scenarios {
        prefs.scenarios = to_strings(scenarios);
    }
    if let Some(ref best_for) = fragment.best_for {
        prefs.best_for = to_strings(best_for);
    }
    if let Some(ref delivery) = fragment.delivery_methods {
        prefs.delivery_methods = to_strings(delivery);
    }
    if let Some(level) = fragment.experience_level {
        prefs.experience_level = Some(level);
    }
    if let Some(frequency) = fragment.usage_frequency {
        prefs.usage_frequency = Some(frequency);
    }
    if let Some(method) = fragment.heating_method_preference {
        prefs.heating_method_preference = Some(method);
    }
    if let Some(tier) = fragment.temp_control_preference {
        prefs.temp_control_preference = Some(tier);
    }
    if let Some(importance) = fragment.portability_importance {
        prefs.portability_importance = Some(importance);
    }
    if let Some(importance) = fragment.discreetness_importance {
        prefs.discreetness_importance = Some(importance);
    }
    if let Some(min) = fragment.min_budget {
        prefs.min_budget = Some(min);
    }
    if let Some(max) = fragment.max_budget {
        prefs.max_budget = Some(max);
    }
}

/// Maps a raw `{dimension key: answer}` map to structured preferences.
///
/// Every dimension is mapped; all failures are collected and returned
/// together. Dimensions that are missing or blank are skipped, and the
/// documented defaults (budget 0..1000, importance 5) are applied after
/// the merge. Deterministic: same answers, same preferences.
pub fn map_answers_to_preferences(
    answers: &HashMap<String, String>,
) -> Result<UserPreferences, MappingErrors> {
    let mut prefs = UserPreferences::default();
    let mut errors = Vec::new();

    for dimension in Dimension::iter() {
        let Some(answer) = answers.get(dimension.key()) else {
            continue;
        };
        if answer.trim().is_empty() {
            continue;
        }

        match map_answer(dimension, answer) {
            Ok(fragment) => apply_fragment(&mut prefs, &fragment),
            Err(error) => errors.push(error),
        }
    }

    if !errors.is_empty() {
        return Err(MappingErrors(errors));
    }

    prefs.min_budget.get_or_insert(DEFAULT_MIN_BUDGET);
    prefs.max_budget.get_or_insert(DEFAULT_MAX_BUDGET);
    prefs.portability_importance.get_or_insert(DEFAULT_IMPORTANCE);
    prefs.discreetness_importance.get_or_insert(DEFAULT_IMPORTANCE);

    Ok(prefs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_mood_mapping() {
        let fragment = map_answer(Dimension::Mood, "Relaxed").unwrap();
        assert_eq!(fragment.moods, Some(vec!["relaxed"]));

        let err = map_answer(Dimension::Mood, "bored").unwrap_err();
        assert_eq!(err.dimension, Dimension::Mood);
        assert_eq!(err.answer, "bored");
    }

    #[test]
    fn test_context_side_effects() {
        let on_the_go = map_answer(Dimension::Context, "on the go").unwrap();
        assert_eq!(on_the_go.scenarios, Some(vec!["on_the_go"]));
        assert_eq!(on_the_go.portability_importance, Some(9));
        assert_eq!(on_the_go.discreetness_importance, Some(8));

        let medical = map_answer(Dimension::Context, "medical relief").unwrap();
        assert_eq!(medical.contexts, Some(vec!["medical_relief"]));
        assert_eq!(
            medical.temp_control_preference,
            Some(TempControlImportance::VeryImportant)
        );

        let at_home = map_answer(Dimension::Context, "at home").unwrap();
        assert_eq!(at_home.portability_importance, Some(3));
    }

    #[test]
    fn test_budget_ranges() {
        let mid = map_answer(Dimension::Budget, "$300-$500").unwrap();
        assert_eq!(mid.min_budget, Some(300.0));
        assert_eq!(mid.max_budget, Some(499.99));

        let open = map_answer(Dimension::Budget, "$500+").unwrap();
        assert_eq!(open.min_budget, Some(500.0));
        assert_eq!(open.max_budget, Some(BUDGET_SENTINEL));
    }

    #[test]
    fn test_heating_no_preference_is_valid() {
        let fragment = map_answer(Dimension::HeatingMethod, "no preference").unwrap();
        assert_eq!(fragment, PreferenceFragment::default());

        let fragment = map_answer(Dimension::HeatingMethod, "i don't know").unwrap();
        assert_eq!(fragment.heating_method_preference, None);
    }

    #[test]
    fn test_experience_normalization() {
        let experienced = map_answer(Dimension::Experience, "experienced user").unwrap();
        assert_eq!(
            experienced.experience_level,
            Some(ExperienceLevel::Advanced)
        );
        assert_eq!(experienced.best_for, Some(vec!["heavy_user"]));

        let expert = map_answer(Dimension::Experience, "expert/enthusiast").unwrap();
        assert_eq!(expert.experience_level, Some(ExperienceLevel::Expert));
    }

    #[test]
    fn test_full_mapping() {
        let prefs = map_answers_to_preferences(&answers(&[
            ("mood", "relaxed"),
            ("context", "at home"),
            ("experience", "some experience"),
            ("frequency", "daily"),
            ("budget", "$300-$500"),
            ("heatingMethod", "convection"),
            ("tempControl", "somewhat important"),
            ("portability", "somewhat important"),
            ("discreetness", "somewhat important"),
            ("deliveryMethod", "direct draw"),
        ]))
        .unwrap();

        assert_eq!(prefs.moods, vec!["relaxed"]);
        assert_eq!(prefs.contexts, vec!["home"]);
        assert_eq!(prefs.experience_level, Some(ExperienceLevel::Intermediate));
        assert_eq!(prefs.usage_frequency, Some(UsageFrequency::Daily));
        assert_eq!(prefs.min_budget, Some(300.0));
        assert_eq!(prefs.max_budget, Some(499.99));
        assert_eq!(
            prefs.heating_method_preference,
            Some(HeatingMethod::Convection)
        );
        assert_eq!(
            prefs.temp_control_preference,
            Some(TempControlImportance::SomewhatImportant)
        );
        // The portability dimension comes after the context dimension, so
        // its explicit answer overrides the "at home" side effect.
        assert_eq!(prefs.portability_importance, Some(6));
        assert_eq!(prefs.discreetness_importance, Some(6));
        assert_eq!(prefs.delivery_methods, vec!["direct_draw"]);
        // "daily" overwrites the best_for key the experience fragment
        // left untouched.
        assert_eq!(prefs.best_for, vec!["heavy_user"]);
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let input = answers(&[("mood", "creative"), ("context", "outdoor activities")]);
        let first = map_answers_to_preferences(&input).unwrap();
        let second = map_answers_to_preferences(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_skipped_dimensions_get_defaults() {
        let prefs = map_answers_to_preferences(&answers(&[("mood", "sleepy")])).unwrap();

        assert_eq!(prefs.moods, vec!["sleepy"]);
        assert_eq!(prefs.min_budget, Some(DEFAULT_MIN_BUDGET));
        assert_eq!(prefs.max_budget, Some(DEFAULT_MAX_BUDGET));
        assert_eq!(prefs.portability_importance, Some(DEFAULT_IMPORTANCE));
        assert_eq!(prefs.discreetness_importance, Some(DEFAULT_IMPORTANCE));
        assert_eq!(prefs.experience_level, None);
        assert_eq!(prefs.heating_method_preference, None);
    }

    #[test]
    fn test_blank_answers_count_as_skipped() {
        let prefs =
            map_answers_to_preferences(&answers(&[("mood", "  "), ("context", "")])).unwrap();
        assert!(prefs.moods.is_empty());
        assert!(prefs.contexts.is_empty());
    }

    #[test]
    fn test_context_side_effect_survives_skipped_importance() {
        let prefs = map_answers_to_preferences(&answers(&[("context", "at home")])).unwrap();
        // Context set portability to 3; the default must not clobber it.
        assert_eq!(prefs.portability_importance, Some(3));
        assert_eq!(prefs.discreetness_importance, Some(DEFAULT_IMPORTANCE));
    }

    #[test]
    fn test_all_failures_reported_together() {
        let err = map_answers_to_preferences(&answers(&[
            ("mood", "bored"),
            ("context", "underwater"),
            ("budget", "$300-$500"),
            ("deliveryMethod", "osmosis"),
        ]))
        .unwrap_err();

        assert_eq!(err.0.len(), 3);
        let dimensions: Vec<Dimension> = err.0.iter().map(|e| e.dimension).collect();
        assert!(dimensions.contains(&Dimension::Mood));
        assert!(dimensions.contains(&Dimension::Context));
        assert!(dimensions.contains(&Dimension::DeliveryMethod));

        let message = err.to_string();
        assert!(message.contains("mood"));
        assert!(message.contains("\"underwater\""));
    }
}
