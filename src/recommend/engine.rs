use crate::catalog::{CatalogItem, TagRef};
use crate::recommend::matchers::{
    item_experience_levels, score_budget, score_categorical, score_experience,
    score_heating_method, score_importance_attribute, score_temp_control, MAX_SUB_SCORE,
};
use crate::recommend::preferences::UserPreferences;
use serde::Serialize;
use strum::Display;

// Canonical weight table: every category carries the same nominal weight
// on the common 0-10 sub-scale.
pub const WEIGHT_BUDGET: f32 = 10.0;
pub const WEIGHT_HEATING_METHOD: f32 = 10.0;
pub const WEIGHT_TEMP_CONTROL: f32 = 10.0;
pub const WEIGHT_DELIVERY_METHOD: f32 = 10.0;
pub const WEIGHT_MOOD: f32 = 10.0;
pub const WEIGHT_CONTEXT: f32 = 10.0;
pub const WEIGHT_EXPERIENCE: f32 = 10.0;
pub const WEIGHT_PORTABILITY: f32 = 10.0;
pub const WEIGHT_DISCREETNESS: f32 = 10.0;

/// Item attribute assumed when a portability/discreetness score is absent.
const NEUTRAL_ATTRIBUTE_SCORE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Category {
    #[strum(to_string = "Budget")]
    Budget,
    #[strum(to_string = "Heating Method")]
    HeatingMethod,
    #[strum(to_string = "Temperature Control")]
    TempControl,
    #[strum(to_string = "Delivery Method")]
    DeliveryMethod,
    #[strum(to_string = "Mood")]
    Mood,
    #[strum(to_string = "Context")]
    Context,
    #[strum(to_string = "Experience Level")]
    ExperienceLevel,
    #[strum(to_string = "Portability")]
    Portability,
    #[strum(to_string = "Discreetness")]
    Discreetness,
}

/// One scored category for one item, with a display-ready explanation.
#[derive(Debug, Clone, Serialize)]
pub struct MatchDetail {
    pub category: Category,
    pub score: f32,
    pub max_score: f32,
    pub details: String,
}

/// A catalog item with its total score, rounded match percentage and the
/// per-category breakdown. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    pub item: CatalogItem,
    pub score: f32,
    pub match_percentage: u8,
    pub match_details: Vec<MatchDetail>,
}

fn weighted(sub_score: f32, weight: f32) -> f32 {
    sub_score * weight / MAX_SUB_SCORE
}

fn join_tags(tags: &[TagRef]) -> String {
    if tags.is_empty() {
        return "none".to_string();
    }
    tags.iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn score_item(preferences: &UserPreferences, item: &CatalogItem) -> RecommendationResult {
    let mut details: Vec<MatchDetail> = Vec::new();

    if let (Some(min), Some(max)) = (preferences.min_budget, preferences.max_budget) {
        let sub = score_budget(min, max, item.price);
        let price = item
            .price
            .map(|p| format!("${p}"))
            .unwrap_or_else(|| "no price".to_string());
        details.push(MatchDetail {
            category: Category::Budget,
            score: weighted(sub, WEIGHT_BUDGET),
            max_score: WEIGHT_BUDGET,
            details: format!("{price} vs. ${min}-${max}"),
        });
    }

    if let Some(preference) = preferences.heating_method_preference {
        let sub = score_heating_method(preference, item.heating_method);
        let method = item
            .heating_method
            .map(|m| m.to_string())
            .unwrap_or_else(|| "none".to_string());
        details.push(MatchDetail {
            category: Category::HeatingMethod,
            score: weighted(sub, WEIGHT_HEATING_METHOD),
            max_score: WEIGHT_HEATING_METHOD,
            details: format!("{method} vs. {preference}"),
        });
    }

    if let Some(importance) = preferences.temp_control_preference {
        let sub = score_temp_control(importance, item.temp_control);
        let control = item
            .temp_control
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string());
        details.push(MatchDetail {
            category: Category::TempControl,
            score: weighted(sub, WEIGHT_TEMP_CONTROL),
            max_score: WEIGHT_TEMP_CONTROL,
            details: format!("{control} vs. {importance}"),
        });
    }

    if !preferences.delivery_methods.is_empty() {
        let sub = score_categorical(&preferences.delivery_methods, &item.delivery_methods);
        details.push(MatchDetail {
            category: Category::DeliveryMethod,
            score: weighted(sub, WEIGHT_DELIVERY_METHOD),
            max_score: WEIGHT_DELIVERY_METHOD,
            details: format!(
                "{} vs. {}",
                preferences.delivery_methods.join(", "),
                join_tags(&item.delivery_methods)
            ),
        });
    }

    if !preferences.moods.is_empty() {
        let sub = score_categorical(&preferences.moods, &item.moods);
        details.push(MatchDetail {
            category: Category::Mood,
            score: weighted(sub, WEIGHT_MOOD),
            max_score: WEIGHT_MOOD,
            details: format!(
                "{} vs. {}",
                preferences.moods.join(", "),
                join_tags(&item.moods)
            ),
        });
    }

    if !preferences.contexts.is_empty() {
        let sub = score_categorical(&preferences.contexts, &item.contexts);
        details.push(MatchDetail {
            category: Category::Context,
            score: weighted(sub, WEIGHT_CONTEXT),
            max_score: WEIGHT_CONTEXT,
            details: format!(
                "{} vs. {}",
                preferences.contexts.join(", "),
                join_tags(&item.contexts)
            ),
        });
    }

    if let Some(level) = preferences.experience_level {
        let sub = score_experience(level, &item.best_for);
        let item_levels = item_experience_levels(&item.best_for)
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        details.push(MatchDetail {
            category: Category::ExperienceLevel,
            score: weighted(sub, WEIGHT_EXPERIENCE),
            max_score: WEIGHT_EXPERIENCE,
            details: format!(
                "{level} vs. {item_levels} (compatibility: {:.1})",
                sub / MAX_SUB_SCORE
            ),
        });
    }

    if let Some(importance) = preferences.portability_importance {
        let attribute = item.portability_score.unwrap_or(NEUTRAL_ATTRIBUTE_SCORE);
        let sub = score_importance_attribute(importance, attribute);
        details.push(MatchDetail {
            category: Category::Portability,
            score: weighted(sub, WEIGHT_PORTABILITY),
            max_score: WEIGHT_PORTABILITY,
            details: format!("importance {importance}, item score {attribute}"),
        });
    }

    if let Some(importance) = preferences.discreetness_importance {
        let attribute = item.discreetness_score.unwrap_or(NEUTRAL_ATTRIBUTE_SCORE);
        let sub = score_importance_attribute(importance, attribute);
        details.push(MatchDetail {
            category: Category::Discreetness,
            score: weighted(sub, WEIGHT_DISCREETNESS),
            max_score: WEIGHT_DISCREETNESS,
            details: format!("importance {importance}, item score {attribute}"),
        });
    }

    let total: f32 = details.iter().map(|d| d.score).sum();
    let total_max: f32 = details.iter().map(|d| d.max_score).sum();

    // Categorical sums can exceed their nominal max, so the percentage is
    // clamped to the 0-100 contract.
    let match_percentage = if total_max > 0.0 {
        ((total / total_max * 100.0).round() as i64).clamp(0, 100) as u8
    } else {
        0
    };

    RecommendationResult {
        item: item.clone(),
        score: total,
        match_percentage,
        match_details: details,
    }
}

/// Scores every item against the preferences and returns the results
/// sorted descending by raw score. Absent preferences skip their
/// category; this function never fails on well-typed input.
pub fn score_items(
    preferences: &UserPreferences,
    items: &[CatalogItem],
) -> Vec<RecommendationResult> {
    let mut results: Vec<RecommendationResult> = items
        .iter()
        .map(|item| score_item(preferences, item))
        .collect();

    // Stable sort keeps input order on ties, so identical inputs always
    // produce identical rankings.
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_catalog, tag_refs, HeatingMethod, TempControl};
    use assert_approx_eq::assert_approx_eq;

    fn item(id: u32, name: &str) -> CatalogItem {
        CatalogItem {
            id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            manufacturer: None,
            price: None,
            heating_method: None,
            temp_control: None,
            portability_score: None,
            discreetness_score: None,
            moods: Vec::new(),
            contexts: Vec::new(),
            scenarios: Vec::new(),
            best_for: Vec::new(),
            delivery_methods: Vec::new(),
        }
    }

    fn detail(result: &RecommendationResult, category: Category) -> &MatchDetail {
        result
            .match_details
            .iter()
            .find(|d| d.category == category)
            .unwrap_or_else(|| panic!("no {category} detail"))
    }

    #[test]
    fn test_empty_preferences_score_zero() {
        let results = score_items(&UserPreferences::default(), &sample_catalog());
        for result in results {
            assert_approx_eq!(result.score, 0.0);
            assert_eq!(result.match_percentage, 0);
            assert!(result.match_details.is_empty());
        }
    }

    #[test]
    fn test_absent_preferences_skip_categories() {
        let prefs = UserPreferences {
            heating_method_preference: Some(HeatingMethod::Convection),
            ..Default::default()
        };
        let mut subject = item(1, "Test");
        subject.heating_method = Some(HeatingMethod::Convection);

        let results = score_items(&prefs, &[subject]);
        assert_eq!(results[0].match_details.len(), 1);
        assert_approx_eq!(results[0].score, 10.0);
        assert_eq!(results[0].match_percentage, 100);
    }

    #[test]
    fn test_mood_synonym_half_weight() {
        let prefs = UserPreferences {
            moods: vec!["relaxed".to_string()],
            ..Default::default()
        };

        let mut synonym = item(1, "Synonym");
        synonym.moods = tag_refs(&["calm"]);
        let mut direct = item(2, "Direct");
        direct.moods = tag_refs(&["relaxed"]);
        let mut miss = item(3, "Miss");
        miss.moods = tag_refs(&["energetic"]);

        let results = score_items(&prefs, &[synonym, direct, miss]);
        assert_eq!(results[0].item.name, "Direct");
        assert_approx_eq!(detail(&results[0], Category::Mood).score, 10.0);
        assert_eq!(results[1].item.name, "Synonym");
        assert_approx_eq!(detail(&results[1], Category::Mood).score, 5.0);
        assert_eq!(results[2].item.name, "Miss");
        assert_approx_eq!(detail(&results[2], Category::Mood).score, 0.0);
    }

    #[test]
    fn test_sorted_descending_by_raw_score() {
        let prefs = UserPreferences {
            moods: vec![
                "relaxed".to_string(),
                "focused".to_string(),
                "happy".to_string(),
            ],
            ..Default::default()
        };

        let mut one = item(1, "One");
        one.moods = tag_refs(&["relaxed"]);
        let mut three = item(2, "Three");
        three.moods = tag_refs(&["relaxed", "focused", "happy"]);
        let mut two = item(3, "Two");
        two.moods = tag_refs(&["relaxed", "focused"]);

        let results = score_items(&prefs, &[one, three, two]);
        let names: Vec<&str> = results.iter().map(|r| r.item.name.as_str()).collect();
        assert_eq!(names, vec!["Three", "Two", "One"]);
        assert_approx_eq!(results[0].score, 30.0);
        assert_approx_eq!(results[1].score, 20.0);
        assert_approx_eq!(results[2].score, 10.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let prefs = UserPreferences {
            moods: vec!["relaxed".to_string()],
            ..Default::default()
        };
        let mut first = item(1, "First");
        first.moods = tag_refs(&["relaxed"]);
        let mut second = item(2, "Second");
        second.moods = tag_refs(&["relaxed"]);

        let results = score_items(&prefs, &[first, second]);
        assert_eq!(results[0].item.name, "First");
        assert_eq!(results[1].item.name, "Second");
    }

    #[test]
    fn test_percentage_clamped_at_100() {
        let prefs = UserPreferences {
            moods: vec!["relaxed".to_string(), "focused".to_string()],
            ..Default::default()
        };
        let mut subject = item(1, "Overachiever");
        subject.moods = tag_refs(&["relaxed", "focused"]);

        let results = score_items(&prefs, &[subject]);
        // Two direct matches sum past the category's nominal max.
        assert_approx_eq!(results[0].score, 20.0);
        assert_eq!(results[0].match_percentage, 100);
    }

    #[test]
    fn test_hand_computed_scenario() {
        let prefs = UserPreferences {
            min_budget: Some(300.0),
            max_budget: Some(500.0),
            heating_method_preference: Some(HeatingMethod::Convection),
            portability_importance: Some(3),
            ..Default::default()
        };

        let mut portable = item(1, "Portable Hybrid");
        portable.price = Some(399.0);
        portable.heating_method = Some(HeatingMethod::Hybrid);
        portable.temp_control = Some(TempControl::Digital);
        portable.portability_score = Some(7.0);

        let mut desktop = item(2, "Desktop Convection");
        desktop.price = Some(699.0);
        desktop.heating_method = Some(HeatingMethod::Convection);
        desktop.temp_control = Some(TempControl::Digital);
        desktop.portability_score = Some(2.0);

        let results = score_items(&prefs, &[portable, desktop]);

        // Portable: budget 399 in range = 10; hybrid vs. convection = 5;
        // importance 3 with item 7 = (0.7*0.7 + 0.3) * 10 = 7.9.
        let top = &results[0];
        assert_eq!(top.item.name, "Portable Hybrid");
        assert_approx_eq!(detail(top, Category::Budget).score, 10.0);
        assert_approx_eq!(detail(top, Category::HeatingMethod).score, 5.0);
        assert_approx_eq!(detail(top, Category::Portability).score, 7.9);
        assert_approx_eq!(top.score, 22.9);
        assert_eq!(top.match_percentage, 76);

        // Desktop: 699 is past the 1.2x stretch of 500 = 0; exact
        // convection match = 10; importance 3 with item 2 = 4.4.
        let second = &results[1];
        assert_eq!(second.item.name, "Desktop Convection");
        assert_approx_eq!(detail(second, Category::Budget).score, 0.0);
        assert_approx_eq!(detail(second, Category::HeatingMethod).score, 10.0);
        assert_approx_eq!(detail(second, Category::Portability).score, 4.4);
        assert_approx_eq!(second.score, 14.4);
        assert_eq!(second.match_percentage, 48);
    }

    #[test]
    fn test_quiz_to_ranking_end_to_end() {
        use crate::recommend::mapper::map_answers_to_preferences;
        use std::collections::HashMap;

        let answers: HashMap<String, String> = [
            ("mood", "relaxed"),
            ("context", "at home"),
            ("experience", "some experience"),
            ("frequency", "daily"),
            ("budget", "$300-$500"),
            ("heatingMethod", "convection"),
            ("tempControl", "somewhat important"),
            ("deliveryMethod", "direct draw"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let prefs = map_answers_to_preferences(&answers).unwrap();
        let results = score_items(&prefs, &sample_catalog());

        assert_eq!(results.len(), 4);
        // Every category with a constraint shows up in the breakdown.
        assert_eq!(results[0].match_details.len(), 9);
        // Ranking is deterministic.
        let rerun = score_items(&prefs, &sample_catalog());
        let names: Vec<&str> = results.iter().map(|r| r.item.name.as_str()).collect();
        let rerun_names: Vec<&str> = rerun.iter().map(|r| r.item.name.as_str()).collect();
        assert_eq!(names, rerun_names);
    }
}
