use crate::catalog::{HeatingMethod, TagRef, TempControl};
use crate::recommend::preferences::{ExperienceLevel, TempControlImportance};

/// Every category sub-score lives on this common 0-10 scale before the
/// engine rescales it by the category weight.
pub const MAX_SUB_SCORE: f32 = 10.0;

/// Synonym table for categorical matching: canonical tag -> related terms.
/// A preference matching an item tag through this table earns half credit,
/// at most once per preference.
pub const SYNONYMS: &[(&str, &[&str])] = &[
    // Moods
    ("relaxed", &["calm", "peaceful", "soothed", "chill"]),
    ("energetic", &["uplifting", "active", "stimulating"]),
    ("creative", &["inspired", "artistic", "imaginative"]),
    ("focused", &["concentrated", "attentive", "alert"]),
    ("sleepy", &["sedated", "drowsy", "bedtime"]),
    ("euphoric", &["blissful", "ecstatic", "happy"]),
    // Contexts
    ("home", &["at_home", "at_home_office", "indoor", "daily_use"]),
    ("medical_relief", &["therapeutic", "medicinal", "treatment"]),
    ("social_gathering", &["party", "group_sessions", "social"]),
];

/// Compatibility of a user level (row) with an item level (column), in
/// `[beginner, intermediate, advanced, expert]` order. Deliberately
/// asymmetric: a beginner gets nothing from an expert device, while an
/// expert can still get some use out of a beginner one.
pub const EXPERIENCE_COMPATIBILITY: [[f32; 4]; 4] = [
    [1.0, 0.5, 0.2, 0.0],
    [0.7, 1.0, 0.7, 0.4],
    [0.4, 0.8, 1.0, 0.8],
    [0.2, 0.5, 0.9, 1.0],
];

/// bestFor tags that imply an experience level for the item.
pub const ITEM_TAG_LEVELS: &[(&str, ExperienceLevel)] = &[
    ("beginner_friendly", ExperienceLevel::Beginner),
    ("heavy_user", ExperienceLevel::Advanced),
    ("expert_friendly", ExperienceLevel::Expert),
    ("tech_savvy_users", ExperienceLevel::Advanced),
];

/// bestFor tags a user of a given level gravitates towards. Experts have
/// no tag set; only the matrix speaks for them.
pub const EXPERIENCE_TAGS: &[(ExperienceLevel, &[&str])] = &[
    (
        ExperienceLevel::Beginner,
        &["beginner_friendly", "easy_to_use"],
    ),
    (ExperienceLevel::Intermediate, &["versatile", "balanced"]),
    (
        ExperienceLevel::Advanced,
        &["heavy_user", "enthusiast", "customizable"],
    ),
];

fn level_index(level: ExperienceLevel) -> usize {
    match level {
        ExperienceLevel::Beginner => 0,
        ExperienceLevel::Intermediate => 1,
        ExperienceLevel::Advanced => 2,
        ExperienceLevel::Expert => 3,
    }
}

pub fn experience_compatibility(user: ExperienceLevel, item: ExperienceLevel) -> f32 {
    EXPERIENCE_COMPATIBILITY[level_index(user)][level_index(item)]
}

/// Budget sub-score: full inside `[min, max]`, half inside the stretched
/// band `[min * 0.8, max * 1.2]`, zero otherwise or without a price.
pub fn score_budget(min_budget: f32, max_budget: f32, price: Option<f32>) -> f32 {
    let price = match price {
        Some(p) if p > 0.0 => p,
        _ => return 0.0,
    };

    if price >= min_budget && price <= max_budget {
        return MAX_SUB_SCORE;
    }

    if price >= min_budget * 0.8 && price <= max_budget * 1.2 {
        return MAX_SUB_SCORE / 2.0;
    }

    0.0
}

/// True when the two tags are related through the synonym table: one is
/// the canonical entry for the other, or both appear in the same related
/// list.
pub fn synonyms_related(a: &str, b: &str) -> bool {
    SYNONYMS.iter().any(|(canonical, related)| {
        let a_in = *canonical == a || related.contains(&a);
        let b_in = *canonical == b || related.contains(&b);
        a_in && b_in
    })
}

/// Categorical set-overlap: full credit per direct case-insensitive match,
/// half credit for at most one synonym hit per preference tag. Scores are
/// summed across preference tags, so a multi-tag preference can exceed
/// the nominal per-match weight.
pub fn score_categorical(preferences: &[String], item_tags: &[TagRef]) -> f32 {
    if preferences.is_empty() {
        return 0.0;
    }

    let item_terms: Vec<String> = item_tags.iter().map(|t| t.name.to_lowercase()).collect();

    let mut score = 0.0;
    for pref in preferences {
        let pref_lower = pref.to_lowercase();

        if item_terms.iter().any(|t| *t == pref_lower) {
            score += MAX_SUB_SCORE;
            continue;
        }

        if item_terms
            .iter()
            .any(|t| synonyms_related(&pref_lower, t))
        {
            score += MAX_SUB_SCORE / 2.0;
        }
    }

    score
}

/// Heating method sub-score: exact match is full, a hybrid item is half a
/// match for a conduction or convection preference.
pub fn score_heating_method(
    preference: HeatingMethod,
    item_method: Option<HeatingMethod>,
) -> f32 {
    let Some(method) = item_method else {
        return 0.0;
    };

    if method == preference {
        return MAX_SUB_SCORE;
    }

    if method == HeatingMethod::Hybrid
        && matches!(
            preference,
            HeatingMethod::Conduction | HeatingMethod::Convection
        )
    {
        return MAX_SUB_SCORE / 2.0;
    }

    0.0
}

/// Temperature control sub-score, keyed on how much the user cares.
pub fn score_temp_control(
    importance: TempControlImportance,
    item_control: Option<TempControl>,
) -> f32 {
    match importance {
        TempControlImportance::VeryImportant => match item_control {
            Some(TempControl::Digital) => MAX_SUB_SCORE,
            Some(TempControl::Analog) => MAX_SUB_SCORE / 2.0,
            None => 0.0,
        },
        TempControlImportance::SomewhatImportant => match item_control {
            Some(_) => 0.7 * MAX_SUB_SCORE,
            None => 0.3 * MAX_SUB_SCORE,
        },
        // Neutral: any device is fine.
        TempControlImportance::NotImportant => MAX_SUB_SCORE,
    }
}

/// Importance-weighted proximity for portability/discreetness. Importance
/// comes in on a 1-10 scale and is normalized to 1-5. Low importance
/// means every item gets full marks; high importance scores the item's
/// own attribute; the middle tier gives 30% for free.
pub fn score_importance_attribute(importance: u8, item_score: f32) -> f32 {
    let normalized = if importance > 5 {
        importance as f32 / 2.0
    } else {
        importance as f32
    };

    if normalized <= 2.0 {
        return MAX_SUB_SCORE;
    }

    if normalized >= 4.0 {
        return (item_score / 10.0) * MAX_SUB_SCORE;
    }

    ((item_score / 10.0) * 0.7 + 0.3) * MAX_SUB_SCORE
}

/// Experience levels an item serves, derived from its bestFor tags. An
/// item whose tags say nothing about experience counts as intermediate.
pub fn item_experience_levels(best_for: &[TagRef]) -> Vec<ExperienceLevel> {
    let levels: Vec<ExperienceLevel> = best_for
        .iter()
        .filter_map(|tag| {
            ITEM_TAG_LEVELS
                .iter()
                .find(|(name, _)| tag.name.eq_ignore_ascii_case(name))
                .map(|(_, level)| *level)
        })
        .collect();

    if levels.is_empty() {
        vec![ExperienceLevel::Intermediate]
    } else {
        levels
    }
}

fn experience_tag_names(level: ExperienceLevel) -> Vec<String> {
    EXPERIENCE_TAGS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, tags)| tags.iter().map(|t| t.to_string()).collect())
        .unwrap_or_default()
}

/// Experience sub-score: the better of a bestFor tag overlap and the
/// compatibility matrix across all of the item's derived levels.
pub fn score_experience(user_level: ExperienceLevel, best_for: &[TagRef]) -> f32 {
    let tag_score = score_categorical(&experience_tag_names(user_level), best_for);

    let matrix_score = item_experience_levels(best_for)
        .iter()
        .map(|item_level| experience_compatibility(user_level, *item_level))
        .fold(0.0_f32, f32::max)
        * MAX_SUB_SCORE;

    tag_score.max(matrix_score)
}
