use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum::{Display, EnumString};
use thiserror::Error;

/// Heating technology of a device. Hybrid counts as a partial match for
/// either of the other two during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HeatingMethod {
    Conduction,
    Convection,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum TempControl {
    Digital,
    Analog,
}

/// One entry of a controlled vocabulary (mood, context, scenario, bestFor,
/// delivery method). Names are unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: u32,
    pub name: String,
}

impl TagRef {
    pub fn named(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// Converts a plain tag-name list into `TagRef`s with sequential ids,
/// the shape catalog collections are stored in.
pub fn tag_refs(names: &[&str]) -> Vec<TagRef> {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| TagRef::named(idx as u32 + 1, name))
        .collect()
}

/// A recommendable product. Scalar attributes plus the five multi-valued
/// tag collections the scoring engine matches against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub price: Option<f32>,
    #[serde(default)]
    pub heating_method: Option<HeatingMethod>,
    #[serde(default)]
    pub temp_control: Option<TempControl>,
    /// 0-10, higher is more portable.
    #[serde(default)]
    pub portability_score: Option<f32>,
    /// 0-10, higher is more discreet.
    #[serde(default)]
    pub discreetness_score: Option<f32>,
    #[serde(default)]
    pub moods: Vec<TagRef>,
    #[serde(default)]
    pub contexts: Vec<TagRef>,
    #[serde(default)]
    pub scenarios: Vec<TagRef>,
    #[serde(default)]
    pub best_for: Vec<TagRef>,
    #[serde(default)]
    pub delivery_methods: Vec<TagRef>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
}

/// Loads a catalog from a RON file containing a `Vec<CatalogItem>`.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogItem>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Built-in sample catalog so the binaries and tests work without a
/// catalog file.
pub fn sample_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem {
            id: 1,
            name: "Venty".to_string(),
            slug: "venty".to_string(),
            manufacturer: Some("Storz & Bickel".to_string()),
            price: Some(449.0),
            heating_method: Some(HeatingMethod::Hybrid),
            temp_control: Some(TempControl::Digital),
            portability_score: Some(7.0),
            discreetness_score: Some(6.0),
            moods: tag_refs(&["uplifting", "focused", "energetic", "creative"]),
            contexts: tag_refs(&["home", "outdoors", "at_home_office"]),
            scenarios: tag_refs(&["productivity_session", "hiking", "deep_work"]),
            best_for: tag_refs(&["heavy_user", "tech_savvy_users"]),
            delivery_methods: tag_refs(&["direct_draw"]),
        },
        CatalogItem {
            id: 2,
            name: "Mighty+".to_string(),
            slug: "mighty-plus".to_string(),
            manufacturer: Some("Storz & Bickel".to_string()),
            price: Some(399.0),
            heating_method: Some(HeatingMethod::Hybrid),
            temp_control: Some(TempControl::Digital),
            portability_score: Some(6.5),
            discreetness_score: Some(5.0),
            moods: tag_refs(&["calm", "peaceful", "soothed"]),
            contexts: tag_refs(&["home", "medical_relief", "bedtime"]),
            scenarios: tag_refs(&["evening_wind_down", "pain_relief", "stress_relief"]),
            best_for: tag_refs(&["medical_users", "reliability_seekers"]),
            delivery_methods: tag_refs(&["direct_draw"]),
        },
        CatalogItem {
            id: 3,
            name: "Volcano Hybrid".to_string(),
            slug: "volcano-hybrid".to_string(),
            manufacturer: Some("Storz & Bickel".to_string()),
            price: Some(699.0),
            heating_method: Some(HeatingMethod::Convection),
            temp_control: Some(TempControl::Digital),
            portability_score: Some(2.0),
            discreetness_score: Some(3.0),
            moods: tag_refs(&["relaxed", "social"]),
            contexts: tag_refs(&["home", "social_gathering"]),
            scenarios: tag_refs(&["party_sharing"]),
            best_for: tag_refs(&["heavy_user", "group_sessions"]),
            delivery_methods: tag_refs(&["balloon", "whip"]),
        },
        CatalogItem {
            id: 4,
            name: "Pax Plus".to_string(),
            slug: "pax-plus".to_string(),
            manufacturer: Some("Pax Labs".to_string()),
            price: Some(249.0),
            heating_method: Some(HeatingMethod::Conduction),
            temp_control: Some(TempControl::Digital),
            portability_score: Some(9.0),
            discreetness_score: Some(9.0),
            moods: tag_refs(&["relaxed", "happy"]),
            contexts: tag_refs(&["daily_use", "social_gathering"]),
            scenarios: tag_refs(&["on_the_go", "in_the_car"]),
            best_for: tag_refs(&["beginner_friendly", "microdosing"]),
            delivery_methods: tag_refs(&["direct_draw"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heating_method_parsing() {
        assert_eq!(
            "convection".parse::<HeatingMethod>().unwrap(),
            HeatingMethod::Convection
        );
        assert_eq!(
            "HYBRID".parse::<HeatingMethod>().unwrap(),
            HeatingMethod::Hybrid
        );
        assert!("combustion".parse::<HeatingMethod>().is_err());
    }

    #[test]
    fn test_sample_catalog_shape() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 4);

        for item in &catalog {
            assert!(item.price.unwrap() > 0.0);
            let names: Vec<&str> = item.moods.iter().map(|t| t.name.as_str()).collect();
            let mut deduped = names.clone();
            deduped.dedup();
            assert_eq!(names, deduped, "duplicate mood tag on {}", item.name);
        }
    }

    #[test]
    fn test_catalog_ron_round_trip() {
        let catalog = sample_catalog();
        let encoded = ron::to_string(&catalog).unwrap();
        let decoded: Vec<CatalogItem> = ron::from_str(&encoded).unwrap();
        assert_eq!(decoded, catalog);
    }
}
