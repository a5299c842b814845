//! Per-category genetic tables as they appear in the data files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::addons::AddonDef;
use crate::error::{BreedError, Result};

/// Roll chances for an aspect carried by one parent vs. both parents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InheritChance {
    pub single: f64,
    pub double: f64,
}

impl InheritChance {
    pub fn pick(&self, in_both_parents: bool) -> f64 {
        if in_both_parents { self.double } else { self.single }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenderData {
    pub base_chance: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FurTable {
    pub default: String,
    pub rare_options: Vec<String>,
    pub rare_chance: f64,
    pub inherit_chance: InheritChance,
}

/// One coat or build, with the chance that the mother's value wins
/// when it is paired with a father of this value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineageEntry {
    #[serde(default)]
    pub name: Option<String>,
    /// Keyed by the mother's value. `null` means the pairing is impossible.
    #[serde(default)]
    pub inherit_chance: BTreeMap<String, Option<f64>>,
}

/// Coats and builds share this shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineageTable {
    pub default: String,
    pub available: BTreeMap<String, LineageEntry>,
    /// Cumulative thresholds used by random generation.
    #[serde(default)]
    pub random_chance: BTreeMap<String, f64>,
}

impl LineageTable {
    /// Mother's chance of passing on her value, looked up from the father's entry.
    pub fn inherit_chance(&self, father: &str, mother: &str) -> Option<f64> {
        self.available
            .get(father)
            .and_then(|entry| entry.inherit_chance.get(mother))
            .copied()
            .flatten()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualityData {
    pub inherit_chance: InheritChance,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AspectEntry {
    pub quality: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Traits, markings and titan traits: options tagged with a quality tier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AspectTable {
    #[serde(default)]
    pub default: Vec<String>,
    pub qualities: BTreeMap<String, QualityData>,
    pub available: BTreeMap<String, AspectEntry>,
    #[serde(default)]
    pub exclusive_groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub random_cap: u32,
}

impl AspectTable {
    pub fn quality_of(&self, category: &'static str, id: &str) -> Result<&str> {
        self.available
            .get(id)
            .map(|entry| entry.quality.as_str())
            .ok_or_else(|| BreedError::missing_config(category, id))
    }

    /// Inherit chance for `id` based on its quality tier.
    pub fn inherit_chance(&self, category: &'static str, id: &str, in_both_parents: bool) -> Result<f64> {
        let quality = self.quality_of(category, id)?;
        self.qualities
            .get(quality)
            .map(|q| q.inherit_chance.pick(in_both_parents))
            .ok_or_else(|| BreedError::missing_config(category, format!("quality {}", quality)))
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.available.get(id).and_then(|entry| entry.name.as_deref())
    }

    /// Options whose quality tier is `quality`.
    pub fn with_quality<'a>(&'a self, quality: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.available
            .iter()
            .filter(move |(_, entry)| entry.quality == quality)
            .map(|(id, _)| id.as_str())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MutationEntry {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MutationTable {
    #[serde(default)]
    pub default: Vec<String>,
    pub available: BTreeMap<String, MutationEntry>,
    pub inherit_chance: InheritChance,
    /// Chance of a spontaneous mutation, and the per-unit gate for random generation.
    pub base_chance: f64,
    #[serde(default)]
    pub exclusive_groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub random_cap: u32,
}

impl MutationTable {
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.available.get(id).and_then(|entry| entry.name.as_deref())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LitterTable {
    /// Ascending cumulative weights; bucket `i` means a litter of `i + 1`.
    pub weights: Vec<f64>,
}

/// Container for deserializing `genetics.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticsFile {
    pub genders: BTreeMap<String, GenderData>,
    pub furs: FurTable,
    pub coats: LineageTable,
    pub builds: LineageTable,
    pub traits: AspectTable,
    pub markings: AspectTable,
    pub mutations: MutationTable,
    pub titan_traits: AspectTable,
    pub litters: LitterTable,
}

/// Container for deserializing `addons.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AddonsFile {
    pub add_ons: BTreeMap<String, AddonDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineage_null_means_incompatible() {
        let json = r#"{
            "default": "Domestic",
            "available": {
                "Brute": { "inherit_chance": { "Dwarf": 0.4, "Regal": null } },
                "Dwarf": {}
            }
        }"#;
        let table: LineageTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.inherit_chance("Brute", "Dwarf"), Some(0.4));
        assert_eq!(table.inherit_chance("Brute", "Regal"), None);
        assert_eq!(table.inherit_chance("Dwarf", "Brute"), None);
        assert_eq!(table.inherit_chance("Nope", "Brute"), None);
        assert!(table.random_chance.is_empty());
    }

    #[test]
    fn test_aspect_quality_lookup() {
        let json = r#"{
            "qualities": { "Common": { "inherit_chance": { "single": 0.3, "double": 0.5 } } },
            "available": {
                "Clever": { "quality": "Common" },
                "Odd": { "quality": "Mythic", "name": "Oddity" }
            }
        }"#;
        let table: AspectTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.inherit_chance("trait", "Clever", false).unwrap(), 0.3);
        assert_eq!(table.inherit_chance("trait", "Clever", true).unwrap(), 0.5);
        assert!(matches!(
            table.inherit_chance("trait", "Odd", false),
            Err(BreedError::MissingConfig { .. })
        ));
        assert!(table.inherit_chance("trait", "Missing", false).is_err());
        assert_eq!(table.display_name("Odd"), Some("Oddity"));
        assert_eq!(table.display_name("Clever"), None);
        assert_eq!(table.with_quality("Common").collect::<Vec<_>>(), vec!["Clever"]);
    }
}
