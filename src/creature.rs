//! The creature entity and its attribute invariants.
//!
//! List attributes are normalized on every write: traits, titan traits and
//! markings stay unique and sorted by display name; mutations stay unique,
//! hold at most one member of each exclusive group, and never exceed
//! [`Creature::MUTATION_CAP`].

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::closed_set::ClosedSet;
use crate::error::{BreedError, Result};
use crate::genetics::{AspectKind, GeneticTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Initial values for a creature. Absent fields take the table defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureInit {
    pub gender: Option<Gender>,
    pub fur: Option<String>,
    pub coat: Option<String>,
    pub build: Option<String>,
    pub traits: Option<Vec<String>>,
    pub titan_traits: Option<Vec<String>>,
    pub markings: Option<Vec<String>>,
    pub mutations: Option<Vec<String>>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub health: Option<String>,
}

fn owned(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

impl CreatureInit {
    pub fn new(gender: Gender) -> Self {
        Self { gender: Some(gender), ..Self::default() }
    }

    pub fn with_fur(mut self, fur: &str) -> Self {
        self.fur = Some(fur.to_string());
        self
    }

    pub fn with_coat(mut self, coat: &str) -> Self {
        self.coat = Some(coat.to_string());
        self
    }

    pub fn with_build(mut self, build: &str) -> Self {
        self.build = Some(build.to_string());
        self
    }

    pub fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = owned(traits);
        self
    }

    pub fn with_titan_traits(mut self, titan_traits: &[&str]) -> Self {
        self.titan_traits = owned(titan_traits);
        self
    }

    pub fn with_markings(mut self, markings: &[&str]) -> Self {
        self.markings = owned(markings);
        self
    }

    pub fn with_mutations(mut self, mutations: &[&str]) -> Self {
        self.mutations = owned(mutations);
        self
    }
}

/// One individual.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Creature {
    gender: Option<Gender>,
    fur: String,
    coat: String,
    build: String,
    traits: Vec<String>,
    titan_traits: Vec<String>,
    markings: Vec<String>,
    mutations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    health: Option<String>,
}

impl Creature {
    pub const MUTATION_CAP: usize = 3;

    pub fn new(table: &GeneticTable, init: CreatureInit) -> Self {
        let mut creature = Self {
            gender: init.gender,
            fur: init.fur.unwrap_or_else(|| table.furs.default.clone()),
            coat: init.coat.unwrap_or_else(|| table.coats.default.clone()),
            build: init.build.unwrap_or_else(|| table.builds.default.clone()),
            traits: Vec::new(),
            titan_traits: Vec::new(),
            markings: Vec::new(),
            mutations: Vec::new(),
            name: init.name,
            url: init.url,
            health: init.health,
        };
        creature.set_traits(table, init.traits.unwrap_or_else(|| table.traits.default.clone()));
        creature.set_titan_traits(table, init.titan_traits.unwrap_or_else(|| table.titan_traits.default.clone()));
        creature.set_markings(table, init.markings.unwrap_or_else(|| table.markings.default.clone()));
        creature.set_mutations(table, init.mutations.unwrap_or_else(|| table.mutations.default.clone()));
        creature
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn fur(&self) -> &str {
        &self.fur
    }

    pub fn coat(&self) -> &str {
        &self.coat
    }

    pub fn build(&self) -> &str {
        &self.build
    }

    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    pub fn titan_traits(&self) -> &[String] {
        &self.titan_traits
    }

    pub fn markings(&self) -> &[String] {
        &self.markings
    }

    pub fn mutations(&self) -> &[String] {
        &self.mutations
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn health(&self) -> Option<&str> {
        self.health.as_deref()
    }

    pub fn has_traits(&self) -> bool {
        !self.traits.is_empty()
    }

    pub fn has_titan_traits(&self) -> bool {
        !self.titan_traits.is_empty()
    }

    pub fn has_markings(&self) -> bool {
        !self.markings.is_empty()
    }

    pub fn has_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }

    pub fn has_mutation_capacity(&self) -> bool {
        self.mutations.len() < Self::MUTATION_CAP
    }

    pub fn has_rare_fur(&self, table: &GeneticTable) -> bool {
        table.rare_furs().contains(&self.fur)
    }

    pub fn limited_markings(&self, table: &GeneticTable) -> Vec<&str> {
        self.markings
            .iter()
            .map(String::as_str)
            .filter(|m| table.is_limited_marking(m))
            .collect()
    }

    pub fn has_limited_markings(&self, table: &GeneticTable) -> bool {
        self.markings.iter().any(|m| table.is_limited_marking(m))
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.gender = gender;
    }

    pub fn set_fur(&mut self, fur: impl Into<String>) {
        self.fur = fur.into();
    }

    pub fn set_coat(&mut self, coat: impl Into<String>) {
        self.coat = coat.into();
    }

    pub fn set_build(&mut self, build: impl Into<String>) {
        self.build = build.into();
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url;
    }

    pub fn set_health(&mut self, health: Option<String>) {
        self.health = health;
    }

    pub fn set_traits(&mut self, table: &GeneticTable, traits: Vec<String>) {
        self.traits = sorted_unique(table, AspectKind::Trait, traits);
    }

    pub fn add_trait(&mut self, table: &GeneticTable, id: impl Into<String>) {
        let mut traits = std::mem::take(&mut self.traits);
        traits.push(id.into());
        self.set_traits(table, traits);
    }

    pub fn set_titan_traits(&mut self, table: &GeneticTable, titan_traits: Vec<String>) {
        self.titan_traits = sorted_unique(table, AspectKind::TitanTrait, titan_traits);
    }

    pub fn add_titan_trait(&mut self, table: &GeneticTable, id: impl Into<String>) {
        let mut titan_traits = std::mem::take(&mut self.titan_traits);
        titan_traits.push(id.into());
        self.set_titan_traits(table, titan_traits);
    }

    pub fn clear_titan_traits(&mut self) {
        self.titan_traits.clear();
    }

    pub fn set_markings(&mut self, table: &GeneticTable, markings: Vec<String>) {
        self.markings = sorted_unique(table, AspectKind::Marking, markings);
    }

    pub fn add_marking(&mut self, table: &GeneticTable, id: impl Into<String>) {
        let mut markings = std::mem::take(&mut self.markings);
        markings.push(id.into());
        self.set_markings(table, markings);
    }

    /// Add one marking, evicting other members of its exclusive group.
    pub fn force_marking(&mut self, table: &GeneticTable, id: impl Into<String>) {
        let id = id.into();
        let mut markings = std::mem::take(&mut self.markings);
        for group in table.markings.exclusive_groups.values() {
            if group.contains(&id) {
                markings.retain(|m| !group.contains(m));
            }
        }
        markings.push(id);
        self.set_markings(table, markings);
    }

    /// Replace the mutation list. Entries are added in order, so a later
    /// member of an exclusive group evicts an earlier one, and entries past
    /// the cap are dropped.
    pub fn set_mutations(&mut self, table: &GeneticTable, mutations: Vec<String>) {
        self.mutations.clear();
        for mutation in mutations {
            self.add_mutation(table, mutation);
        }
    }

    /// Add one mutation. Returns whether it is now carried.
    ///
    /// Other members of its exclusive group are evicted first; if the list
    /// is still full the mutation is silently dropped.
    pub fn add_mutation(&mut self, table: &GeneticTable, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.mutations.contains(&id) {
            return true;
        }

        for group in table.mutations.exclusive_groups.values() {
            if group.contains(&id) {
                self.mutations.retain(|m| !group.contains(m));
            }
        }

        if !self.has_mutation_capacity() {
            log::trace!("Dropping mutation {}: already at cap", id);
            return false;
        }
        self.mutations.push(id);
        true
    }

    /// Check that every identifier belongs to its category.
    pub fn validate(&self, table: &GeneticTable) -> Result<()> {
        check_one(table.fur_options(), &self.fur)?;
        check_one(table.coat_options(), &self.coat)?;
        check_one(table.build_options(), &self.build)?;
        check_all(table.trait_options(), &self.traits)?;
        check_all(table.titan_trait_options(), &self.titan_traits)?;
        check_all(table.marking_options(), &self.markings)?;
        check_all(table.mutation_options(), &self.mutations)
    }
}

fn check_one(options: &ClosedSet, value: &str) -> Result<()> {
    if options.contains(value) {
        Ok(())
    } else {
        Err(BreedError::unknown(options.category(), value))
    }
}

fn check_all(options: &ClosedSet, values: &[String]) -> Result<()> {
    values.iter().try_for_each(|v| check_one(options, v))
}

/// De-duplicate, then sort case-insensitively by display name.
fn sorted_unique(table: &GeneticTable, kind: AspectKind, items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique.sort_by(|a, b| compare_display(table, kind, a, b));
    unique
}

fn compare_display(table: &GeneticTable, kind: AspectKind, a: &str, b: &str) -> Ordering {
    let left = table.display_name(kind, a).to_lowercase();
    let right = table.display_name(kind, b).to_lowercase();
    left.cmp(&right).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GeneticTable {
        GeneticTable::defaults()
    }

    #[test]
    fn test_defaults_from_table() {
        let table = table();
        let creature = Creature::new(&table, CreatureInit::default());
        assert_eq!(creature.gender(), None);
        assert_eq!(creature.fur(), table.furs.default);
        assert_eq!(creature.coat(), table.coats.default);
        assert_eq!(creature.build(), table.builds.default);
        assert!(!creature.has_traits());
        assert!(!creature.has_markings());
        assert!(!creature.has_mutations());
        assert!(!creature.has_titan_traits());
        assert_eq!(creature.health(), None);
    }

    #[test]
    fn test_initial_values_are_used() {
        let table = table();
        let init = CreatureInit::new(Gender::Male)
            .with_build("Brute")
            .with_fur("Polar")
            .with_coat("Ebony")
            .with_traits(&["Birthright"])
            .with_markings(&["Auribus"])
            .with_mutations(&["Albinism"]);
        let creature = Creature::new(&table, init);
        assert_eq!(creature.gender(), Some(Gender::Male));
        assert_eq!(creature.build(), "Brute");
        assert_eq!(creature.fur(), "Polar");
        assert_eq!(creature.coat(), "Ebony");
        assert_eq!(creature.traits(), &["Birthright".to_string()]);
        assert_eq!(creature.markings(), &["Auribus".to_string()]);
        assert_eq!(creature.mutations(), &["Albinism".to_string()]);
    }

    #[test]
    fn test_traits_sorted_by_display_name_and_unique() {
        let table = table();
        let mut creature = Creature::new(&table, CreatureInit::default());
        // "Keen_Nose" displays as "Keen Nose", "Big_Boned" as "Big Boned"
        creature.set_traits(&table, vec![
            "Stalwart".to_string(),
            "Keen_Nose".to_string(),
            "agile".to_string(),
            "Big_Boned".to_string(),
            "Stalwart".to_string(),
        ]);
        assert_eq!(creature.traits(), &["agile", "Big_Boned", "Keen_Nose", "Stalwart"]);

        creature.add_trait(&table, "Clever");
        assert_eq!(creature.traits(), &["agile", "Big_Boned", "Clever", "Keen_Nose", "Stalwart"]);
    }

    #[test]
    fn test_markings_sorted_by_display_name() {
        let table = table();
        let mut creature = Creature::new(&table, CreatureInit::default());
        // "Tear" displays as "Tear of Selene", which sorts after "Stripes"
        creature.set_markings(&table, vec!["Tear".to_string(), "Auribus".to_string(), "Stripes".to_string()]);
        assert_eq!(creature.markings(), &["Auribus", "Stripes", "Tear"]);
        creature.add_marking(&table, "Auribus");
        assert_eq!(creature.markings().len(), 3);
    }

    #[test]
    fn test_mutation_cap_drops_silently() {
        let table = table();
        let mut creature = Creature::new(&table, CreatureInit::default());
        assert!(creature.add_mutation(&table, "Auric"));
        assert!(creature.add_mutation(&table, "Chimerism"));
        assert!(creature.add_mutation(&table, "Heterochromia"));
        assert!(!creature.has_mutation_capacity());
        assert!(!creature.add_mutation(&table, "Extra_Tail"));
        assert_eq!(creature.mutations(), &["Auric", "Chimerism", "Heterochromia"]);
    }

    #[test]
    fn test_mutation_exclusive_group_evicts() {
        let table = table();
        let mut creature = Creature::new(&table, CreatureInit::default().with_mutations(&["Albinism", "Auric"]));
        assert!(creature.add_mutation(&table, "Melanism"));
        assert_eq!(creature.mutations(), &["Auric", "Melanism"]);
    }

    #[test]
    fn test_exclusive_eviction_frees_capacity() {
        let table = table();
        let mut creature = Creature::new(
            &table,
            CreatureInit::default().with_mutations(&["Albinism", "Auric", "Chimerism"]),
        );
        assert!(creature.add_mutation(&table, "Leucism"));
        assert_eq!(creature.mutations(), &["Auric", "Chimerism", "Leucism"]);
    }

    #[test]
    fn test_set_mutations_dedupes_and_caps() {
        let table = table();
        let creature = Creature::new(
            &table,
            CreatureInit::default().with_mutations(&["Auric", "Auric", "Chimerism", "Heterochromia", "Extra_Tail"]),
        );
        assert_eq!(creature.mutations(), &["Auric", "Chimerism", "Heterochromia"]);
    }

    #[test]
    fn test_rare_fur_and_limited_markings() {
        let table = table();
        let mut creature = Creature::new(&table, CreatureInit::default());
        assert!(!creature.has_rare_fur(&table));
        creature.set_fur(table.furs.rare_options[0].clone());
        assert!(creature.has_rare_fur(&table));

        assert!(!creature.has_limited_markings(&table));
        creature.set_markings(&table, vec!["Tear".to_string(), "Auribus".to_string()]);
        assert!(creature.has_limited_markings(&table));
        assert_eq!(creature.limited_markings(&table), vec!["Tear"]);
    }

    #[test]
    fn test_validate_rejects_unknown_identifiers() {
        let table = table();
        let good = Creature::new(&table, CreatureInit::new(Gender::Female).with_traits(&["Clever"]));
        assert!(good.validate(&table).is_ok());

        let bad = Creature::new(&table, CreatureInit::new(Gender::Female).with_build("Giant"));
        assert!(matches!(
            bad.validate(&table),
            Err(BreedError::UnknownAspect { category: "build", .. })
        ));

        let bad = Creature::new(&table, CreatureInit::new(Gender::Female).with_markings(&["Spots"]));
        assert!(bad.validate(&table).is_err());
    }

    #[test]
    fn test_init_deserializes_with_missing_fields() {
        let init: CreatureInit = serde_json::from_str(r#"{ "gender": "Male", "build": "Brute" }"#).unwrap();
        assert_eq!(init.gender, Some(Gender::Male));
        assert_eq!(init.build.as_deref(), Some("Brute"));
        assert_eq!(init.traits, None);
    }

    #[test]
    fn test_serialize_skips_absent_health() {
        let table = table();
        let mut creature = Creature::new(&table, CreatureInit::new(Gender::Female));
        let json = serde_json::to_value(&creature).unwrap();
        assert!(json.get("health").is_none());
        creature.set_health(Some("Inbred - Healthy".to_string()));
        let json = serde_json::to_value(&creature).unwrap();
        assert_eq!(json["health"], "Inbred - Healthy");
        assert_eq!(json["gender"], "Female");
    }
}
