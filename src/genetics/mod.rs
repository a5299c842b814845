//! Genetic configuration table.
//!
//! Loads fur, coat, build, trait, marking, mutation, titan trait and litter
//! tables plus the addon catalog from JSON data files. Defaults are embedded
//! in the binary via `include_str!`; an optional directory can override them.

pub mod tables;

use std::path::Path;

pub use tables::{
    AddonsFile, AspectEntry, AspectTable, FurTable, GenderData, GeneticsFile, InheritChance,
    LineageEntry, LineageTable, LitterTable, MutationEntry, MutationTable, QualityData,
};

use crate::addons::{AddonCatalog, AttributeKind, Effect};
use crate::closed_set::ClosedSet;
use crate::creature::Gender;
use crate::error::{BreedError, Result};

const DEFAULT_GENETICS_JSON: &str = include_str!("../../data/defaults/genetics.json");
const DEFAULT_ADDONS_JSON: &str = include_str!("../../data/defaults/addons.json");

/// Marking quality tier that can only be granted, never rolled at random.
pub const LIMITED_QUALITY: &str = "Limited";
/// Trait quality tier excluded from random generation.
pub const UNIQUE_QUALITY: &str = "Unique";

/// Categories of list-valued aspects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AspectKind {
    Trait,
    Marking,
    Mutation,
    TitanTrait,
}

impl AspectKind {
    pub fn label(&self) -> &'static str {
        match self {
            AspectKind::Trait => "trait",
            AspectKind::Marking => "marking",
            AspectKind::Mutation => "mutation",
            AspectKind::TitanTrait => "titan trait",
        }
    }
}

/// Read-only genetic data, loaded once and shared by every generator.
#[derive(Clone, Debug)]
pub struct GeneticTable {
    pub genders: std::collections::BTreeMap<String, GenderData>,
    pub furs: FurTable,
    pub coats: LineageTable,
    pub builds: LineageTable,
    pub traits: AspectTable,
    pub markings: AspectTable,
    pub mutations: MutationTable,
    pub titan_traits: AspectTable,
    pub litters: LitterTable,
    pub add_ons: AddonCatalog,

    fur_options: ClosedSet,
    rare_furs: ClosedSet,
    coat_options: ClosedSet,
    build_options: ClosedSet,
    trait_options: ClosedSet,
    marking_options: ClosedSet,
    mutation_options: ClosedSet,
    titan_trait_options: ClosedSet,
}

impl GeneticTable {
    /// Load from embedded defaults compiled into the binary.
    pub fn defaults() -> Self {
        Self::from_json(DEFAULT_GENETICS_JSON, DEFAULT_ADDONS_JSON)
            .expect("Failed to parse embedded genetic data")
    }

    /// Parse and validate a genetic table and addon catalog.
    pub fn from_json(genetics: &str, addons: &str) -> Result<Self> {
        let genetics: GeneticsFile = serde_json::from_str(genetics)?;
        let addons: AddonsFile = serde_json::from_str(addons)?;
        let table = Self::from_files(genetics, addons);
        table.validate()?;
        Ok(table)
    }

    /// Load from a directory, falling back to the embedded defaults.
    ///
    /// `genetics.json` and `addons.json` each override the corresponding
    /// default when present. Malformed files are errors.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let genetics_path = dir.join("genetics.json");
        let genetics = if genetics_path.exists() {
            log::info!("Loading genetic table from {}", genetics_path.display());
            std::fs::read_to_string(&genetics_path)?
        } else {
            DEFAULT_GENETICS_JSON.to_string()
        };

        let addons_path = dir.join("addons.json");
        let addons = if addons_path.exists() {
            log::info!("Loading addon catalog from {}", addons_path.display());
            std::fs::read_to_string(&addons_path)?
        } else {
            DEFAULT_ADDONS_JSON.to_string()
        };

        Self::from_json(&genetics, &addons)
    }

    pub fn from_files(genetics: GeneticsFile, addons: AddonsFile) -> Self {
        let fur_options = ClosedSet::from_values(
            "fur",
            std::iter::once(genetics.furs.default.clone()).chain(genetics.furs.rare_options.iter().cloned()),
        );
        let rare_furs = ClosedSet::from_values("rare fur", genetics.furs.rare_options.iter().cloned());

        Self {
            fur_options,
            rare_furs,
            coat_options: ClosedSet::from_keys("coat", &genetics.coats.available),
            build_options: ClosedSet::from_keys("build", &genetics.builds.available),
            trait_options: ClosedSet::from_keys("trait", &genetics.traits.available),
            marking_options: ClosedSet::from_keys("marking", &genetics.markings.available),
            mutation_options: ClosedSet::from_keys("mutation", &genetics.mutations.available),
            titan_trait_options: ClosedSet::from_keys("titan trait", &genetics.titan_traits.available),
            genders: genetics.genders,
            furs: genetics.furs,
            coats: genetics.coats,
            builds: genetics.builds,
            traits: genetics.traits,
            markings: genetics.markings,
            mutations: genetics.mutations,
            titan_traits: genetics.titan_traits,
            litters: genetics.litters,
            add_ons: AddonCatalog::new(addons.add_ons),
        }
    }

    pub fn fur_options(&self) -> &ClosedSet {
        &self.fur_options
    }

    pub fn rare_furs(&self) -> &ClosedSet {
        &self.rare_furs
    }

    pub fn coat_options(&self) -> &ClosedSet {
        &self.coat_options
    }

    pub fn build_options(&self) -> &ClosedSet {
        &self.build_options
    }

    pub fn trait_options(&self) -> &ClosedSet {
        &self.trait_options
    }

    pub fn marking_options(&self) -> &ClosedSet {
        &self.marking_options
    }

    pub fn mutation_options(&self) -> &ClosedSet {
        &self.mutation_options
    }

    pub fn titan_trait_options(&self) -> &ClosedSet {
        &self.titan_trait_options
    }

    pub fn aspect_options(&self, kind: AspectKind) -> &ClosedSet {
        match kind {
            AspectKind::Trait => &self.trait_options,
            AspectKind::Marking => &self.marking_options,
            AspectKind::Mutation => &self.mutation_options,
            AspectKind::TitanTrait => &self.titan_trait_options,
        }
    }

    pub fn female_base_chance(&self) -> Result<f64> {
        self.genders
            .get(Gender::Female.label())
            .map(|g| g.base_chance)
            .ok_or_else(|| BreedError::missing_config("gender", Gender::Female.label()))
    }

    /// Human-readable name of an aspect, falling back to its identifier.
    pub fn display_name<'a>(&'a self, kind: AspectKind, id: &'a str) -> &'a str {
        let name = match kind {
            AspectKind::Trait => self.traits.display_name(id),
            AspectKind::Marking => self.markings.display_name(id),
            AspectKind::Mutation => self.mutations.display_name(id),
            AspectKind::TitanTrait => self.titan_traits.display_name(id),
        };
        name.unwrap_or(id)
    }

    pub fn is_limited_marking(&self, id: &str) -> bool {
        self.markings
            .available
            .get(id)
            .map_or(false, |entry| entry.quality == LIMITED_QUALITY)
    }

    /// Check cross references inside the table and the addon catalog.
    pub fn validate(&self) -> Result<()> {
        self.female_base_chance()?;

        if self.litters.weights.is_empty() {
            return Err(BreedError::missing_config("litter", "weights"));
        }
        if !self.coat_options.contains(&self.coats.default) {
            return Err(BreedError::unknown("coat", &self.coats.default));
        }
        if !self.build_options.contains(&self.builds.default) {
            return Err(BreedError::unknown("build", &self.builds.default));
        }
        for (lineage, options) in [(&self.coats, &self.coat_options), (&self.builds, &self.build_options)] {
            for (value, entry) in &lineage.available {
                for mother in entry.inherit_chance.keys() {
                    if !options.contains(mother) {
                        return Err(BreedError::unknown(options.category(), format!("{} (paired with {})", mother, value)));
                    }
                }
            }
            for value in lineage.random_chance.keys() {
                if !options.contains(value) {
                    return Err(BreedError::unknown(options.category(), value));
                }
            }
        }

        for (kind, table) in [
            (AspectKind::Trait, &self.traits),
            (AspectKind::Marking, &self.markings),
            (AspectKind::TitanTrait, &self.titan_traits),
        ] {
            for (id, entry) in &table.available {
                if !table.qualities.contains_key(&entry.quality) {
                    return Err(BreedError::missing_config(kind.label(), format!("quality {} of {}", entry.quality, id)));
                }
            }
        }

        let groups = self
            .markings
            .exclusive_groups
            .values()
            .map(|g| (AspectKind::Marking, g))
            .chain(self.mutations.exclusive_groups.values().map(|g| (AspectKind::Mutation, g)));
        for (kind, group) in groups {
            for member in group {
                if !self.aspect_options(kind).contains(member) {
                    return Err(BreedError::unknown(kind.label(), member));
                }
            }
        }

        self.validate_addons()
    }

    fn validate_addons(&self) -> Result<()> {
        for (id, addon) in self.add_ons.iter() {
            for effect in &addon.effects {
                let unknown_build = match effect {
                    Effect::LitterBuild { build }
                    | Effect::TransformBuild { build }
                    | Effect::GuaranteeBuild { build, .. }
                    | Effect::BuildChanceBoost { build, .. } => (!self.build_options.contains(build)).then(|| build.clone()),
                    Effect::BuildChanceOverride { by_mother_build } => {
                        by_mother_build.keys().find(|b| !self.build_options.contains(b)).cloned()
                    }
                    _ => None,
                };
                if let Some(build) = unknown_build {
                    return Err(BreedError::unknown("build", format!("{} (in addon {})", build, id)));
                }

                if let Effect::ForceAttribute { attribute, value } = effect {
                    let options = match attribute {
                        AttributeKind::Coat => &self.coat_options,
                        AttributeKind::Trait => &self.trait_options,
                        AttributeKind::Marking => &self.marking_options,
                        AttributeKind::Mutation => &self.mutation_options,
                    };
                    if !options.contains(value) {
                        return Err(BreedError::unknown(options.category(), format!("{} (in addon {})", value, id)));
                    }
                }
            }
        }
        Ok(())
    }
}
