//! Addon definitions and their effect descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::creature::Gender;

/// Which roll a chance boost applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollKind {
    /// Single/double rare-fur inherit rolls (only when a parent is rare).
    FurInherit,
    /// The fallback rare-fur roll.
    RareFur,
    TraitInherit,
    MarkingInherit,
    MutationInherit,
    MutationSpontaneous,
    TitanTraitInherit,
}

/// Attributes a litter can be forced to carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Coat,
    Trait,
    Marking,
    Mutation,
}

fn one() -> usize {
    1
}

/// A single typed modifier carried by an addon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Every offspring has this gender.
    ForceGender { gender: Gender },
    /// Flat bonus added to every roll of a kind.
    ChanceBoost { roll: RollKind, amount: f64 },
    /// Bonus added to rolls of a kind, by quality tier of the aspect.
    QualityBoost { roll: RollKind, bonuses: BTreeMap<String, f64> },
    /// Replaces the build inherit chance, keyed by the mother's build.
    BuildChanceOverride { by_mother_build: BTreeMap<String, f64> },
    /// Raises the chance of whichever parent holds `build` passing it on.
    BuildChanceBoost { build: String, amount: f64 },
    /// The whole litter has this build; no build roll happens.
    LitterBuild { build: String },
    /// One offspring has its build replaced. Consumed on first use.
    TransformBuild { build: String },
    /// The first `count` offspring are forced to `build` after generation.
    GuaranteeBuild {
        build: String,
        #[serde(default = "one")]
        count: usize,
    },
    /// At least one offspring ends up with a build neither parent has.
    BuildDiversity,
    /// One offspring gets `value` if nobody in the litter has it.
    ForceAttribute { attribute: AttributeKind, value: String },
    /// A litter never ends up without a single mutation.
    MutationFloor,
    /// Per-offspring chance of an extra mutation. Stacks additively.
    MutationChance { chance: f64 },
    /// Each offspring gets an inbreeding health outcome.
    Inbreeding,
    /// The litter has at least `size` offspring.
    LitterSizeMinimum { size: usize },
    /// Fixed number of extra offspring.
    LitterSizeDelta { amount: usize },
    /// On a successful roll, between `min` and `max` extra offspring.
    LitterSizeChance { chance: f64, min: usize, max: usize },
}

impl Effect {
    /// Whether the effect applies to one offspring only.
    pub fn is_single_use(&self) -> bool {
        matches!(self, Effect::TransformBuild { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddonDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// All known addons, keyed by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddonCatalog {
    addons: BTreeMap<String, AddonDef>,
}

impl AddonCatalog {
    pub fn new(addons: BTreeMap<String, AddonDef>) -> Self {
        Self { addons }
    }

    pub fn get(&self, id: &str) -> Option<&AddonDef> {
        self.addons.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.addons.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.addons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AddonDef)> {
        self.addons.iter()
    }
}
