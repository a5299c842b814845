//! Offspring inherited from two validated parents.
//!
//! The father is always the first parent; the mother breaks ties.

use crate::addons::{Modifiers, RollKind};
use crate::creature::{Creature, Gender};
use crate::error::{BreedError, Result};
use crate::genetics::GeneticTable;
use crate::roll::{random_sample, RandomSource};

use super::rules::{cap_random, filter_exclusive, inherit_aspects, roll_random_fur, unique, unique_union};
use super::OffspringGenerator;

/// Most titan traits a single offspring can roll.
pub const TITAN_TRAIT_CAP: usize = 4;

pub struct BreedingGround<'g> {
    genetics: &'g GeneticTable,
    father: Creature,
    mother: Creature,
}

fn gender_label(gender: Option<Gender>) -> String {
    gender.map_or_else(|| "unset".to_string(), |g| g.label().to_string())
}

impl<'g> BreedingGround<'g> {
    /// Validate both parents before any rolling.
    pub fn new(genetics: &'g GeneticTable, father: Creature, mother: Creature) -> Result<Self> {
        if father.gender() != Some(Gender::Male) || mother.gender() != Some(Gender::Female) {
            return Err(BreedError::GenderMismatch {
                father: gender_label(father.gender()),
                mother: gender_label(mother.gender()),
            });
        }
        father.validate(genetics)?;
        mother.validate(genetics)?;
        Ok(Self { genetics, father, mother })
    }

    pub fn from_parents(genetics: &'g GeneticTable, father: Option<Creature>, mother: Option<Creature>) -> Result<Self> {
        let father = father.ok_or(BreedError::MissingParent("father"))?;
        let mother = mother.ok_or(BreedError::MissingParent("mother"))?;
        Self::new(genetics, father, mother)
    }

    pub fn father(&self) -> &Creature {
        &self.father
    }

    pub fn mother(&self) -> &Creature {
        &self.mother
    }

    /// Mother's chance of passing on her build, after addon adjustments.
    fn build_chance(&self, mods: &Modifiers) -> Result<f64> {
        let (father, mother) = (self.father.build(), self.mother.build());
        let table_chance = self.genetics.builds.inherit_chance(father, mother).ok_or_else(|| {
            BreedError::IncompatibleBuilds { father: father.to_string(), mother: mother.to_string() }
        })?;

        let mut chance = mods.build_chance_override(mother).unwrap_or(table_chance);
        for (build, amount) in mods.build_chance_boosts() {
            if build == mother {
                chance = (chance + amount).min(1.0);
            } else if build == father {
                chance = 1.0 - ((1.0 - chance) + amount).min(1.0);
            }
        }
        Ok(chance)
    }
}

impl OffspringGenerator for BreedingGround<'_> {
    fn genetics(&self) -> &GeneticTable {
        self.genetics
    }

    fn generate_fur(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String> {
        let rates = self.genetics.furs.inherit_chance;
        let single = mods.boosted(RollKind::FurInherit, rates.single);
        let (father, mother) = (&self.father, &self.mother);

        let father_rare = father.has_rare_fur(self.genetics);
        let mother_rare = mother.has_rare_fur(self.genetics);

        match (father_rare, mother_rare) {
            (true, true) if father.fur() == mother.fur() => {
                if dice.should_do_action(mods.boosted(RollKind::FurInherit, rates.double)) {
                    return Ok(mother.fur().to_string());
                }
            }
            (true, true) => {
                let from_mother = dice.should_do_action(single);
                let from_father = dice.should_do_action(single);
                if from_mother {
                    return Ok(mother.fur().to_string());
                }
                if from_father {
                    return Ok(father.fur().to_string());
                }
            }
            (true, false) | (false, true) => {
                let parent = if father_rare { father } else { mother };
                if dice.should_do_action(single) {
                    return Ok(parent.fur().to_string());
                }
            }
            (false, false) => {}
        }
        Ok(roll_random_fur(self.genetics, mods, dice))
    }

    fn generate_coat(&self, _mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String> {
        let (father, mother) = (self.father.coat(), self.mother.coat());
        if father == mother {
            return Ok(father.to_string());
        }
        let chance = self
            .genetics
            .coats
            .inherit_chance(father, mother)
            .ok_or_else(|| BreedError::missing_config("coat", format!("{} with {}", father, mother)))?;
        let winner = if dice.should_do_action(chance) { mother } else { father };
        Ok(winner.to_string())
    }

    fn generate_build(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String> {
        let (father, mother) = (self.father.build(), self.mother.build());
        if father == mother {
            return Ok(father.to_string());
        }
        let chance = self.build_chance(mods)?;
        log::trace!("Build roll {} x {} at {:.3}", father, mother, chance);
        let winner = if dice.should_do_action(chance) { mother } else { father };
        Ok(winner.to_string())
    }

    fn generate_traits(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>> {
        inherit_aspects(
            self.father.traits(),
            self.mother.traits(),
            &self.genetics.traits,
            "trait",
            RollKind::TraitInherit,
            mods,
            dice,
        )
    }

    fn generate_markings(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>> {
        let markings = inherit_aspects(
            self.father.markings(),
            self.mother.markings(),
            &self.genetics.markings,
            "marking",
            RollKind::MarkingInherit,
            mods,
            dice,
        )?;
        Ok(filter_exclusive(markings, &self.genetics.markings.exclusive_groups, dice))
    }

    fn generate_mutations(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>> {
        let table = &self.genetics.mutations;
        let mut mutations = Vec::new();

        let inherit = mods.boosted(RollKind::MutationInherit, table.inherit_chance.single);
        for id in unique_union(self.father.mutations(), self.mother.mutations()) {
            if dice.should_do_action(inherit) {
                mutations.push(id);
            }
        }

        let spontaneous = mods.boosted(RollKind::MutationSpontaneous, table.base_chance);
        if dice.should_do_action(spontaneous) {
            let catalog = self.genetics.mutation_options().all_values();
            if let Some(id) = random_sample(dice, &catalog) {
                log::debug!("Spontaneous mutation {}", id);
                mutations.push(id.to_string());
            }
        }

        let filtered = filter_exclusive(unique(mutations), &table.exclusive_groups, dice);
        Ok(cap_random(filtered, Creature::MUTATION_CAP, dice))
    }

    fn generate_titan_traits(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>> {
        let titan_traits = inherit_aspects(
            self.father.titan_traits(),
            self.mother.titan_traits(),
            &self.genetics.titan_traits,
            "titan trait",
            RollKind::TitanTraitInherit,
            mods,
            dice,
        )?;
        Ok(cap_random(titan_traits, TITAN_TRAIT_CAP, dice))
    }
}
