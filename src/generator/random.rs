//! Parentless offspring drawn from the global weighted tables.

use crate::addons::Modifiers;
use crate::creature::Creature;
use crate::error::{BreedError, Result};
use crate::genetics::{GeneticTable, LineageTable, UNIQUE_QUALITY};
use crate::roll::{random_sample, RandomSource};

use super::rules::{cap_random, filter_exclusive, roll_random_fur, unique, weighted_threshold};
use super::OffspringGenerator;

/// Draw weight of a marking by quality tier.
pub fn marking_weight(quality: &str) -> u32 {
    match quality {
        "Limited" => 0,
        "Common" => 100,
        "Uncommon" => 60,
        "Rare" => 15,
        "Epic" => 5,
        "Legendary" => 1,
        "Dupes" => 5,
        _ => 60,
    }
}

pub struct RandomGenerator<'g> {
    genetics: &'g GeneticTable,
}

impl<'g> RandomGenerator<'g> {
    pub fn new(genetics: &'g GeneticTable) -> Self {
        Self { genetics }
    }

    fn weighted_lineage(&self, table: &LineageTable, dice: &mut dyn RandomSource) -> String {
        let draw = dice.random_chance();
        match weighted_threshold(&table.random_chance, draw) {
            Some(value) => value.to_string(),
            None => table.default.clone(),
        }
    }

    /// Markings in catalog order paired with their draw weights.
    fn marking_pool(&self) -> Vec<(&str, u32)> {
        self.genetics
            .marking_options()
            .all_values()
            .into_iter()
            .map(|id| {
                let weight = self
                    .genetics
                    .markings
                    .available
                    .get(id)
                    .map_or(marking_weight("Common"), |entry| marking_weight(&entry.quality));
                (id, weight)
            })
            .filter(|(_, weight)| *weight > 0)
            .collect()
    }
}

fn pick_weighted<'a>(pool: &[(&'a str, u32)], dice: &mut dyn RandomSource) -> Option<&'a str> {
    let total: u32 = pool.iter().map(|(_, w)| w).sum();
    if total == 0 {
        return None;
    }
    let mut ticket = dice.random_index(total as usize) as u32;
    for (id, weight) in pool {
        if ticket < *weight {
            return Some(*id);
        }
        ticket -= weight;
    }
    pool.last().map(|(id, _)| *id)
}

impl OffspringGenerator for RandomGenerator<'_> {
    fn genetics(&self) -> &GeneticTable {
        self.genetics
    }

    fn generate_fur(&self, mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String> {
        Ok(roll_random_fur(self.genetics, mods, dice))
    }

    fn generate_coat(&self, _mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String> {
        Ok(self.weighted_lineage(&self.genetics.coats, dice))
    }

    fn generate_build(&self, _mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<String> {
        Ok(self.weighted_lineage(&self.genetics.builds, dice))
    }

    fn generate_traits(&self, _mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>> {
        let table = &self.genetics.traits;
        let candidates: Vec<&str> = self
            .genetics
            .trait_options()
            .all_values()
            .into_iter()
            .filter(|id| table.available.get(*id).map_or(true, |e| e.quality != UNIQUE_QUALITY))
            .collect();

        let count = dice.random_int(table.random_cap);
        let mut traits = Vec::new();
        for _ in 0..count {
            if let Some(id) = random_sample(dice, &candidates) {
                traits.push(id.to_string());
            }
        }
        Ok(unique(traits))
    }

    fn generate_markings(&self, _mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>> {
        let pool = self.marking_pool();
        let count = dice.random_int(self.genetics.markings.random_cap);
        let mut markings = Vec::new();
        for _ in 0..count {
            if let Some(id) = pick_weighted(&pool, dice) {
                markings.push(id.to_string());
            }
        }
        Ok(filter_exclusive(unique(markings), &self.genetics.markings.exclusive_groups, dice))
    }

    fn generate_mutations(&self, _mods: &Modifiers, dice: &mut dyn RandomSource) -> Result<Vec<String>> {
        let table = &self.genetics.mutations;
        let catalog = self.genetics.mutation_options().all_values();
        if catalog.is_empty() {
            return Err(BreedError::missing_config("mutation", "available"));
        }

        let count = dice.random_int(table.random_cap);
        let mut mutations = Vec::new();
        for _ in 0..count {
            if dice.should_do_action(table.base_chance) {
                if let Some(id) = random_sample(dice, &catalog) {
                    mutations.push(id.to_string());
                }
            }
        }
        let filtered = filter_exclusive(unique(mutations), &table.exclusive_groups, dice);
        Ok(cap_random(filtered, Creature::MUTATION_CAP, dice))
    }
}
