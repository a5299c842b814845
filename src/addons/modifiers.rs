//! Active modifiers for one generation call.
//!
//! A [`Modifiers`] value is the immutable view of the selected addons that
//! each offspring is generated against. Single-use effects carry a slot
//! number so the litter can drop them once an offspring reports them
//! consumed.

use std::collections::BTreeSet;

use super::catalog::{AddonCatalog, AttributeKind, Effect, RollKind};
use crate::creature::Gender;

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEffect {
    pub slot: usize,
    pub addon: String,
    pub effect: Effect,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Modifiers {
    effects: Vec<ActiveEffect>,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    /// Look up each addon in the catalog, in selection order.
    ///
    /// Identifiers the catalog does not know are inert.
    pub fn resolve<S: AsRef<str>>(catalog: &AddonCatalog, addons: &[S]) -> Self {
        let mut effects = Vec::new();
        for id in addons {
            let id = id.as_ref();
            match catalog.get(id) {
                Some(addon) => {
                    log::debug!("Addon {} ({}) active with {} effect(s)", id, addon.name, addon.effects.len());
                    for effect in &addon.effects {
                        effects.push(ActiveEffect {
                            slot: effects.len(),
                            addon: id.to_string(),
                            effect: effect.clone(),
                        });
                    }
                }
                None => log::warn!("Ignoring unknown addon {}", id),
            }
        }
        Self { effects }
    }

    /// Build directly from effects, tagged with an anonymous addon.
    pub fn from_effects(effects: impl IntoIterator<Item = Effect>) -> Self {
        let effects = effects
            .into_iter()
            .enumerate()
            .map(|(slot, effect)| ActiveEffect { slot, addon: String::new(), effect })
            .collect();
        Self { effects }
    }

    /// The same modifiers minus the consumed slots.
    pub fn without(&self, consumed: &BTreeSet<usize>) -> Self {
        Self {
            effects: self
                .effects
                .iter()
                .filter(|e| !consumed.contains(&e.slot))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn active(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().map(|e| &e.effect)
    }

    /// `base` plus every flat boost for `roll`, clamped to 1.0.
    pub fn boosted(&self, roll: RollKind, base: f64) -> f64 {
        self.boosted_for_quality(roll, None, base)
    }

    /// `base` plus flat boosts and the tier bonuses for `quality`, clamped to 1.0.
    pub fn boosted_for_quality(&self, roll: RollKind, quality: Option<&str>, base: f64) -> f64 {
        let chance = self.effects().fold(base, |chance, effect| match effect {
            Effect::ChanceBoost { roll: r, amount } if *r == roll => chance + amount,
            Effect::QualityBoost { roll: r, bonuses } if *r == roll => {
                chance + quality.and_then(|q| bonuses.get(q)).copied().unwrap_or(0.0)
            }
            _ => chance,
        });
        chance.min(1.0)
    }

    pub fn forced_gender(&self) -> Option<Gender> {
        self.effects().find_map(|effect| match effect {
            Effect::ForceGender { gender } => Some(*gender),
            _ => None,
        })
    }

    pub fn litter_build(&self) -> Option<&str> {
        self.effects().find_map(|effect| match effect {
            Effect::LitterBuild { build } => Some(build.as_str()),
            _ => None,
        })
    }

    /// The first unconsumed build transform, with its slot.
    pub fn transform_build(&self) -> Option<(usize, &str)> {
        self.effects.iter().find_map(|active| match &active.effect {
            Effect::TransformBuild { build } => Some((active.slot, build.as_str())),
            _ => None,
        })
    }

    pub fn build_chance_override(&self, mother_build: &str) -> Option<f64> {
        self.effects().find_map(|effect| match effect {
            Effect::BuildChanceOverride { by_mother_build } => by_mother_build.get(mother_build).copied(),
            _ => None,
        })
    }

    pub fn build_chance_boosts(&self) -> impl Iterator<Item = (&str, f64)> {
        self.effects().filter_map(|effect| match effect {
            Effect::BuildChanceBoost { build, amount } => Some((build.as_str(), *amount)),
            _ => None,
        })
    }

    pub fn guaranteed_builds(&self) -> impl Iterator<Item = (&str, usize)> {
        self.effects().filter_map(|effect| match effect {
            Effect::GuaranteeBuild { build, count } => Some((build.as_str(), *count)),
            _ => None,
        })
    }

    pub fn wants_build_diversity(&self) -> bool {
        self.effects().any(|effect| matches!(effect, Effect::BuildDiversity))
    }

    pub fn forced_attributes(&self) -> impl Iterator<Item = (AttributeKind, &str)> {
        self.effects().filter_map(|effect| match effect {
            Effect::ForceAttribute { attribute, value } => Some((*attribute, value.as_str())),
            _ => None,
        })
    }

    pub fn has_mutation_floor(&self) -> bool {
        self.effects().any(|effect| matches!(effect, Effect::MutationFloor))
    }

    /// Combined per-offspring mutation chance, if any effect grants one.
    pub fn mutation_chance(&self) -> Option<f64> {
        let chances: Vec<f64> = self
            .effects()
            .filter_map(|effect| match effect {
                Effect::MutationChance { chance } => Some(*chance),
                _ => None,
            })
            .collect();
        if chances.is_empty() {
            None
        } else {
            Some(chances.iter().sum::<f64>().min(1.0))
        }
    }

    pub fn has_inbreeding(&self) -> bool {
        self.effects().any(|effect| matches!(effect, Effect::Inbreeding))
    }

    /// Largest requested minimum litter size.
    pub fn litter_minimum(&self) -> Option<usize> {
        self.effects()
            .filter_map(|effect| match effect {
                Effect::LitterSizeMinimum { size } => Some(*size),
                _ => None,
            })
            .max()
    }

    pub fn litter_delta(&self) -> usize {
        self.effects()
            .map(|effect| match effect {
                Effect::LitterSizeDelta { amount } => *amount,
                _ => 0,
            })
            .sum()
    }

    /// `(chance, min, max)` for every chance-gated litter bonus.
    pub fn litter_chances(&self) -> impl Iterator<Item = (f64, usize, usize)> + '_ {
        self.effects().filter_map(|effect| match effect {
            Effect::LitterSizeChance { chance, min, max } => Some((*chance, *min, *max)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::GeneticTable;
    use std::collections::BTreeMap;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_resolve_skips_unknown_addons() {
        let table = GeneticTable::defaults();
        let mods = Modifiers::resolve(&table.add_ons, &["AO_NOT_REAL", "AO_WEREWORM"]);
        assert_eq!(mods.active().len(), 2);
        assert!(mods.active().iter().all(|e| e.addon == "AO_WEREWORM"));
        assert_eq!(mods.active()[1].slot, 1);
        assert!(Modifiers::resolve(&table.add_ons, &["AO_NOT_REAL"]).is_empty());
    }

    #[test]
    fn test_chance_boosts_stack() {
        let mods = Modifiers::from_effects([
            Effect::ChanceBoost { roll: RollKind::MutationInherit, amount: 0.05 },
            Effect::ChanceBoost { roll: RollKind::MutationSpontaneous, amount: 0.5 },
            Effect::ChanceBoost { roll: RollKind::MutationInherit, amount: 0.1 },
        ]);
        assert!(close(mods.boosted(RollKind::MutationInherit, 0.2), 0.35));
        assert!(close(mods.boosted(RollKind::TraitInherit, 0.2), 0.2));
        assert_eq!(mods.boosted(RollKind::MutationSpontaneous, 0.8), 1.0);
    }

    #[test]
    fn test_quality_boost_by_tier() {
        let mut bonuses = BTreeMap::new();
        bonuses.insert("Rare".to_string(), 0.15);
        let mods = Modifiers::from_effects([
            Effect::QualityBoost { roll: RollKind::TraitInherit, bonuses },
            Effect::ChanceBoost { roll: RollKind::TraitInherit, amount: 0.1 },
        ]);
        assert!(close(mods.boosted_for_quality(RollKind::TraitInherit, Some("Rare"), 0.1), 0.35));
        assert!(close(mods.boosted_for_quality(RollKind::TraitInherit, Some("Common"), 0.3), 0.4));
        assert!(close(mods.boosted(RollKind::TraitInherit, 0.3), 0.4));
    }

    #[test]
    fn test_without_drops_consumed_slots() {
        let mods = Modifiers::from_effects([
            Effect::TransformBuild { build: "Dwarf".to_string() },
            Effect::TransformBuild { build: "Brute".to_string() },
        ]);
        assert_eq!(mods.transform_build(), Some((0, "Dwarf")));
        let consumed: BTreeSet<usize> = [0].into_iter().collect();
        let rest = mods.without(&consumed);
        assert_eq!(rest.transform_build(), Some((1, "Brute")));
        let consumed: BTreeSet<usize> = [0, 1].into_iter().collect();
        assert_eq!(mods.without(&consumed).transform_build(), None);
    }

    #[test]
    fn test_litter_size_effects() {
        let mods = Modifiers::from_effects([
            Effect::LitterSizeMinimum { size: 2 },
            Effect::LitterSizeMinimum { size: 4 },
            Effect::LitterSizeDelta { amount: 1 },
            Effect::LitterSizeDelta { amount: 2 },
            Effect::LitterSizeChance { chance: 0.5, min: 1, max: 3 },
        ]);
        assert_eq!(mods.litter_minimum(), Some(4));
        assert_eq!(mods.litter_delta(), 3);
        assert_eq!(mods.litter_chances().collect::<Vec<_>>(), vec![(0.5, 1, 3)]);
        assert_eq!(Modifiers::none().litter_minimum(), None);
    }

    #[test]
    fn test_mutation_chance_stacks() {
        let mods = Modifiers::from_effects([
            Effect::MutationChance { chance: 0.1 },
            Effect::MutationChance { chance: 0.15 },
        ]);
        assert!(close(mods.mutation_chance().unwrap(), 0.25));
        assert_eq!(Modifiers::none().mutation_chance(), None);
    }

    #[test]
    fn test_first_forced_gender_wins() {
        let mods = Modifiers::from_effects([
            Effect::ForceGender { gender: Gender::Male },
            Effect::ForceGender { gender: Gender::Female },
        ]);
        assert_eq!(mods.forced_gender(), Some(Gender::Male));
    }
}
