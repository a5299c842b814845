//! Inbreeding health outcomes.

use crate::roll::{random_subset, RandomSource};

pub const HEALTHY: &str = "Healthy";
pub const CONDITIONS: [&str; 4] = ["Blindness", "Deafness", "Frail", "Infertile"];

const PREFIX: &str = "Inbred - ";

/// Health label for a d100 roll.
///
/// A roll of 100 carries two distinct conditions.
pub fn health_for_roll(roll: u32, dice: &mut dyn RandomSource) -> String {
    let outcome = match roll {
        0..=20 => HEALTHY.to_string(),
        21..=40 => CONDITIONS[0].to_string(),
        41..=60 => CONDITIONS[1].to_string(),
        61..=80 => CONDITIONS[2].to_string(),
        81..=99 => CONDITIONS[3].to_string(),
        _ => random_subset(dice, &CONDITIONS, 2).join(", "),
    };
    format!("{}{}", PREFIX, outcome)
}

pub fn roll_health(dice: &mut dyn RandomSource) -> String {
    let roll = dice.random_int(99) + 1;
    health_for_roll(roll, dice)
}
