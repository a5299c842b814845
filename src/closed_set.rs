//! Closed sets of identifiers.

use std::collections::{BTreeMap, BTreeSet};

use crate::roll::{random_sample, RandomSource};

/// An immutable, named set of valid identifiers for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosedSet {
    category: &'static str,
    values: BTreeSet<String>,
}

impl ClosedSet {
    /// Build from an ordered list of identifiers.
    pub fn from_values<I, S>(category: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from the keys of a map.
    pub fn from_keys<V>(category: &'static str, map: &BTreeMap<String, V>) -> Self {
        Self::from_values(category, map.keys().cloned())
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All identifiers, sorted ascending.
    pub fn all_values(&self) -> Vec<&str> {
        self.values.iter().map(String::as_str).collect()
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.iter().next().map(String::as_str)
    }

    /// Uniform pick among the identifiers not listed in `exclude`.
    pub fn random_value(&self, dice: &mut dyn RandomSource, exclude: &[&str]) -> Option<&str> {
        let options: Vec<&str> = self
            .values
            .iter()
            .map(String::as_str)
            .filter(|v| !exclude.contains(v))
            .collect();
        random_sample(dice, &options).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::ScriptedDice;

    fn furs() -> ClosedSet {
        ClosedSet::from_values("fur", ["Sleek", "Silky", "Polar"])
    }

    #[test]
    fn test_membership() {
        let set = furs();
        assert!(set.contains("Polar"));
        assert!(!set.contains("polar"));
        assert!(!set.contains("Feathered"));
        assert_eq!(set.len(), 3);
        assert_eq!(set.category(), "fur");
    }

    #[test]
    fn test_all_values_sorted_and_first() {
        let set = furs();
        assert_eq!(set.all_values(), vec!["Polar", "Silky", "Sleek"]);
        assert_eq!(set.first_value(), Some("Polar"));
    }

    #[test]
    fn test_from_keys() {
        let mut map = BTreeMap::new();
        map.insert("Brute".to_string(), 1);
        map.insert("Dwarf".to_string(), 2);
        let set = ClosedSet::from_keys("build", &map);
        assert_eq!(set.all_values(), vec!["Brute", "Dwarf"]);
    }

    #[test]
    fn test_random_value_excludes() {
        let set = furs();
        let mut dice = ScriptedDice::always(true).with_indices([0, 1]);
        // Without "Polar" the options are [Silky, Sleek]
        assert_eq!(set.random_value(&mut dice, &["Polar"]), Some("Silky"));
        assert_eq!(set.random_value(&mut dice, &["Polar"]), Some("Sleek"));
        assert_eq!(set.random_value(&mut dice, &["Polar", "Silky", "Sleek"]), None);
    }
}
