use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use ndarray::Array1;

use crate::observation::ObservationKey;
use crate::utils::{argmax, max};

/// Action values of a single agent.
///
/// Rows are created lazily the first time a value of an observation is written;
/// reading an unknown observation yields the default row. Rows are kept in
/// insertion order so iterating a table is deterministic.
#[derive(Debug, Clone)]
pub struct ValueTable {
    n_actions: usize,
    default_value: f64,
    default: Array1<f64>,
    values: IndexMap<ObservationKey, Array1<f64>, FxBuildHasher>,
}

impl ValueTable {
    pub fn new(n_actions: usize, default_value: f64) -> Self {
        Self {
            n_actions,
            default_value,
            default: Array1::from_elem(n_actions, default_value),
            values: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Value of `action` in `obs`, or the default when it was never written.
    pub fn get(&self, obs: &ObservationKey, action: usize) -> f64 {
        self.row(obs)
            .get(action)
            .copied()
            .unwrap_or(self.default_value)
    }

    pub fn set(&mut self, obs: ObservationKey, action: usize, value: f64) {
        debug_assert!(action < self.n_actions);
        let default = &self.default;
        self.values
            .entry(obs)
            .or_insert_with(|| default.clone())[action] = value;
    }

    /// All action values of `obs`, indexed by action.
    pub fn row(&self, obs: &ObservationKey) -> &Array1<f64> {
        self.values.get(obs).unwrap_or(&self.default)
    }

    pub fn max_value(&self, obs: &ObservationKey) -> f64 {
        max(self.row(obs).iter().copied())
    }

    /// Highest valued action of `obs`; ties go to the lowest action index.
    pub fn greedy_action(&self, obs: &ObservationKey) -> usize {
        argmax(self.row(obs).iter().copied())
    }

    pub fn contains(&self, obs: &ObservationKey) -> bool {
        self.values.contains_key(obs)
    }

    /// Number of observations with at least one written value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObservationKey, &Array1<f64>)> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Observation;

    #[test]
    fn test_unseen_values_are_default() {
        let table = ValueTable::new(3, 0.0);
        let obs = 7usize.key();
        assert_eq!(table.get(&obs, 0), 0.0);
        assert_eq!(table.get(&obs, 2), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_injected_default() {
        let table = ValueTable::new(2, -1.5);
        assert_eq!(table.get(&().key(), 1), -1.5);
        assert_eq!(table.max_value(&().key()), -1.5);
    }

    #[test]
    fn test_set_get() {
        let mut table = ValueTable::new(3, 0.0);
        let obs = (1, 2).key();
        table.set(obs.clone(), 1, 2.5);
        assert_eq!(table.get(&obs, 1), 2.5);
        assert_eq!(table.get(&obs, 0), 0.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_greedy_action_first_max_wins() {
        let mut table = ValueTable::new(4, 0.0);
        let obs = 0usize.key();
        table.set(obs.clone(), 1, 1.0);
        table.set(obs.clone(), 3, 1.0);
        assert_eq!(table.greedy_action(&obs), 1);
        assert_eq!(table.greedy_action(&1usize.key()), 0);
    }

    #[test]
    fn test_max_value_with_negative_values() {
        let mut table = ValueTable::new(2, 0.0);
        let obs = 0usize.key();
        table.set(obs.clone(), 0, -3.0);
        table.set(obs.clone(), 1, -1.0);
        assert_eq!(table.max_value(&obs), -1.0);
        assert_eq!(table.greedy_action(&obs), 1);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut table = ValueTable::new(1, 0.0);
        for obs in [5usize, 2, 9] {
            table.set(obs.key(), 0, obs as f64);
        }
        let keys: Vec<&str> = table.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["5", "2", "9"]);
        table.clear();
        assert!(table.is_empty());
    }
}
