use std::collections::BTreeSet;

use super::model::{Category, Dataset, Record};

// ---------------------------------------------------------------------------
// FilterCriteria – the user's current selection
// ---------------------------------------------------------------------------

/// Per-category value sets plus an inclusive body-mass range.
///
/// An empty set means "no restriction" for that category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub species: BTreeSet<String>,
    pub island: BTreeSet<String>,
    pub sex: BTreeSet<String>,
    /// Inclusive `(min, max)` of `body_mass_g`.
    pub mass_range: (f64, f64),
}

impl FilterCriteria {
    /// No categorical restriction, mass range = observed bounds.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            mass_range: dataset.mass_bounds().unwrap_or((0.0, 0.0)),
            ..Self::default()
        }
    }

    pub fn selected(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::Species => &self.species,
            Category::Island => &self.island,
            Category::Sex => &self.sex,
        }
    }

    pub fn selected_mut(&mut self, category: Category) -> &mut BTreeSet<String> {
        match category {
            Category::Species => &mut self.species,
            Category::Island => &mut self.island,
            Category::Sex => &mut self.sex,
        }
    }

    /// Whether `record` satisfies every clause.
    ///
    /// * empty category set → passes that clause
    /// * otherwise the record's value must be in the set
    /// * `body_mass_g` must lie within `mass_range`, always checked
    pub fn matches(&self, record: &Record) -> bool {
        let categories_pass = Category::ALL.iter().all(|&category| {
            let selected = self.selected(category);
            selected.is_empty() || selected.contains(record.category(category))
        });
        let (lo, hi) = self.mass_range;
        categories_pass && lo <= record.body_mass_g && record.body_mass_g <= hi
    }
}

/// Return indices of records that pass all clauses, in dataset order.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
