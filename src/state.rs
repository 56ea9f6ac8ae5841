use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::FilterCriteria;
use crate::data::model::{Category, Dataset};
use crate::data::pipeline::{Selection, apply};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Where `dataset` came from.
    pub source: Option<String>,

    /// Current filter selection.
    pub criteria: FilterCriteria,

    /// Result of the pipeline for `criteria` (cached until criteria change).
    pub selection: Selection,

    /// Species colours for charts and filter labels.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source: None,
            criteria: FilterCriteria::default(),
            selection: Selection::Empty,
            color_map: ColorMap::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>, source: String) {
        self.criteria = FilterCriteria::for_dataset(&dataset);
        self.color_map = ColorMap::new(dataset.distinct(Category::Species));
        self.selection = apply(&dataset, &self.criteria);

        self.dataset = Some(dataset);
        self.source = Some(source);
        self.status_message = None;
    }

    /// Record a load failure for display.
    pub fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Re-run the pipeline after a criteria change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection = apply(ds, &self.criteria);
        }
    }

    /// Toggle a single value in a category's filter.
    pub fn toggle_filter_value(&mut self, category: Category, value: &str) {
        let selected = self.criteria.selected_mut(category);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every known value of a category.
    pub fn select_all(&mut self, category: Category) {
        if let Some(ds) = &self.dataset {
            *self.criteria.selected_mut(category) = ds.distinct(category).iter().cloned().collect();
            self.refilter();
        }
    }

    /// Clear a category's selection (no restriction).
    pub fn select_none(&mut self, category: Category) {
        self.criteria.selected_mut(category).clear();
        self.refilter();
    }

    /// Set the body-mass range, keeping `min <= max`.
    pub fn set_mass_range(&mut self, min: f64, max: f64) {
        self.criteria.mass_range = (min.min(max), max.max(min));
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Arc::new(sample_dataset()), "test".into());
        state
    }

    #[test]
    fn new_dataset_shows_everything() {
        let state = loaded();
        assert_eq!(state.selection.len(), sample_dataset().len());
        assert_eq!(state.criteria.mass_range, (3500.0, 5700.0));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn toggling_a_value_refilters() {
        let mut state = loaded();
        state.toggle_filter_value(Category::Species, "Gentoo");
        assert_eq!(state.selection.len(), 2);
        state.toggle_filter_value(Category::Species, "Gentoo");
        assert!(state.criteria.species.is_empty());
        assert_eq!(state.selection.len(), sample_dataset().len());
    }

    #[test]
    fn all_and_none_are_both_unrestricted() {
        let mut state = loaded();
        state.select_all(Category::Island);
        assert_eq!(state.criteria.island.len(), 3);
        assert_eq!(state.selection.len(), sample_dataset().len());
        state.select_none(Category::Island);
        assert!(state.criteria.island.is_empty());
        assert_eq!(state.selection.len(), sample_dataset().len());
    }

    #[test]
    fn empty_mass_window_is_an_empty_selection() {
        let mut state = loaded();
        state.set_mass_range(4000.0, 4100.0);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn mass_range_is_reordered() {
        let mut state = loaded();
        state.set_mass_range(5700.0, 4500.0);
        assert_eq!(state.criteria.mass_range, (4500.0, 5700.0));
        assert_eq!(state.selection.len(), 2);
    }
}
