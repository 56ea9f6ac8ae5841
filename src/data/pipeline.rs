use std::collections::BTreeMap;

use super::filter::{FilterCriteria, filtered_indices};
use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// Scalar summary over the filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub count: usize,
    /// Mean bill length, rounded to 1 decimal.
    pub avg_bill_length: f64,
    /// Mean body mass in kilograms, unrounded.
    pub avg_body_mass_kg: f64,
}

impl Metrics {
    /// Body mass with exactly two decimals, e.g. `"3.70"`.
    pub fn body_mass_kg_label(&self) -> String {
        format!("{:.2}", self.avg_body_mass_kg)
    }
}

/// Mean `body_mass_g` per species (1 decimal), ordered by species name.
pub type MassBySpecies = BTreeMap<String, f64>;

/// One scatter-plot point.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub bill_length_mm: f64,
    pub bill_depth_mm: f64,
    pub species: String,
}

/// Everything rendered for a non-empty selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Matching records, in dataset order.
    pub view: Vec<Record>,
    pub metrics: Metrics,
    pub mass_by_species: MassBySpecies,
    pub points: Vec<ChartPoint>,
}

/// Outcome of [`apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Nothing matched; no metrics are computed.
    Empty,
    Populated(Summary),
}

impl Selection {
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Selection::Empty => None,
            Selection::Populated(summary) => Some(summary),
        }
    }

    /// Number of matching records.
    pub fn len(&self) -> usize {
        self.summary().map_or(0, |s| s.view.len())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }
}

// ---------------------------------------------------------------------------
// Filter → aggregate
// ---------------------------------------------------------------------------

/// Filter `dataset` by `criteria` and summarise the matches.
pub fn apply(dataset: &Dataset, criteria: &FilterCriteria) -> Selection {
    let view: Vec<Record> = filtered_indices(dataset, criteria)
        .into_iter()
        .map(|i| dataset.records[i].clone())
        .collect();

    if view.is_empty() {
        return Selection::Empty;
    }

    let metrics = Metrics {
        count: view.len(),
        avg_bill_length: round1(mean(view.iter().map(|r| r.bill_length_mm))),
        avg_body_mass_kg: mean(view.iter().map(|r| r.body_mass_g)) / 1000.0,
    };

    let points = view
        .iter()
        .map(|r| ChartPoint {
            bill_length_mm: r.bill_length_mm,
            bill_depth_mm: r.bill_depth_mm,
            species: r.species.clone(),
        })
        .collect();

    Selection::Populated(Summary {
        mass_by_species: mass_by_species(&view),
        metrics,
        points,
        view,
    })
}

/// Group by species and average `body_mass_g`.
pub fn mass_by_species(view: &[Record]) -> MassBySpecies {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for rec in view {
        let entry = groups.entry(rec.species.as_str()).or_insert((0.0, 0));
        entry.0 += rec.body_mass_g;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(species, (total, n))| (species.to_string(), round1(total / n as f64)))
        .collect()
}

/// Round half away from zero to one decimal.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (total, n) = values.fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        total / n as f64
    }
}
