use std::collections::BTreeMap;

use serde::Serialize;

/// Columns every source table must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "species",
    "island",
    "sex",
    "bill_length_mm",
    "bill_depth_mm",
    "body_mass_g",
];

// ---------------------------------------------------------------------------
// Category – the three categorical columns users can filter on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Species,
    Island,
    Sex,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Species, Category::Island, Category::Sex];

    /// Source column name.
    pub fn column(self) -> &'static str {
        match self {
            Category::Species => "species",
            Category::Island => "island",
            Category::Sex => "sex",
        }
    }

    /// Label of the filter widget.
    pub fn label(self) -> &'static str {
        match self {
            Category::Species => "Select Species",
            Category::Island => "Select Island",
            Category::Sex => "Select Sex",
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single penguin observation. Never contains a missing value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub species: String,
    pub island: String,
    pub sex: String,
    pub bill_length_mm: f64,
    pub bill_depth_mm: f64,
    pub body_mass_g: f64,
    /// Columns the pipeline ignores (e.g. `flipper_length_mm`, `year`), kept
    /// as source text for the raw-data table.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Value of a categorical column.
    pub fn category(&self, category: Category) -> &str {
        match category {
            Category::Species => &self.species,
            Category::Island => &self.island,
            Category::Sex => &self.sex,
        }
    }

    /// Display text of any column, typed or extra.
    pub fn cell(&self, column: &str) -> String {
        match column {
            "species" => self.species.clone(),
            "island" => self.island.clone(),
            "sex" => self.sex.clone(),
            "bill_length_mm" => self.bill_length_mm.to_string(),
            "bill_depth_mm" => self.bill_depth_mm.to_string(),
            "body_mass_g" => self.body_mass_g.to_string(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete cleaned table
// ---------------------------------------------------------------------------

/// The cleaned dataset with pre-computed distinct values per category.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Column names in source order (typed and extra).
    pub column_names: Vec<String>,
    /// For each category the distinct values in first-seen order.
    pub distinct_values: BTreeMap<Category, Vec<String>>,
}

impl Dataset {
    /// Build the category index from the cleaned records.
    pub fn from_records(records: Vec<Record>, column_names: Vec<String>) -> Self {
        let mut distinct_values: BTreeMap<Category, Vec<String>> = BTreeMap::new();

        for category in Category::ALL {
            let values = distinct_values.entry(category).or_default();
            for rec in &records {
                let value = rec.category(category);
                if !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            }
        }

        Dataset {
            records,
            column_names,
            distinct_values,
        }
    }

    /// Distinct values of a category, first-seen order.
    pub fn distinct(&self, category: Category) -> &[String] {
        self.distinct_values
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Observed `[min, max]` of `body_mass_g`, `None` when empty.
    pub fn mass_bounds(&self) -> Option<(f64, f64)> {
        self.records.iter().map(|r| r.body_mass_g).fold(None, |acc, m| {
            Some(match acc {
                None => (m, m),
                Some((lo, hi)) => (lo.min(m), hi.max(m)),
            })
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn record(
        species: &str,
        island: &str,
        sex: &str,
        bill_length_mm: f64,
        bill_depth_mm: f64,
        body_mass_g: f64,
    ) -> Record {
        Record {
            species: species.into(),
            island: island.into(),
            sex: sex.into(),
            bill_length_mm,
            bill_depth_mm,
            body_mass_g,
            extra: BTreeMap::new(),
        }
    }

    pub(crate) fn columns() -> Vec<String> {
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    /// A handful of rows shaped like the real penguins table.
    pub(crate) fn sample_dataset() -> Dataset {
        Dataset::from_records(
            vec![
                record("Adelie", "Torgersen", "male", 39.1, 18.7, 3750.0),
                record("Adelie", "Torgersen", "female", 39.5, 17.4, 3800.0),
                record("Gentoo", "Biscoe", "female", 46.1, 13.2, 4500.0),
                record("Chinstrap", "Dream", "female", 46.5, 17.9, 3500.0),
                record("Gentoo", "Biscoe", "male", 50.0, 16.3, 5700.0),
                record("Adelie", "Dream", "male", 37.2, 18.1, 3900.0),
                record("Chinstrap", "Dream", "male", 50.0, 19.5, 3900.0),
            ],
            columns(),
        )
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let ds = sample_dataset();
        assert_eq!(ds.distinct(Category::Species), ["Adelie", "Gentoo", "Chinstrap"]);
        assert_eq!(ds.distinct(Category::Island), ["Torgersen", "Biscoe", "Dream"]);
        assert_eq!(ds.distinct(Category::Sex), ["male", "female"]);
    }

    #[test]
    fn mass_bounds_span_observed_values() {
        assert_eq!(sample_dataset().mass_bounds(), Some((3500.0, 5700.0)));
        assert_eq!(Dataset::from_records(Vec::new(), columns()).mass_bounds(), None);
    }

    #[test]
    fn cell_renders_typed_and_extra_columns() {
        let mut rec = record("Adelie", "Torgersen", "male", 39.1, 18.7, 3750.0);
        rec.extra.insert("year".into(), "2007".into());
        assert_eq!(rec.cell("bill_length_mm"), "39.1");
        assert_eq!(rec.cell("body_mass_g"), "3750");
        assert_eq!(rec.cell("year"), "2007");
        assert_eq!(rec.cell("unknown"), "");
    }
}
