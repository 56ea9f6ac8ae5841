use std::sync::{Arc, OnceLock};
use std::time::Duration;

use super::loader::{self, DataSource, DataUnavailable};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Process-wide dataset cache
// ---------------------------------------------------------------------------

/// Holds the dataset once it has loaded successfully. Never invalidated.
///
/// Failures are not cached.
pub struct DatasetCache {
    cell: OnceLock<Arc<Dataset>>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// The cached dataset, if loaded.
    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.cell.get().cloned()
    }

    /// Return the cached dataset, running `load` only on the first success.
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<Dataset>, DataUnavailable>
    where
        F: FnOnce() -> Result<Dataset, DataUnavailable>,
    {
        if let Some(dataset) = self.cell.get() {
            log::debug!("Dataset cache hit");
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load()?);
        Ok(Arc::clone(self.cell.get_or_init(|| dataset)))
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

static DATASET: DatasetCache = DatasetCache::new();

/// Load the dataset for this process, fetching at most once.
pub fn load_once(source: &DataSource, timeout: Duration) -> Result<Arc<Dataset>, DataUnavailable> {
    DATASET.get_or_load(|| loader::load(source, timeout))
}
