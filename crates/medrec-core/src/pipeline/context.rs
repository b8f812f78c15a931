//! Read-only data shared by every call.

use tracing::info;

use crate::clusters::ClusterIndex;
use crate::config::DataConfig;
use crate::store::CatalogStore;

use super::PipelineResult;

/// Catalog, features and clusters, loaded once by `initialize`.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    store: CatalogStore,
    clusters: ClusterIndex,
}

impl PipelineContext {
    pub fn new(store: CatalogStore, clusters: ClusterIndex) -> Self {
        Self { store, clusters }
    }

    /// Load the required artifacts named in `data`.
    ///
    /// Fails when a file is missing or malformed, when features are not
    /// aligned with the catalog, or when cluster sizes do not add up to the
    /// catalog size.
    pub fn load(data: &DataConfig) -> PipelineResult<Self> {
        let store = CatalogStore::load(&data.catalog_path, &data.features_path)?;
        let clusters = ClusterIndex::load(&data.clusters_path, store.len())?;
        info!(
            medicines = store.len(),
            feature_width = store.features().width(),
            clusters = clusters.len(),
            "pipeline data loaded"
        );
        Ok(Self { store, clusters })
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn clusters(&self) -> &ClusterIndex {
        &self.clusters
    }
}
