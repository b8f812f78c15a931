//! Offline construction of the cluster artifact.

use tracing::info;

use super::{summarize, ward_labels, ClusterIndex, ClusterResult};
use crate::ml::StandardScaler;
use crate::store::CatalogStore;

/// Default number of clusters.
pub const DEFAULT_CLUSTER_COUNT: usize = 60;

/// Standardize the catalog's features, run Ward clustering into `k` clusters
/// and summarize the result.
///
/// Offline only: the recommendation pipeline loads the saved artifact and
/// never calls this.
pub fn build_cluster_index(store: &CatalogStore, k: usize) -> ClusterResult<ClusterIndex> {
    let raw = store.features().view();
    let scaler = StandardScaler::fit(raw)?;
    let standardized = scaler.transform_rows(raw)?;

    let labels = ward_labels(standardized.view(), k)?;
    let summaries = summarize(store.records(), &labels, k)?;

    info!(medicines = store.len(), clusters = k, "built cluster index");
    ClusterIndex::new(summaries, store.len())
}
