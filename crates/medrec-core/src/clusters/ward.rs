//! Ward-linkage agglomerative clustering, cut into a fixed number of groups.
//!
//! The dendrogram comes from `kodama` over a condensed matrix of euclidean
//! distances. O(n²) memory, meant for offline use only.

use kodama::{linkage, Method};
use ndarray::ArrayView2;

use super::{ClusterError, ClusterResult};

/// Upper-triangular pairwise distances in `(0,1), (0,2), .., (n-2,n-1)` order.
fn condensed_distances(points: ArrayView2<'_, f64>) -> Vec<f64> {
    let n = points.nrows();
    let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let diff = &points.row(i) - &points.row(j);
            condensed.push(diff.dot(&diff).sqrt());
        }
    }
    condensed
}

/// Cluster the rows of `points` into exactly `k` groups with Ward linkage.
///
/// Returns one label per row in `0..k`, numbered by first appearance in
/// row order.
pub fn ward_labels(points: ArrayView2<'_, f64>, k: usize) -> ClusterResult<Vec<usize>> {
    let n = points.nrows();
    if k == 0 || k > n {
        return Err(ClusterError::InvalidK { k, n });
    }

    let mut parent: Vec<usize> = (0..n).collect();
    if k < n {
        let mut condensed = condensed_distances(points);
        let dendrogram = linkage(&mut condensed, n, Method::Ward);

        // Step i creates node n + i; remember one member point per node
        let mut member: Vec<usize> = (0..n).collect();
        for step in dendrogram.steps().iter().take(n - k) {
            let a = find(&mut parent, member[step.cluster1]);
            let b = find(&mut parent, member[step.cluster2]);
            let root = a.min(b);
            parent[a.max(b)] = root;
            member.push(root);
        }
    }

    let mut labels = vec![0usize; n];
    let mut root_label: Vec<Option<usize>> = vec![None; n];
    let mut next = 0;
    for (i, label) in labels.iter_mut().enumerate() {
        let root = find(&mut parent, i);
        *label = *root_label[root].get_or_insert_with(|| {
            next += 1;
            next - 1
        });
    }

    Ok(labels)
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}
