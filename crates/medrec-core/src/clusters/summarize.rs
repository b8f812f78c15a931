//! Summarizing a cluster labeling into per-cluster statistics.

use std::collections::{BTreeMap, HashSet};

use super::{ClusterError, ClusterResult};
use crate::models::{ClusterSummary, MedicineRecord, UNKNOWN_CLASS};

/// Number of member names kept per cluster.
pub const SAMPLE_SIZE: usize = 3;

/// Summarize `labels[i]` (cluster of record `i`) into `k` cluster summaries.
///
/// Summaries are ordered by size descending, then cluster id ascending. Every
/// id in `0..k` gets a summary, including empty clusters.
pub fn summarize(
    records: &[MedicineRecord],
    labels: &[usize],
    k: usize,
) -> ClusterResult<Vec<ClusterSummary>> {
    if labels.len() != records.len() {
        return Err(ClusterError::LabelCount {
            labels: labels.len(),
            records: records.len(),
        });
    }
    if let Some(&bad) = labels.iter().find(|&&l| l >= k) {
        return Err(ClusterError::LabelOutOfRange { label: bad, k });
    }

    let mut members: Vec<Vec<&MedicineRecord>> = vec![Vec::new(); k];
    for (record, &label) in records.iter().zip(labels) {
        members[label].push(record);
    }

    let mut summaries: Vec<ClusterSummary> = members
        .iter()
        .enumerate()
        .map(|(cluster_id, records)| ClusterSummary {
            cluster_id,
            size: records.len(),
            primary_class: primary_class(records),
            n_classes: records
                .iter()
                .map(|r| r.therapeutic_class.as_str())
                .collect::<HashSet<_>>()
                .len(),
            sample_medicines: records
                .iter()
                .take(SAMPLE_SIZE)
                .map(|r| r.name.clone())
                .collect(),
        })
        .collect();

    summaries.sort_by(|a, b| b.size.cmp(&a.size).then(a.cluster_id.cmp(&b.cluster_id)));
    Ok(summaries)
}

/// Mode of member classes; ties go to the lexicographically smallest name.
fn primary_class(records: &[&MedicineRecord]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.therapeutic_class.as_str()).or_default() += 1;
    }

    // BTreeMap iterates in name order; keep the first maximum
    let mut best: Option<(&str, usize)> = None;
    for (class, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((class, count));
        }
    }

    best.map(|(class, _)| class.to_string())
        .unwrap_or_else(|| UNKNOWN_CLASS.to_string())
}
