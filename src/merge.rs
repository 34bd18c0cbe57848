use std::collections::{BTreeMap, BTreeSet};

use crate::types::{MergedRow, ResolvedEntry, TargetHit};

/// Targets per query gene, each list in input order. Keys iterate sorted.
pub fn group_by_query(entries: &[ResolvedEntry]) -> BTreeMap<&str, Vec<TargetHit>> {
    let mut groups: BTreeMap<&str, Vec<TargetHit>> = BTreeMap::new();
    for e in entries {
        groups.entry(e.query_gene.as_str()).or_default().push(e.hit());
    }
    groups
}

/// Combine a primary and a lifted anchor set into one table.
///
/// Query genes are emitted in sorted order. Within a query gene the i-th
/// primary hit is paired with the i-th lifted hit; the shorter side is padded
/// with `(NA, NA, NA)`. Pairing is by rank only, target ids are not compared.
///
/// ```
/// use anchored_chromosome::merge::merge;
/// use anchored_chromosome::types::ResolvedEntry;
///
/// let primary = vec![ResolvedEntry::new("geneA", "geneB", "chr2", "95")];
/// let rows = merge(&primary, &[]);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].lifted_target, "NA");
/// ```
pub fn merge(primary: &[ResolvedEntry], lifted: &[ResolvedEntry]) -> Vec<MergedRow> {
    let mut primary_groups = group_by_query(primary);
    let mut lifted_groups = group_by_query(lifted);

    let queries: BTreeSet<&str> = primary_groups
        .keys()
        .chain(lifted_groups.keys())
        .copied()
        .collect();

    let mut out = Vec::with_capacity(primary.len().max(lifted.len()));
    for query in queries {
        let anchors = primary_groups.remove(query).unwrap_or_default();
        let lifts = lifted_groups.remove(query).unwrap_or_default();
        let n = anchors.len().max(lifts.len());

        let mut anchors = anchors.into_iter();
        let mut lifts = lifts.into_iter();
        for _ in 0..n {
            out.push(MergedRow::new(
                query,
                anchors.next().unwrap_or_else(TargetHit::padding),
                lifts.next().unwrap_or_else(TargetHit::padding),
            ));
        }
    }
    out
}
