use std::collections::HashSet;

use indexmap::IndexMap;

use crate::types::{GroupedRow, MergedRow, ResolvedEntry, TargetHit};

/// A table row that can be folded into a [`GroupedRow`].
pub trait AnchorSources {
    fn query_gene(&self) -> &str;

    fn anchor_hit(&self) -> TargetHit;

    /// `None` for single-source rows.
    fn lifted_hit(&self) -> Option<TargetHit>;
}

impl AnchorSources for ResolvedEntry {
    fn query_gene(&self) -> &str {
        &self.query_gene
    }

    fn anchor_hit(&self) -> TargetHit {
        self.hit()
    }

    fn lifted_hit(&self) -> Option<TargetHit> {
        None
    }
}

impl AnchorSources for MergedRow {
    fn query_gene(&self) -> &str {
        &self.query_gene
    }

    fn anchor_hit(&self) -> TargetHit {
        self.anchor()
    }

    fn lifted_hit(&self) -> Option<TargetHit> {
        Some(self.lifted())
    }
}

/// Collapse rows into one [`GroupedRow`] per query gene.
///
/// - with a non-empty `query_filter`, rows for other query genes are dropped first
/// - groups appear in the order their query gene is first seen
/// - pairs whose target or chromosome is `NA`, `Unknown` or empty are left out
///
/// A query gene whose pairs are all filtered still gets a row, with empty lists.
pub fn aggregate<T: AnchorSources>(
    rows: &[T],
    query_filter: Option<&HashSet<String>>,
) -> Vec<GroupedRow> {
    let filter = query_filter.filter(|f| !f.is_empty());
    let mut groups: IndexMap<&str, GroupedRow> = IndexMap::new();

    for row in rows {
        let query = row.query_gene();
        if let Some(f) = filter {
            if !f.contains(query) {
                continue;
            }
        }

        let group = groups
            .entry(query)
            .or_insert_with(|| GroupedRow::new(query));

        push_located(&mut group.anchor_targets, &row.anchor_hit());
        if let Some(lifted) = row.lifted_hit() {
            push_located(&mut group.lifted_targets, &lifted);
        }
    }

    groups.into_values().collect()
}

fn push_located(list: &mut Vec<(String, String)>, hit: &TargetHit) {
    if let Some((gene, chr)) = hit.located_pair() {
        list.push((gene.to_string(), chr.to_string()));
    }
}
