use crate::index::AnnotationIndex;
use crate::types::{AnchorRecord, ResolvedEntry, UNKNOWN_CHROMOSOME};

/// Attach the target gene's chromosome to every anchor.
///
/// Targets missing from the index get [`UNKNOWN_CHROMOSOME`]. Order and
/// length of `records` are preserved.
pub fn resolve(records: &[AnchorRecord], index: &AnnotationIndex) -> Vec<ResolvedEntry> {
    records
        .iter()
        .map(|rec| {
            let chromosome = index
                .chromosome(&rec.target_gene)
                .unwrap_or(UNKNOWN_CHROMOSOME);
            ResolvedEntry::new(&rec.query_gene, &rec.target_gene, chromosome, &rec.score)
        })
        .collect()
}
