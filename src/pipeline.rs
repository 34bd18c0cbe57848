use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::anchors::read_anchors_from_path;
use crate::annotation::AnnotationBuilder;
use crate::config::MapperConfig;
use crate::index::AnnotationIndex;
use crate::merge::merge;
use crate::resolve::resolve;
use crate::table::read_rows_from_path;
use crate::types::{GroupedRow, MergedRow, ResolvedEntry};

/// Build the gene -> chromosome index for `gff3` with the configured key and prefix rule.
pub fn load_index<P: AsRef<Path>>(gff3: P, cfg: &MapperConfig) -> Result<AnnotationIndex> {
    let gff3 = gff3.as_ref();
    let index = AnnotationBuilder::from_config(cfg)
        .build_from_path(gff3)
        .with_context(|| format!("build gene index from {}", gff3.display()))?;
    info!("{}", index);
    Ok(index)
}

/// Read an anchor file and attach target chromosomes.
pub fn resolve_anchors<P: AsRef<Path>>(
    anchors: P,
    index: &AnnotationIndex,
    cfg: &MapperConfig,
) -> Result<Vec<ResolvedEntry>> {
    let anchors = anchors.as_ref();
    let records = read_anchors_from_path(anchors, cfg.allowlist.as_ref())
        .with_context(|| format!("read anchors from {}", anchors.display()))?;
    let resolved = resolve(&records, index);

    let unknown = resolved
        .iter()
        .filter(|e| index.chromosome(&e.target_gene).is_none())
        .count();
    info!(
        "{}: {} anchors resolved, {} targets not in annotation",
        anchors.display(),
        resolved.len(),
        unknown
    );
    Ok(resolved)
}

/// Single anchor set against one annotation.
pub fn extract<A: AsRef<Path>, G: AsRef<Path>>(
    anchors: A,
    gff3: G,
    cfg: &MapperConfig,
) -> Result<Vec<ResolvedEntry>> {
    let index = load_index(gff3, cfg)?;
    resolve_anchors(anchors, &index, cfg)
}

/// Anchor and lifted-anchor sets resolved against one annotation and merged.
pub fn combine<A: AsRef<Path>, L: AsRef<Path>, G: AsRef<Path>>(
    anchors: A,
    lifted: L,
    gff3: G,
    cfg: &MapperConfig,
) -> Result<Vec<MergedRow>> {
    let index = load_index(gff3, cfg)?;
    let primary = resolve_anchors(anchors, &index, cfg)?;
    let lifted = resolve_anchors(lifted, &index, cfg)?;

    let merged = merge(&primary, &lifted);
    info!("merged into {} rows", merged.len());
    Ok(merged)
}

/// Group a table written by [`extract`] or [`combine`] by query gene.
pub fn group<P: AsRef<Path>>(
    table: P,
    query_filter: Option<&HashSet<String>>,
) -> Result<Vec<GroupedRow>> {
    let table = table.as_ref();
    let rows = read_rows_from_path(table)
        .with_context(|| format!("read table {}", table.display()))?;
    let grouped = rows.aggregate(query_filter);
    info!(
        "{}: {} rows grouped into {} query genes",
        table.display(),
        rows.len(),
        grouped.len()
    );
    Ok(grouped)
}
