use std::io::BufRead;
use std::path::Path;

use log::debug;

use crate::annotation::io::{open_text, AnnotationReader};
use crate::config::{GeneIdKey, MapperConfig, PrefixStrip};
use crate::error::AnchorError;
use crate::index::AnnotationIndex;

/// Builds an [`AnnotationIndex`] from a GFF3 file.
///
/// - only `gene` features are indexed
/// - the gene id comes from the configured attribute key (`gene_id` or `ID`)
/// - an optional literal prefix is removed from the id
/// - lines without the key are ignored
#[derive(Debug, Clone, Default)]
pub struct AnnotationBuilder {
    pub gene_id_key: GeneIdKey,
    pub strip: PrefixStrip,
}

impl AnnotationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take key and strip rule from a pipeline configuration.
    pub fn from_config(cfg: &MapperConfig) -> Self {
        Self {
            gene_id_key: cfg.gene_id_key,
            strip: cfg.strip.clone(),
        }
    }

    pub fn gene_id_key(mut self, key: GeneIdKey) -> Self {
        self.gene_id_key = key;
        self
    }

    pub fn strip(mut self, strip: PrefixStrip) -> Self {
        self.strip = strip;
        self
    }

    /// Build the index from anything implementing `BufRead`.
    pub fn build_from_reader<R: BufRead>(&self, reader: R) -> Result<AnnotationIndex, AnchorError> {
        let key = self.gene_id_key.as_str();
        let mut idx = AnnotationIndex::new();
        let mut genes_seen = 0usize;
        let mut without_id = 0usize;

        let mut rdr = AnnotationReader::new(reader);
        for rec in rdr.by_ref() {
            let rec = rec?;
            if !rec.is_gene() {
                continue;
            }
            genes_seen += 1;

            let Some(raw_id) = rec.attr(key) else {
                without_id += 1;
                continue;
            };
            let gene_id = self.strip.apply(raw_id).to_string();
            idx.insert(gene_id, rec.seqname);
        }

        debug!(
            "annotation: {} gene features, {} without '{}', {} short lines skipped, {} unique ids",
            genes_seen,
            without_id,
            key,
            rdr.skipped(),
            idx.len()
        );
        Ok(idx)
    }

    /// Build the index from a file path; `.gz` files are decompressed.
    pub fn build_from_path<P: AsRef<Path>>(&self, path: P) -> Result<AnnotationIndex, AnchorError> {
        let path = path.as_ref();
        let reader = open_text(path)?;
        self.build_from_reader(reader).map_err(|e| e.with_path(path))
    }
}
