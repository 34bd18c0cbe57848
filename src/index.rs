use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Gene identifier -> chromosome identifier.
///
/// Built once from an annotation file by [`crate::annotation::AnnotationBuilder`]
/// and read-only afterwards. Inserting an id twice keeps the last chromosome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationIndex {
    gene_to_chr: HashMap<String, String>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, gene_id: impl Into<String>, chr: impl Into<String>) {
        self.gene_to_chr.insert(gene_id.into(), chr.into());
    }

    /// Chromosome of a gene, if the gene was annotated.
    pub fn chromosome(&self, gene_id: &str) -> Option<&str> {
        self.gene_to_chr.get(gene_id).map(|s| s.as_str())
    }

    pub fn contains(&self, gene_id: &str) -> bool {
        self.gene_to_chr.contains_key(gene_id)
    }

    pub fn len(&self) -> usize {
        self.gene_to_chr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gene_to_chr.is_empty()
    }

    /// Number of indexed genes per chromosome, sorted by chromosome name.
    pub fn genes_per_chromosome(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for chr in self.gene_to_chr.values() {
            *counts.entry(chr.as_str()).or_default() += 1;
        }
        counts
    }
}

impl<G: Into<String>, C: Into<String>> FromIterator<(G, C)> for AnnotationIndex {
    fn from_iter<I: IntoIterator<Item = (G, C)>>(iter: I) -> Self {
        let mut idx = AnnotationIndex::new();
        for (g, c) in iter {
            idx.insert(g, c);
        }
        idx
    }
}

/// Human-readable summary for logs:
///
/// ```text
/// AnnotationIndex: 3 genes on 2 chromosomes
///   - chr1: 2 genes
///   - chr2: 1 genes
/// ```
impl fmt::Display for AnnotationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_chr = self.genes_per_chromosome();
        write!(
            f,
            "AnnotationIndex: {} genes on {} chromosomes",
            self.len(),
            per_chr.len()
        )?;
        for (chr, n) in per_chr {
            write!(f, "\n  - {}: {} genes", chr, n)?;
        }
        Ok(())
    }
}
