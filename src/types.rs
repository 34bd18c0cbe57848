use serde::{Deserialize, Serialize};

/// Chromosome assigned to a target gene that is absent from the annotation index.
pub const UNKNOWN_CHROMOSOME: &str = "Unknown";

/// Padding value for positions that one anchor source does not cover.
pub const NOT_AVAILABLE: &str = "NA";

/// True for values the aggregator treats as "no data": merge padding,
/// unresolved chromosomes and empty cells.
#[inline]
pub fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == NOT_AVAILABLE || v == UNKNOWN_CHROMOSOME
}

/// One anchor line: query gene, target gene and an opaque score.
///
/// The score is kept exactly as written in the anchor file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchorRecord {
    pub query_gene: String,
    pub target_gene: String,
    pub score: String,
}

impl AnchorRecord {
    pub fn new(
        query_gene: impl Into<String>,
        target_gene: impl Into<String>,
        score: impl Into<String>,
    ) -> Self {
        Self {
            query_gene: query_gene.into(),
            target_gene: target_gene.into(),
            score: score.into(),
        }
    }
}

/// The per-source part of an anchor after chromosome lookup.
///
/// `TargetHit::padding()` is the `(NA, NA, NA)` triple used by the merger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetHit {
    pub target_gene: String,
    pub chromosome: String,
    pub score: String,
}

impl TargetHit {
    pub fn new(
        target_gene: impl Into<String>,
        chromosome: impl Into<String>,
        score: impl Into<String>,
    ) -> Self {
        Self {
            target_gene: target_gene.into(),
            chromosome: chromosome.into(),
            score: score.into(),
        }
    }

    pub fn padding() -> Self {
        Self::new(NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE)
    }

    /// `(target, chromosome)` when both are real values.
    pub fn located_pair(&self) -> Option<(&str, &str)> {
        if is_missing(&self.target_gene) || is_missing(&self.chromosome) {
            None
        } else {
            Some((self.target_gene.as_str(), self.chromosome.as_str()))
        }
    }
}

/// An anchor with its target chromosome attached.
///
/// Serialized with the single-source table header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedEntry {
    #[serde(rename = "Query_Gene")]
    pub query_gene: String,
    #[serde(rename = "Target_Gene")]
    pub target_gene: String,
    #[serde(rename = "Chromosome")]
    pub chromosome: String,
    #[serde(rename = "Score")]
    pub score: String,
}

impl ResolvedEntry {
    pub fn new(
        query_gene: impl Into<String>,
        target_gene: impl Into<String>,
        chromosome: impl Into<String>,
        score: impl Into<String>,
    ) -> Self {
        Self {
            query_gene: query_gene.into(),
            target_gene: target_gene.into(),
            chromosome: chromosome.into(),
            score: score.into(),
        }
    }

    pub fn hit(&self) -> TargetHit {
        TargetHit::new(&self.target_gene, &self.chromosome, &self.score)
    }
}

/// One positional pairing of a primary and a lifted anchor for a query gene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergedRow {
    #[serde(rename = "Query_Gene")]
    pub query_gene: String,
    #[serde(rename = "Target_Gene-Anchor")]
    pub anchor_target: String,
    #[serde(rename = "Chromosome-Anchor")]
    pub anchor_chromosome: String,
    #[serde(rename = "Score-Anchor")]
    pub anchor_score: String,
    #[serde(rename = "Target_Gene-LiftedAnchor")]
    pub lifted_target: String,
    #[serde(rename = "Chromosome-LiftedAnchor")]
    pub lifted_chromosome: String,
    #[serde(rename = "Score-LiftedAnchor")]
    pub lifted_score: String,
}

impl MergedRow {
    pub fn new(query_gene: impl Into<String>, anchor: TargetHit, lifted: TargetHit) -> Self {
        Self {
            query_gene: query_gene.into(),
            anchor_target: anchor.target_gene,
            anchor_chromosome: anchor.chromosome,
            anchor_score: anchor.score,
            lifted_target: lifted.target_gene,
            lifted_chromosome: lifted.chromosome,
            lifted_score: lifted.score,
        }
    }

    pub fn anchor(&self) -> TargetHit {
        TargetHit::new(&self.anchor_target, &self.anchor_chromosome, &self.anchor_score)
    }

    pub fn lifted(&self) -> TargetHit {
        TargetHit::new(&self.lifted_target, &self.lifted_chromosome, &self.lifted_score)
    }
}

/// All located targets of one query gene, per anchor source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupedRow {
    pub query_gene: String,
    pub anchor_targets: Vec<(String, String)>,
    pub lifted_targets: Vec<(String, String)>,
}

impl GroupedRow {
    pub fn new(query_gene: impl Into<String>) -> Self {
        Self {
            query_gene: query_gene.into(),
            ..Self::default()
        }
    }
}

/// Render a list of `(gene, chromosome)` pairs as `[('g1', 'chr1'), ('g2', 'chr2')]`.
pub fn format_pair_list(pairs: &[(String, String)]) -> String {
    let inner: Vec<String> = pairs
        .iter()
        .map(|(gene, chr)| format!("('{gene}', '{chr}')"))
        .collect();
    format!("[{}]", inner.join(", "))
}
