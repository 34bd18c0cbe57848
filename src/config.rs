use std::collections::HashSet;
use std::fmt;

use log::warn;

/// Attribute key holding the gene identifier in column 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneIdKey {
    /// `gene_id=...`
    #[default]
    GeneId,
    /// `ID=...`
    Id,
}

impl GeneIdKey {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneIdKey::GeneId => "gene_id",
            GeneIdKey::Id => "ID",
        }
    }

    /// Parse a user-supplied key.
    ///
    /// Anything other than `gene_id` or `ID` falls back to `gene_id`
    /// with a warning; blank input silently selects the default.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "gene_id" => GeneIdKey::GeneId,
            "ID" => GeneIdKey::Id,
            "" => GeneIdKey::default(),
            other => {
                warn!(
                    "Unrecognized gene identifier key '{}'; using default: {}",
                    other,
                    GeneIdKey::default()
                );
                GeneIdKey::default()
            }
        }
    }
}

impl fmt::Display for GeneIdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix removed from extracted gene ids before indexing.
///
/// Removal is literal: the prefix is stripped only when the id starts
/// with exactly that string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PrefixStrip {
    #[default]
    None,
    /// The Ensembl-style `gene:` prefix.
    GenePrefix,
    Custom(String),
}

impl PrefixStrip {
    pub const GENE_PREFIX: &'static str = "gene:";

    /// Build from an optional user value; blank strings mean no stripping.
    pub fn from_option(prefix: Option<&str>) -> Self {
        match prefix {
            Some(p) if !p.is_empty() => {
                if p == Self::GENE_PREFIX {
                    PrefixStrip::GenePrefix
                } else {
                    PrefixStrip::Custom(p.to_string())
                }
            }
            _ => PrefixStrip::None,
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        match self {
            PrefixStrip::None => None,
            PrefixStrip::GenePrefix => Some(Self::GENE_PREFIX),
            PrefixStrip::Custom(p) if p.is_empty() => None,
            PrefixStrip::Custom(p) => Some(p.as_str()),
        }
    }

    pub fn apply<'a>(&self, gene_id: &'a str) -> &'a str {
        match self.prefix() {
            Some(p) => gene_id.strip_prefix(p).unwrap_or(gene_id),
            None => gene_id,
        }
    }
}

/// Settings shared by the `extract` and `combine` pipelines.
///
/// Assembled up front (from flags or prompts) and handed to the pipeline
/// as a finished value.
#[derive(Debug, Clone, Default)]
pub struct MapperConfig {
    pub gene_id_key: GeneIdKey,
    pub strip: PrefixStrip,
    pub allowlist: Option<HashSet<String>>,
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gene_id_key(mut self, key: GeneIdKey) -> Self {
        self.gene_id_key = key;
        self
    }

    pub fn strip(mut self, strip: PrefixStrip) -> Self {
        self.strip = strip;
        self
    }

    /// Restrict anchors to these query genes. An empty set disables filtering.
    pub fn allowlist(mut self, genes: HashSet<String>) -> Self {
        self.allowlist = if genes.is_empty() { None } else { Some(genes) };
        self
    }
}
