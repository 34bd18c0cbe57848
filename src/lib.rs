//! anchored_chromosome
//!
//! Maps syntenic gene anchors (query gene, target gene, score) onto the
//! chromosomes of the target genome, using the `gene` features of a GFF3
//! annotation. Two anchor sets (for example anchors and lifted-over anchors)
//! can be merged per query gene and the result grouped into one row per
//! query gene.

pub mod anchors;
pub mod annotation;
pub mod config;
pub mod error;
pub mod group;
pub mod index;
pub mod merge;
pub mod pipeline;
pub mod resolve;
pub mod table;
pub mod types;

pub use annotation::AnnotationBuilder;
pub use config::{GeneIdKey, MapperConfig, PrefixStrip};
pub use error::AnchorError;
pub use index::AnnotationIndex;

pub use anchors::{read_anchors, read_gene_list};
pub use group::{aggregate, AnchorSources};
pub use merge::merge;
pub use resolve::resolve;

pub use types::{
    AnchorRecord, GroupedRow, MergedRow, ResolvedEntry, TargetHit, NOT_AVAILABLE,
    UNKNOWN_CHROMOSOME,
};
