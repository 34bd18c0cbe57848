//! End-to-end runs over files on disk: extract, combine, group.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

use anchored_chromosome::pipeline;
use anchored_chromosome::table::{
    read_rows_from_path, write_grouped, write_merged, write_resolved, write_to_path, TableRows,
};
use anchored_chromosome::{GeneIdKey, MapperConfig, PrefixStrip, ResolvedEntry};

const GFF3: &str = "\
##gff-version 3
#!genome-build Sbicolor v3
chr01\tensembl\tgene\t1000\t5000\t.\t+\t.\tID=gene:Sb01g000100;biotype=protein_coding;gene_id=Sb01g000100
chr01\tensembl\tmRNA\t1000\t5000\t.\t+\t.\tID=transcript:Sb01g000100.1;Parent=gene:Sb01g000100
chr02\tensembl\tgene\t2000\t9000\t.\t-\t.\tID=gene:Sb02g000200;gene_id=Sb02g000200
chr03\tensembl\tgene\t100\t900\t.\t+\t.\tID=gene:Sb03g000300;gene_id=Sb03g000300
chr03\tensembl\tgene
";

const ANCHORS: &str = "\
#query\ttarget\tscore
Zm00001eb000010\tSb01g000100\t3512
Zm00001eb000010\tSb03g000300\t1200
Zm00001eb000020\tSb02g000200\t980
Zm00001eb000030\tSb09g999999\t100
short line
";

const LIFTED: &str = "\
Zm00001eb000010\tSb02g000200\t15
Zm00001eb000040\tSb03g000300\t7
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fx = Fixture {
            dir: TempDir::new().unwrap(),
        };
        fx.write("sb.gff3", GFF3);
        fx.write("zm_sb.anchors", ANCHORS);
        fx.write("zm_sb.lifted.anchors", LIFTED);
        fx
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, text: &str) -> PathBuf {
        let p = self.path(name);
        fs::write(&p, text).unwrap();
        p
    }
}

fn located(rows: &[(&str, &str)]) -> Vec<(String, String)> {
    rows.iter().map(|(g, c)| (g.to_string(), c.to_string())).collect()
}

#[test]
fn extract_resolves_every_anchor_line() {
    let fx = Fixture::new();
    let cfg = MapperConfig::new().gene_id_key(GeneIdKey::GeneId);

    let rows = pipeline::extract(fx.path("zm_sb.anchors"), fx.path("sb.gff3"), &cfg).unwrap();

    assert_eq!(
        rows,
        vec![
            ResolvedEntry::new("Zm00001eb000010", "Sb01g000100", "chr01", "3512"),
            ResolvedEntry::new("Zm00001eb000010", "Sb03g000300", "chr03", "1200"),
            ResolvedEntry::new("Zm00001eb000020", "Sb02g000200", "chr02", "980"),
            ResolvedEntry::new("Zm00001eb000030", "Sb09g999999", "Unknown", "100"),
        ]
    );
}

#[test]
fn extract_with_id_key_needs_prefix_strip() {
    let fx = Fixture::new();

    let raw = MapperConfig::new().gene_id_key(GeneIdKey::Id);
    let rows = pipeline::extract(fx.path("zm_sb.anchors"), fx.path("sb.gff3"), &raw).unwrap();
    assert!(rows.iter().all(|r| r.chromosome == "Unknown"));

    let stripped = MapperConfig::new()
        .gene_id_key(GeneIdKey::Id)
        .strip(PrefixStrip::GenePrefix);
    let rows = pipeline::extract(fx.path("zm_sb.anchors"), fx.path("sb.gff3"), &stripped).unwrap();
    assert_eq!(rows[0].chromosome, "chr01");
}

#[test]
fn extract_honours_query_gene_allowlist() {
    let fx = Fixture::new();
    let allow: HashSet<String> = ["Zm00001eb000020".to_string()].into_iter().collect();
    let cfg = MapperConfig::new().allowlist(allow);

    let rows = pipeline::extract(fx.path("zm_sb.anchors"), fx.path("sb.gff3"), &cfg).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].query_gene, "Zm00001eb000020");
}

#[test]
fn gzipped_annotation_is_read() {
    let fx = Fixture::new();
    let gz_path = fx.path("sb.gff3.gz");
    let mut enc = GzEncoder::new(fs::File::create(&gz_path).unwrap(), Compression::default());
    enc.write_all(GFF3.as_bytes()).unwrap();
    enc.finish().unwrap();

    let rows = pipeline::extract(fx.path("zm_sb.anchors"), &gz_path, &MapperConfig::new()).unwrap();
    assert_eq!(rows[2].chromosome, "chr02");
}

#[test]
fn missing_input_is_fatal() {
    let fx = Fixture::new();
    let err = pipeline::extract(fx.path("nope.anchors"), fx.path("sb.gff3"), &MapperConfig::new())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("nope.anchors"));

    let err = pipeline::extract(fx.path("zm_sb.anchors"), fx.path("nope.gff3"), &MapperConfig::new())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("nope.gff3"));
}

#[test]
fn combine_then_group_round_trip_through_tsv() {
    let fx = Fixture::new();
    let cfg = MapperConfig::new();

    let merged = pipeline::combine(
        fx.path("zm_sb.anchors"),
        fx.path("zm_sb.lifted.anchors"),
        fx.path("sb.gff3"),
        &cfg,
    )
    .unwrap();

    // q10: 2 anchors vs 1 lifted, q20: 1 vs 0, q30: 1 vs 0, q40: 0 vs 1
    let queries: Vec<&str> = merged.iter().map(|r| r.query_gene.as_str()).collect();
    assert_eq!(
        queries,
        vec![
            "Zm00001eb000010",
            "Zm00001eb000010",
            "Zm00001eb000020",
            "Zm00001eb000030",
            "Zm00001eb000040",
        ]
    );
    assert_eq!(merged[1].lifted_target, "NA");
    assert_eq!(merged[4].anchor_target, "NA");
    assert_eq!(merged[4].lifted_chromosome, "chr03");

    let table = fx.path("combined.tsv");
    write_to_path(&table, |w| write_merged(w, &merged)).unwrap();

    let grouped = pipeline::group(&table, None).unwrap();
    assert_eq!(grouped.len(), 4);

    assert_eq!(
        grouped[0].anchor_targets,
        located(&[("Sb01g000100", "chr01"), ("Sb03g000300", "chr03")])
    );
    assert_eq!(grouped[0].lifted_targets, located(&[("Sb02g000200", "chr02")]));
    // the unresolved target of q30 is dropped
    assert!(grouped[2].anchor_targets.is_empty());
    assert_eq!(grouped[3].lifted_targets, located(&[("Sb03g000300", "chr03")]));

    let out = fx.path("grouped.tsv");
    write_to_path(&out, |w| write_grouped(w, &grouped)).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    let first = text.lines().nth(1).unwrap();
    assert_eq!(
        first,
        "Zm00001eb000010\t[('Sb01g000100', 'chr01'), ('Sb03g000300', 'chr03')]\t[('Sb02g000200', 'chr02')]"
    );
}

#[test]
fn group_filters_query_genes() {
    let fx = Fixture::new();
    let rows = pipeline::extract(fx.path("zm_sb.anchors"), fx.path("sb.gff3"), &MapperConfig::new())
        .unwrap();

    let table = fx.path("single.tsv");
    write_to_path(&table, |w| write_resolved(w, &rows)).unwrap();
    assert!(matches!(read_rows_from_path(&table).unwrap(), TableRows::Resolved(_)));

    let keep: HashSet<String> = ["Zm00001eb000010".to_string()].into_iter().collect();
    let grouped = pipeline::group(&table, Some(&keep)).unwrap();
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].anchor_targets.len(), 2);
    assert!(grouped[0].lifted_targets.is_empty());
}

#[test]
fn group_rejects_unrelated_tables() {
    let fx = Fixture::new();
    let p = fx.write("other.tsv", "gene\tvalue\ng1\t3\n");
    assert!(pipeline::group(&p, None).is_err());
}
