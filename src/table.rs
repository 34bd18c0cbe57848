//! Tab-separated output tables and the reader used by the `group` step.
//!
//! Three shapes are written, each with a header row:
//! - resolved: `Query_Gene Target_Gene Chromosome Score`
//! - merged: query gene plus target/chromosome/score for anchor and lifted anchor
//! - grouped: query gene plus one `[('gene', 'chr'), ...]` list per source

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::debug;

use crate::annotation::io::open_text;
use crate::error::AnchorError;
use crate::group::aggregate;
use crate::types::{
    format_pair_list, GroupedRow, MergedRow, ResolvedEntry, TargetHit, NOT_AVAILABLE,
};

pub const QUERY_GENE: &str = "Query_Gene";

pub const RESOLVED_HEADER: [&str; 4] = [QUERY_GENE, "Target_Gene", "Chromosome", "Score"];

pub const MERGED_HEADER: [&str; 7] = [
    QUERY_GENE,
    "Target_Gene-Anchor",
    "Chromosome-Anchor",
    "Score-Anchor",
    "Target_Gene-LiftedAnchor",
    "Chromosome-LiftedAnchor",
    "Score-LiftedAnchor",
];

pub const GROUPED_HEADER: [&str; 3] = [QUERY_GENE, "Target_Gene-Anchor", "Target_Gene-LiftedAnchor"];

fn tsv_writer<W: Write>(w: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(w)
}

pub fn write_resolved<W: Write>(w: W, rows: &[ResolvedEntry]) -> Result<()> {
    let mut wtr = tsv_writer(w);
    wtr.write_record(RESOLVED_HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_merged<W: Write>(w: W, rows: &[MergedRow]) -> Result<()> {
    let mut wtr = tsv_writer(w);
    wtr.write_record(MERGED_HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_grouped<W: Write>(w: W, rows: &[GroupedRow]) -> Result<()> {
    let mut wtr = tsv_writer(w);
    wtr.write_record(GROUPED_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.query_gene.as_str(),
            format_pair_list(&row.anchor_targets).as_str(),
            format_pair_list(&row.lifted_targets).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Create `path` and hand a buffered writer to `write`.
pub fn write_to_path<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(BufWriter<File>) -> Result<()>,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create output {}", path.display()))?;
    write(BufWriter::new(file)).with_context(|| format!("write table {}", path.display()))
}

/// Rows loaded back from a table written by `extract` or `combine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRows {
    Resolved(Vec<ResolvedEntry>),
    Merged(Vec<MergedRow>),
}

impl TableRows {
    pub fn len(&self) -> usize {
        match self {
            TableRows::Resolved(rows) => rows.len(),
            TableRows::Merged(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn aggregate(&self, query_filter: Option<&HashSet<String>>) -> Vec<GroupedRow> {
        match self {
            TableRows::Resolved(rows) => aggregate(rows, query_filter),
            TableRows::Merged(rows) => aggregate(rows, query_filter),
        }
    }
}

struct Columns {
    names: StringRecord,
}

impl Columns {
    fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h.trim() == name)
    }

    fn require(&self, name: &str, source: &str) -> Result<usize, AnchorError> {
        self.find(name)
            .ok_or_else(|| AnchorError::table(source, format!("missing column {}", name)))
    }
}

fn cell<'r>(rec: &'r StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| rec.get(i)).unwrap_or("")
}

/// Read a resolved or merged table; the shape is chosen from the header.
///
/// Score columns are optional. Short rows read their missing cells as empty,
/// which the aggregator treats as missing.
pub fn read_rows<R: Read>(reader: R, source: &str) -> Result<TableRows> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let cols = Columns {
        names: rdr.headers().with_context(|| format!("read header of {}", source))?.clone(),
    };
    let query = cols.require(QUERY_GENE, source)?;

    if cols.find(MERGED_HEADER[1]).is_some() {
        let a_target = cols.require(MERGED_HEADER[1], source)?;
        let a_chr = cols.require(MERGED_HEADER[2], source)?;
        let a_score = cols.find(MERGED_HEADER[3]);
        let l_target = cols.require(MERGED_HEADER[4], source)?;
        let l_chr = cols.require(MERGED_HEADER[5], source)?;
        let l_score = cols.find(MERGED_HEADER[6]);

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec.with_context(|| format!("read row of {}", source))?;
            let score = |idx: Option<usize>| match idx {
                Some(_) => cell(&rec, idx).to_string(),
                None => NOT_AVAILABLE.to_string(),
            };
            rows.push(MergedRow::new(
                cell(&rec, Some(query)),
                TargetHit::new(cell(&rec, Some(a_target)), cell(&rec, Some(a_chr)), score(a_score)),
                TargetHit::new(cell(&rec, Some(l_target)), cell(&rec, Some(l_chr)), score(l_score)),
            ));
        }
        debug!("{}: {} merged rows", source, rows.len());
        return Ok(TableRows::Merged(rows));
    }

    let target = cols.require(RESOLVED_HEADER[1], source)?;
    let chr = cols.require(RESOLVED_HEADER[2], source)?;
    let score = cols.find(RESOLVED_HEADER[3]);

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec.with_context(|| format!("read row of {}", source))?;
        rows.push(ResolvedEntry::new(
            cell(&rec, Some(query)),
            cell(&rec, Some(target)),
            cell(&rec, Some(chr)),
            cell(&rec, score),
        ));
    }
    debug!("{}: {} resolved rows", source, rows.len());
    Ok(TableRows::Resolved(rows))
}

pub fn read_rows_from_path<P: AsRef<Path>>(path: P) -> Result<TableRows> {
    let path = path.as_ref();
    let reader = open_text(path)?;
    read_rows(reader, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn as_text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn resolved_table_has_header_and_rows() {
        let mut buf = Vec::new();
        write_resolved(
            &mut buf,
            &[ResolvedEntry::new("geneA", "geneB", "chr2", "95")],
        )
        .unwrap();
        assert_eq!(
            as_text(buf),
            "Query_Gene\tTarget_Gene\tChromosome\tScore\ngeneA\tgeneB\tchr2\t95\n"
        );
    }

    #[test]
    fn empty_tables_still_have_a_header() {
        let mut buf = Vec::new();
        write_merged(&mut buf, &[]).unwrap();
        assert_eq!(
            as_text(buf),
            "Query_Gene\tTarget_Gene-Anchor\tChromosome-Anchor\tScore-Anchor\t\
             Target_Gene-LiftedAnchor\tChromosome-LiftedAnchor\tScore-LiftedAnchor\n"
        );
    }

    #[test]
    fn merged_table_row_layout() {
        let mut buf = Vec::new();
        write_merged(
            &mut buf,
            &[MergedRow::new(
                "geneA",
                TargetHit::new("geneB", "chr2", "95"),
                TargetHit::padding(),
            )],
        )
        .unwrap();
        let text = as_text(buf);
        assert_eq!(
            text.lines().nth(1),
            Some("geneA\tgeneB\tchr2\t95\tNA\tNA\tNA")
        );
    }

    #[test]
    fn grouped_table_lists() {
        let mut row = GroupedRow::new("geneA");
        row.anchor_targets = vec![
            ("geneB".into(), "chr2".into()),
            ("geneC".into(), "chr3".into()),
        ];
        let mut buf = Vec::new();
        write_grouped(&mut buf, &[row]).unwrap();
        assert_eq!(
            as_text(buf),
            "Query_Gene\tTarget_Gene-Anchor\tTarget_Gene-LiftedAnchor\n\
             geneA\t[('geneB', 'chr2'), ('geneC', 'chr3')]\t[]\n"
        );
    }

    #[test]
    fn reads_merged_table_back() {
        let rows = vec![
            MergedRow::new("q1", TargetHit::new("t1", "chr1", "10"), TargetHit::padding()),
            MergedRow::new("q2", TargetHit::padding(), TargetHit::new("t2", "chr2", "20")),
        ];
        let mut buf = Vec::new();
        write_merged(&mut buf, &rows).unwrap();

        let back = read_rows(Cursor::new(buf), "merged.tsv").unwrap();
        assert_eq!(back, TableRows::Merged(rows));
    }

    #[test]
    fn reads_resolved_table_back() {
        let rows = vec![
            ResolvedEntry::new("q1", "t1", "chr1", "10"),
            ResolvedEntry::new("q1", "t2", "Unknown", "11"),
        ];
        let mut buf = Vec::new();
        write_resolved(&mut buf, &rows).unwrap();

        let back = read_rows(Cursor::new(buf), "resolved.tsv").unwrap();
        assert_eq!(back.len(), 2);
        let grouped = back.aggregate(None);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].anchor_targets, vec![("t1".to_string(), "chr1".to_string())]);
    }

    #[test]
    fn short_rows_and_missing_scores_are_tolerated() {
        let text = "\
Query_Gene\tTarget_Gene-Anchor\tChromosome-Anchor\tTarget_Gene-LiftedAnchor\tChromosome-LiftedAnchor
q1\tt1\tchr1\tt2\tchr2
q1\tt3\tchr3
";
        let rows = read_rows(Cursor::new(text), "short.tsv").unwrap();
        let TableRows::Merged(rows) = rows else {
            panic!("expected merged rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].anchor_score, "NA");
        assert_eq!(rows[1].lifted_target, "");

        let grouped = TableRows::Merged(rows).aggregate(None);
        assert_eq!(grouped[0].anchor_targets.len(), 2);
        assert_eq!(grouped[0].lifted_targets.len(), 1);
    }

    #[test]
    fn missing_query_column_is_an_error() {
        let err = read_rows(Cursor::new("Gene\tTarget_Gene\tChromosome\n"), "bad.tsv").unwrap_err();
        assert!(err.to_string().contains("Query_Gene"));
    }
}
