use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use log::debug;

use crate::annotation::io::open_text;
use crate::error::AnchorError;
use crate::types::AnchorRecord;

/// Parse one anchor line: `query target score [ignored...]`.
///
/// Returns `None` for comments and lines with fewer than three tokens.
pub fn parse_anchor_line(line: &str) -> Option<AnchorRecord> {
    if line.starts_with('#') {
        return None;
    }
    let mut it = line.split_whitespace();
    let query = it.next()?;
    let target = it.next()?;
    let score = it.next()?;
    Some(AnchorRecord::new(query, target, score))
}

/// Streaming reader over an anchor file, in file order.
///
/// Short lines are skipped and counted; comments are skipped silently.
pub struct AnchorReader<R: BufRead> {
    reader: R,
    buf: String,
    skipped: usize,
}

impl<R: BufRead> AnchorReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            skipped: 0,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for AnchorReader<R> {
    type Item = Result<AnchorRecord, AnchorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(AnchorError::io("<anchors>", e))),
            }

            if self.buf.starts_with('#') {
                continue;
            }
            match parse_anchor_line(&self.buf) {
                Some(rec) => return Some(Ok(rec)),
                None => self.skipped += 1,
            }
        }
    }
}

/// Read all anchors, keeping only query genes in `allowlist` when one is given.
///
/// Duplicate anchors are kept.
pub fn read_anchors<R: BufRead>(
    reader: R,
    allowlist: Option<&HashSet<String>>,
) -> Result<Vec<AnchorRecord>, AnchorError> {
    let mut out = Vec::new();
    let mut filtered = 0usize;

    let mut rdr = AnchorReader::new(reader);
    for rec in rdr.by_ref() {
        let rec = rec?;
        if let Some(allow) = allowlist {
            if !allow.contains(&rec.query_gene) {
                filtered += 1;
                continue;
            }
        }
        out.push(rec);
    }

    debug!(
        "anchors: {} kept, {} outside query list, {} short lines skipped",
        out.len(),
        filtered,
        rdr.skipped()
    );
    Ok(out)
}

pub fn read_anchors_from_path<P: AsRef<Path>>(
    path: P,
    allowlist: Option<&HashSet<String>>,
) -> Result<Vec<AnchorRecord>, AnchorError> {
    let path = path.as_ref();
    let reader = open_text(path)?;
    read_anchors(reader, allowlist).map_err(|e| e.with_path(path))
}

/// Read a gene list: one identifier per line, blank lines ignored.
pub fn read_gene_list<R: BufRead>(reader: R) -> Result<HashSet<String>, AnchorError> {
    let mut genes = HashSet::new();
    for line in reader.lines() {
        let line = line.map_err(|e| AnchorError::io("<gene list>", e))?;
        let gene = line.trim();
        if !gene.is_empty() {
            genes.insert(gene.to_string());
        }
    }
    Ok(genes)
}

pub fn read_gene_list_from_path<P: AsRef<Path>>(path: P) -> Result<HashSet<String>, AnchorError> {
    let path = path.as_ref();
    let reader = open_text(path)?;
    read_gene_list(reader).map_err(|e| e.with_path(path))
}
