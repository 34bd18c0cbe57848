use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::AnchorError;

/// Minimum number of tab-separated columns in a GFF3 feature line.
pub const GFF_COLUMNS: usize = 9;

/// The columns of one GFF3 line that the gene index needs.
///
/// - `seqname`: column 1 (chromosome / contig)
/// - `feature_type`: column 3
/// - `attributes`: column 9, raw `key=value;key=value` text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRecord {
    pub seqname: String,
    pub feature_type: String,
    pub attributes: String,
    pub line_no: usize,
}

impl GeneRecord {
    pub fn is_gene(&self) -> bool {
        self.feature_type == "gene"
    }

    /// Value after the first `key=` in the attribute text that is followed
    /// by a non-empty run up to the next `;`.
    ///
    /// This is a plain substring search: `ID` also matches inside `Parent_ID=`,
    /// and the value is returned untrimmed.
    pub fn attr(&self, key: &str) -> Option<&str> {
        let needle = format!("{key}=");
        self.attributes
            .match_indices(needle.as_str())
            .find_map(|(at, _)| {
                let rest = &self.attributes[at + needle.len()..];
                rest.split(';').next().filter(|v| !v.is_empty())
            })
    }
}

/// Parse one line into a `GeneRecord`.
///
/// Returns `None` for comment lines and for lines with fewer than nine columns.
pub fn parse_record_line(line: &str, line_no: usize) -> Option<GeneRecord> {
    if line.starts_with('#') {
        return None;
    }
    let fields: Vec<&str> = line.trim().split('\t').collect();
    if fields.len() < GFF_COLUMNS {
        return None;
    }
    Some(GeneRecord {
        seqname: fields[0].to_string(),
        feature_type: fields[2].to_string(),
        attributes: fields[8].to_string(),
        line_no,
    })
}

/// Streaming reader over GFF3 feature lines.
///
/// Comment lines are skipped silently. Blank and short lines are skipped and
/// counted in [`AnnotationReader::skipped`].
///
/// ```
/// use std::io::Cursor;
/// use anchored_chromosome::annotation::AnnotationReader;
///
/// let gff = "##gff-version 3\nchr1\t.\tgene\t100\t200\t.\t+\t.\tID=geneA\n";
/// let mut rdr = AnnotationReader::new(Cursor::new(gff));
/// let recs: Vec<_> = rdr.by_ref().collect::<Result<_, _>>().unwrap();
/// assert_eq!(recs.len(), 1);
/// assert_eq!(recs[0].attr("ID"), Some("geneA"));
/// ```
pub struct AnnotationReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    skipped: usize,
}

impl<R: BufRead> AnnotationReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Number of non-comment lines dropped for having too few columns.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for AnnotationReader<R> {
    type Item = Result<GeneRecord, AnchorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => return Some(Err(AnchorError::io("<annotation>", e))),
            }

            if self.buf.starts_with('#') {
                continue;
            }
            match parse_record_line(&self.buf, self.line_no) {
                Some(rec) => return Some(Ok(rec)),
                None => self.skipped += 1,
            }
        }
    }
}

/// Open a text input as `BufRead`, decompressing `.gz` files on the fly.
pub fn open_text<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, AnchorError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnchorError::io(path.display().to_string(), e))?;

    let is_gz = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gz {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
