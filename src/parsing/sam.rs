use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::alignment::{AlignmentRecord, ScoredAlignment};
use crate::core::cigar::{CigarError, CigarPolicy, CigarScore};
use crate::core::header::{AlignmentHeaderInfo, ReferenceAccession, ToolInfo};
use crate::utils::validation::open_input;

/// Fields an alignment line must carry: `QNAME` through `SEQ`
const MIN_ALIGNMENT_FIELDS: usize = 10;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Cannot read {}: {source}", .path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed header line {line}: {reason}")]
    MalformedHeaderLine { line: usize, reason: String },

    #[error("Malformed alignment record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Reference genome contains no sequences (no '>' header lines)")]
    EmptyReferenceGenome,

    #[error(transparent)]
    Cigar(#[from] CigarError),
}

impl ParseError {
    /// Attach the input path to a bare I/O error
    #[must_use]
    pub fn at_path(self, path: &Path) -> Self {
        match self {
            Self::Io(source) => Self::UnreadableInput {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

/// Counts of what happened to each alignment line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoringStats {
    pub records: usize,
    pub retained: usize,
    pub below_threshold: usize,
    pub no_alignable_bases: usize,
    pub invalid_cigar: usize,
    pub malformed_records: usize,
    pub malformed_header_lines: usize,
}

impl ScoringStats {
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.records - self.retained
    }
}

/// Everything recruitment needs from one SAM file
#[derive(Debug, Clone, Default)]
pub struct SamContents {
    pub header: AlignmentHeaderInfo,
    pub alignments: Vec<ScoredAlignment>,
    pub stats: ScoringStats,
}

/// Split a header line into its record type and `TAG:value` pairs.
///
/// Fields without a colon are dropped.
fn header_fields<'a>(line: &'a str) -> (&'a str, impl Iterator<Item = (&'a str, &'a str)> + 'a) {
    let mut fields = line.split('\t');
    let record_type = fields.next().unwrap_or("");
    (record_type, fields.filter_map(|f| f.split_once(':')))
}

fn parse_sq_line(line: &str, line_num: usize) -> Result<ReferenceAccession, ParseError> {
    let (_, fields) = header_fields(line);
    let mut name: Option<&str> = None;
    let mut length: Option<&str> = None;

    for (tag, value) in fields {
        match tag {
            "SN" => name = Some(value),
            "LN" => length = Some(value),
            _ => {}
        }
    }

    let malformed = |reason: String| ParseError::MalformedHeaderLine {
        line: line_num,
        reason,
    };

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| malformed("@SQ line missing SN tag".to_string()))?;
    let length = length.ok_or_else(|| malformed(format!("@SQ {name} missing LN tag")))?;
    let length: u64 = length
        .parse()
        .map_err(|_| malformed(format!("@SQ {name} has invalid LN '{length}'")))?;

    Ok(ReferenceAccession::new(name, length))
}

fn parse_pg_line(line: &str, line_num: usize) -> Result<ToolInfo, ParseError> {
    let (_, fields) = header_fields(line);
    let mut id: Option<&str> = None;
    let mut version: Option<&str> = None;

    for (tag, value) in fields {
        match tag {
            "ID" => id = Some(value),
            "VN" => version = Some(value),
            _ => {}
        }
    }

    match (id, version) {
        (Some(name), Some(version)) => Ok(ToolInfo {
            name: name.to_string(),
            version: version.to_string(),
        }),
        (None, _) => Err(ParseError::MalformedHeaderLine {
            line: line_num,
            reason: "@PG line missing ID tag".to_string(),
        }),
        (Some(name), None) => Err(ParseError::MalformedHeaderLine {
            line: line_num,
            reason: format!("@PG {name} missing VN tag"),
        }),
    }
}

/// Accumulates `@SQ` and `@PG` lines into an [`AlignmentHeaderInfo`]
#[derive(Debug, Default)]
struct HeaderReconciler {
    info: AlignmentHeaderInfo,
    malformed: usize,
}

impl HeaderReconciler {
    /// Feed one `@` line. Malformed `@SQ`/`@PG` lines are skipped with a warning.
    fn push(&mut self, line: &str, line_num: usize) {
        let (record_type, _) = header_fields(line);

        let result = match record_type {
            "@SQ" => parse_sq_line(line, line_num)
                .map(|accession| self.info.reference_accessions.push(accession)),
            "@PG" => parse_pg_line(line, line_num).map(|tool| {
                if let Some(previous) = self.info.tool.replace(tool) {
                    debug!(
                        previous = %previous.name,
                        "Multiple @PG lines, keeping the last"
                    );
                }
            }),
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.malformed += 1;
            warn!("{e}, skipping");
        }
    }

    fn finish(self) -> (AlignmentHeaderInfo, usize) {
        (self.info, self.malformed)
    }
}

/// Parse header metadata from raw SAM header text.
///
/// Lines not starting with `@` are ignored. Malformed `@SQ`/`@PG` lines are
/// skipped and logged, never fatal.
#[must_use]
pub fn parse_header_text(text: &str) -> AlignmentHeaderInfo {
    let mut reconciler = HeaderReconciler::default();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.starts_with('@') {
            reconciler.push(line, i + 1);
        }
    }
    reconciler.finish().0
}

/// Copy the recruitment fields out of one tab-delimited alignment line
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` when the line has fewer than ten
/// fields or `FLAG`, `POS` or `MAPQ` is not an integer.
pub fn parse_alignment_line(line: &str, line_num: usize) -> Result<AlignmentRecord, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();

    let malformed = |reason: String| ParseError::MalformedRecord {
        line: line_num,
        reason,
    };

    if fields.len() < MIN_ALIGNMENT_FIELDS {
        return Err(malformed(format!(
            "expected at least {MIN_ALIGNMENT_FIELDS} fields, found {}",
            fields.len()
        )));
    }

    let flag: u16 = fields[1]
        .parse()
        .map_err(|_| malformed(format!("invalid FLAG '{}'", fields[1])))?;
    let position: u64 = fields[3]
        .parse()
        .map_err(|_| malformed(format!("invalid POS '{}'", fields[3])))?;
    let mapping_quality: u8 = fields[4]
        .parse()
        .map_err(|_| malformed(format!("invalid MAPQ '{}'", fields[4])))?;

    Ok(AlignmentRecord {
        read_name: fields[0].to_string(),
        flag,
        reference_name: fields[2].to_string(),
        position,
        mapping_quality,
        cigar: fields[5].to_string(),
        sequence: fields[9].to_string(),
    })
}

/// Parse and score one alignment line.
///
/// Returns `Ok(None)` when the alignment is not longer than the minimum length.
///
/// # Errors
///
/// Returns `ParseError::MalformedRecord` for unparseable lines and
/// `ParseError::Cigar` when the CIGAR cannot be scored.
pub fn score_alignment_line(
    line: &str,
    line_num: usize,
    policy: CigarPolicy,
) -> Result<Option<ScoredAlignment>, ParseError> {
    let record = parse_alignment_line(line, line_num)?;
    let score = CigarScore::compute(&record.cigar, policy)?;
    Ok(ScoredAlignment::from_score(record, &score))
}

/// Read a SAM stream in one pass, reconciling the header and scoring every
/// alignment line.
///
/// # Errors
///
/// Returns `ParseError::Io` if reading fails, or `ParseError::Cigar` with
/// `CigarError::UnsupportedCigarOperation` when `policy` is
/// [`CigarPolicy::Reject`] and such an operation is found. All other per-line
/// problems are logged and counted in [`ScoringStats`].
pub fn read_sam<R: BufRead>(reader: R, policy: CigarPolicy) -> Result<SamContents, ParseError> {
    let mut reconciler = HeaderReconciler::default();
    let mut alignments = Vec::new();
    let mut stats = ScoringStats::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        let line_num = i + 1;

        if line.is_empty() {
            continue;
        }

        if line.starts_with('@') {
            reconciler.push(line, line_num);
            continue;
        }

        stats.records += 1;
        match score_alignment_line(line, line_num, policy) {
            Ok(Some(scored)) => {
                stats.retained += 1;
                alignments.push(scored);
            }
            Ok(None) => stats.below_threshold += 1,
            Err(ParseError::Cigar(CigarError::NoAlignableBases(cigar))) => {
                stats.no_alignable_bases += 1;
                debug!(line = line_num, cigar = %cigar, "No alignable bases, dropping record");
            }
            Err(ParseError::Cigar(e @ CigarError::InvalidCigar { .. })) => {
                stats.invalid_cigar += 1;
                warn!(line = line_num, "{e}, dropping record");
            }
            Err(e @ ParseError::MalformedRecord { .. }) => {
                stats.malformed_records += 1;
                warn!("{e}, skipping");
            }
            Err(e) => return Err(e),
        }
    }

    let (header, malformed_header_lines) = reconciler.finish();
    stats.malformed_header_lines = malformed_header_lines;

    if stats.no_alignable_bases > 0 {
        warn!(
            count = stats.no_alignable_bases,
            "Dropped records with no alignable bases (unmapped reads?)"
        );
    }
    info!(
        accessions = header.reference_accessions.len(),
        records = stats.records,
        retained = stats.retained,
        dropped = stats.dropped(),
        "Scored alignments"
    );

    Ok(SamContents {
        header,
        alignments,
        stats,
    })
}

/// Parse a SAM file from disk
///
/// # Errors
///
/// Returns `ParseError::InputNotFound` or `ParseError::UnreadableInput` if the
/// file cannot be opened or read, plus anything [`read_sam`] returns.
pub fn parse_file(path: &Path, policy: CigarPolicy) -> Result<SamContents, ParseError> {
    let file = open_input(path)?;
    read_sam(BufReader::new(file), policy).map_err(|e| e.at_path(path))
}
