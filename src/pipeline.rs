//! End-to-end recruitment: summarize the reference, read the alignments, and
//! project the primary reference's alignments to plot coordinates.
//!
//! Each stage is a plain function over its own input; results are handed
//! forward as values.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::core::alignment::{RecruitmentPoint, ScoredAlignment};
use crate::core::cigar::CigarPolicy;
use crate::core::header::AlignmentHeaderInfo;
use crate::core::reference::ReferenceGenome;
use crate::matching::projector::{project, PrimaryAccession};
use crate::parsing::sam::{ParseError, ScoringStats};
use crate::parsing::{fasta, sam};

/// Inputs and options for one recruitment run
#[derive(Debug, Clone)]
pub struct RecruitmentConfig {
    /// FASTA reference genome, optionally gzip compressed
    pub reference: PathBuf,

    /// SAM alignment file with header
    pub alignments: PathBuf,

    pub cigar_policy: CigarPolicy,
}

impl RecruitmentConfig {
    pub fn new(reference: impl Into<PathBuf>, alignments: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            alignments: alignments.into(),
            cigar_policy: CigarPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_cigar_policy(mut self, policy: CigarPolicy) -> Self {
        self.cigar_policy = policy;
        self
    }
}

/// Everything produced by a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RecruitmentResult {
    pub genome: ReferenceGenome,
    pub header: AlignmentHeaderInfo,
    #[serde(skip)]
    pub alignments: Vec<ScoredAlignment>,
    pub stats: ScoringStats,
    pub primary_accession: PrimaryAccession,
    pub points: Vec<RecruitmentPoint>,
}

impl RecruitmentResult {
    /// Length of the plotted sequence: its `@SQ LN`, else its FASTA length
    #[must_use]
    pub fn primary_length(&self) -> Option<u64> {
        let name = self.primary_accession.name.as_str();
        self.header
            .reference_accessions
            .iter()
            .find(|a| a.accession == name)
            .map(|a| a.length)
            .or_else(|| self.genome.get(name).map(|s| s.length))
    }
}

/// Run the full pipeline.
///
/// Nothing is written to disk; callers persist the result if they need to.
///
/// # Errors
///
/// Returns `ParseError::InputNotFound`, `ParseError::UnreadableInput` or
/// `ParseError::UnsupportedFormat` for unusable inputs,
/// `ParseError::EmptyReferenceGenome` if the FASTA has no entries, and
/// `ParseError::Cigar` if the CIGAR policy rejects an operation.
pub fn run(config: &RecruitmentConfig) -> Result<RecruitmentResult, ParseError> {
    let genome = fasta::summarize_file(&config.reference)?;
    if genome.is_empty() {
        return Err(ParseError::EmptyReferenceGenome);
    }

    let contents = sam::parse_file(&config.alignments, config.cigar_policy)?;

    let primary_accession = PrimaryAccession::resolve(&contents.header, &genome)
        .ok_or(ParseError::EmptyReferenceGenome)?;
    info!(
        primary = %primary_accession.name,
        source = ?primary_accession.source,
        "Selected primary accession"
    );

    let points = project(&contents.alignments, &primary_accession.name);

    Ok(RecruitmentResult {
        genome,
        header: contents.header,
        alignments: contents.alignments,
        stats: contents.stats,
        primary_accession,
        points,
    })
}
