use serde::Serialize;
use tracing::{debug, info};

use crate::core::alignment::{RecruitmentPoint, ScoredAlignment};
use crate::core::header::AlignmentHeaderInfo;
use crate::core::reference::ReferenceGenome;

/// Where the primary accession was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessionSource {
    /// First `@SQ` line of the SAM header
    AlignmentHeader,
    /// First entry of the reference FASTA
    ReferenceGenome,
}

/// The reference sequence whose alignments get plotted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryAccession {
    pub name: String,
    pub source: AccessionSource,
}

impl PrimaryAccession {
    /// Pick the first `@SQ` accession, falling back to the first FASTA entry's name.
    #[must_use]
    pub fn resolve(header: &AlignmentHeaderInfo, genome: &ReferenceGenome) -> Option<Self> {
        if let Some(accession) = header.primary_accession() {
            return Some(Self {
                name: accession.accession.clone(),
                source: AccessionSource::AlignmentHeader,
            });
        }

        let sequence = genome.primary()?;
        debug!(
            header = %sequence.header,
            "SAM header has no @SQ lines, using first FASTA entry"
        );
        Some(Self {
            name: sequence.name().to_string(),
            source: AccessionSource::ReferenceGenome,
        })
    }
}

/// Project scored alignments on `primary` to (position, percent identity)
/// points, keeping input order.
///
/// Alignments on other references are skipped.
#[must_use]
pub fn project(alignments: &[ScoredAlignment], primary: &str) -> Vec<RecruitmentPoint> {
    let points: Vec<RecruitmentPoint> = alignments
        .iter()
        .filter(|a| a.reference_name() == primary)
        .map(|a| RecruitmentPoint {
            position: a.record.position,
            percent_identity: a.percent_identity,
        })
        .collect();

    info!(
        primary,
        points = points.len(),
        other_references = alignments.len() - points.len(),
        "Projected recruitment points"
    );

    points
}
