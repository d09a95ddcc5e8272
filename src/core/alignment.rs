use serde::{Deserialize, Serialize};

use crate::core::cigar::CigarScore;

/// The SAM fields recruitment needs, copied from one alignment line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub read_name: String,
    pub flag: u16,
    pub reference_name: String,
    /// 1-based leftmost mapping position
    pub position: u64,
    pub mapping_quality: u8,
    pub cigar: String,
    pub sequence: String,
}

/// An alignment record that survived CIGAR scoring and the length filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAlignment {
    #[serde(flatten)]
    pub record: AlignmentRecord,
    pub alignment_length: i64,
    pub percent_identity: f64,
}

impl ScoredAlignment {
    /// Attach a score to a record, or `None` if it fails the length filter
    #[must_use]
    pub fn from_score(record: AlignmentRecord, score: &CigarScore) -> Option<Self> {
        if !score.passes_length_filter() {
            return None;
        }
        Some(Self {
            record,
            alignment_length: score.alignment_length,
            percent_identity: score.percent_identity,
        })
    }

    #[must_use]
    pub fn reference_name(&self) -> &str {
        &self.record.reference_name
    }
}

/// One plot point: genome position (X) against percent identity (Y)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecruitmentPoint {
    pub position: u64,
    pub percent_identity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cigar::CigarPolicy;

    fn record(cigar: &str) -> AlignmentRecord {
        AlignmentRecord {
            read_name: "read1".to_string(),
            flag: 0,
            reference_name: "chr1".to_string(),
            position: 100,
            mapping_quality: 60,
            cigar: cigar.to_string(),
            sequence: "ACGT".to_string(),
        }
    }

    #[test]
    fn test_from_score_filters_short() {
        let score = CigarScore::compute("10M10S", CigarPolicy::Ignore).unwrap();
        assert!(ScoredAlignment::from_score(record("10M10S"), &score).is_none());

        let score = CigarScore::compute("50M5D10M", CigarPolicy::Ignore).unwrap();
        let scored = ScoredAlignment::from_score(record("50M5D10M"), &score).unwrap();
        assert_eq!(scored.alignment_length, 55);
        assert_eq!(scored.reference_name(), "chr1");
    }
}
