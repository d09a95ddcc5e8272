//! CIGAR interpretation for recruitment scoring.
//!
//! Only `M`, `D`, `I`, `N` and `S` take part in scoring. `M` lengths count as
//! matches; `D`, `I`, `N` and `S` lengths count as edits. The remaining SAM
//! operations (`H`, `P`, `=`, `X`) are handled according to [`CigarPolicy`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Alignments must be strictly longer than this to be retained.
pub const MIN_ALIGNMENT_LENGTH: i64 = 30;

/// Largest operation length SAM allows (BAM stores it in 28 bits)
pub const MAX_OP_LENGTH: u64 = (1 << 28) - 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarError {
    #[error("CIGAR '{0}' has no alignable bases (no M/D/I/N/S length)")]
    NoAlignableBases(String),

    #[error("Unsupported CIGAR operation '{op}' in '{cigar}'")]
    UnsupportedCigarOperation { op: char, cigar: String },

    #[error("Invalid CIGAR '{cigar}': {reason}")]
    InvalidCigar { cigar: String, reason: String },
}

/// What to do with CIGAR operations outside M/D/I/N/S
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CigarPolicy {
    /// Skip `H`, `P`, `=` and `X` without counting them
    #[default]
    Ignore,
    /// Treat `H`, `P`, `=` and `X` as a format error
    Reject,
}

/// A single CIGAR operation code
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CigarOp {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Padding,
    SequenceMatch,
    SequenceMismatch,
}

impl CigarOp {
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'M' => Some(Self::Match),
            'I' => Some(Self::Insertion),
            'D' => Some(Self::Deletion),
            'N' => Some(Self::Skip),
            'S' => Some(Self::SoftClip),
            'H' => Some(Self::HardClip),
            'P' => Some(Self::Padding),
            '=' => Some(Self::SequenceMatch),
            'X' => Some(Self::SequenceMismatch),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Match => 'M',
            Self::Insertion => 'I',
            Self::Deletion => 'D',
            Self::Skip => 'N',
            Self::SoftClip => 'S',
            Self::HardClip => 'H',
            Self::Padding => 'P',
            Self::SequenceMatch => '=',
            Self::SequenceMismatch => 'X',
        }
    }

    /// Whether this operation takes part in recruitment scoring
    #[must_use]
    pub const fn is_scored(self) -> bool {
        matches!(
            self,
            Self::Match | Self::Insertion | Self::Deletion | Self::Skip | Self::SoftClip
        )
    }

    #[must_use]
    pub const fn is_edit(self) -> bool {
        matches!(
            self,
            Self::Insertion | Self::Deletion | Self::Skip | Self::SoftClip
        )
    }
}

/// Split a CIGAR string into `(length, op)` pairs.
///
/// `*` (CIGAR unavailable) yields no operations.
///
/// # Errors
///
/// Returns `CigarError::InvalidCigar` for unknown operation codes, operations
/// without a length, lengths above [`MAX_OP_LENGTH`], or trailing digits.
pub fn parse_cigar(cigar: &str) -> Result<Vec<(u64, CigarOp)>, CigarError> {
    let invalid = |reason: String| CigarError::InvalidCigar {
        cigar: cigar.to_string(),
        reason,
    };

    if cigar == "*" {
        return Ok(Vec::new());
    }

    let mut ops = Vec::new();
    let mut length: Option<u64> = None;

    for c in cigar.chars() {
        if let Some(digit) = c.to_digit(10) {
            let current = length.unwrap_or(0);
            let next = current
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or_else(|| invalid("operation length overflows".to_string()))?;
            length = Some(next);
            continue;
        }

        let op = CigarOp::from_char(c)
            .ok_or_else(|| invalid(format!("unknown operation '{c}'")))?;
        let len = length
            .take()
            .ok_or_else(|| invalid(format!("operation '{c}' has no length")))?;
        if len > MAX_OP_LENGTH {
            return Err(invalid(format!(
                "operation length {len} exceeds maximum of {MAX_OP_LENGTH}"
            )));
        }
        ops.push((len, op));
    }

    if length.is_some() {
        return Err(invalid("trailing length without operation".to_string()));
    }

    Ok(ops)
}

/// Match and edit totals for one CIGAR string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CigarTally {
    pub match_count: u64,
    pub edit_count: u64,
}

impl CigarTally {
    /// Tally the scored operations of a CIGAR string.
    ///
    /// # Errors
    ///
    /// Returns `CigarError::InvalidCigar` if the string cannot be parsed, or
    /// `CigarError::UnsupportedCigarOperation` when `policy` is
    /// [`CigarPolicy::Reject`] and an `H`, `P`, `=` or `X` operation is present.
    pub fn from_cigar(cigar: &str, policy: CigarPolicy) -> Result<Self, CigarError> {
        let mut tally = Self::default();

        for (len, op) in parse_cigar(cigar)? {
            if !op.is_scored() {
                match policy {
                    CigarPolicy::Ignore => continue,
                    CigarPolicy::Reject => {
                        return Err(CigarError::UnsupportedCigarOperation {
                            op: op.to_char(),
                            cigar: cigar.to_string(),
                        })
                    }
                }
            }

            if op.is_edit() {
                tally.edit_count = tally.edit_count.saturating_add(len);
            } else {
                tally.match_count = tally.match_count.saturating_add(len);
            }
        }

        Ok(tally)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.match_count.saturating_add(self.edit_count)
    }

    /// Matches minus edits. Inserted and clipped bases reduce the length.
    #[must_use]
    pub fn alignment_length(&self) -> i64 {
        let matches = i64::try_from(self.match_count).unwrap_or(i64::MAX);
        let edits = i64::try_from(self.edit_count).unwrap_or(i64::MAX);
        matches.saturating_sub(edits)
    }

    /// `100 * matches / (matches + edits)`, always within `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns `CigarError::NoAlignableBases` when there are no matches or edits.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_identity(&self, cigar: &str) -> Result<f64, CigarError> {
        let total = self.total();
        if total == 0 {
            return Err(CigarError::NoAlignableBases(cigar.to_string()));
        }
        Ok(100.0 * (self.match_count as f64 / total as f64))
    }
}

/// Alignment length and percent identity derived from a CIGAR string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CigarScore {
    pub tally: CigarTally,
    pub alignment_length: i64,
    pub percent_identity: f64,
}

impl CigarScore {
    /// # Errors
    ///
    /// Propagates any [`CigarError`] from tallying, and returns
    /// `CigarError::NoAlignableBases` when nothing scorable remains.
    pub fn compute(cigar: &str, policy: CigarPolicy) -> Result<Self, CigarError> {
        let tally = CigarTally::from_cigar(cigar, policy)?;
        let percent_identity = tally.percent_identity(cigar)?;
        Ok(Self {
            tally,
            alignment_length: tally.alignment_length(),
            percent_identity,
        })
    }

    #[must_use]
    pub fn passes_length_filter(&self) -> bool {
        self.alignment_length > MIN_ALIGNMENT_LENGTH
    }
}
