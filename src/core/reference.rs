use serde::{Deserialize, Serialize};

/// One FASTA entry: its header line and residue count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSequence {
    /// Header line as it appears in the FASTA, including the leading `>`
    pub header: String,

    /// Number of residues between this header and the next
    pub length: u64,
}

impl ReferenceSequence {
    pub fn new(header: impl Into<String>, length: u64) -> Self {
        Self {
            header: header.into(),
            length,
        }
    }

    /// Sequence name: header text after `>` up to the first whitespace.
    ///
    /// This is the form SAM `RNAME` and `@SQ SN:` values take.
    #[must_use]
    pub fn name(&self) -> &str {
        let text = self.header.strip_prefix('>').unwrap_or(&self.header);
        text.split_whitespace().next().unwrap_or("")
    }

    /// Header text without the leading `>` (organism/description line)
    #[must_use]
    pub fn description(&self) -> &str {
        self.header.strip_prefix('>').unwrap_or(&self.header).trim()
    }
}

/// Summary of a reference genome FASTA
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceGenome {
    /// Entries in file order; zero-length entries are kept
    pub sequences: Vec<ReferenceSequence>,

    /// Sum of all residues, including any before the first header
    pub total_length: u64,

    /// Number of header lines seen
    pub molecule_count: usize,

    /// Residues found before the first header (malformed input)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unassigned_length: u64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl ReferenceGenome {
    #[must_use]
    pub fn new(sequences: Vec<ReferenceSequence>, unassigned_length: u64) -> Self {
        let total_length = sequences
            .iter()
            .map(|s| s.length)
            .sum::<u64>()
            .saturating_add(unassigned_length);
        let molecule_count = sequences.len();

        Self {
            sequences,
            total_length,
            molecule_count,
            unassigned_length,
        }
    }

    /// The first entry, treated as the main chromosome of interest
    #[must_use]
    pub fn primary(&self) -> Option<&ReferenceSequence> {
        self.sequences.first()
    }

    #[must_use]
    pub fn secondary(&self) -> &[ReferenceSequence] {
        self.sequences.get(1..).unwrap_or(&[])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Find an entry by sequence name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReferenceSequence> {
        self.sequences.iter().find(|s| s.name() == name)
    }
}
