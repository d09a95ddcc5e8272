use serde::{Deserialize, Serialize};

/// A reference sequence declared by an `@SQ` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAccession {
    /// `SN` tag
    pub accession: String,

    /// `LN` tag
    pub length: u64,
}

impl ReferenceAccession {
    pub fn new(accession: impl Into<String>, length: u64) -> Self {
        Self {
            accession: accession.into(),
            length,
        }
    }
}

/// Aligner identity from a `@PG` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// `ID` tag
    pub name: String,

    /// `VN` tag
    pub version: String,
}

/// Metadata reconciled from SAM header lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentHeaderInfo {
    /// `@SQ` entries in header order
    pub reference_accessions: Vec<ReferenceAccession>,

    /// Last valid `@PG` entry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolInfo>,
}

impl AlignmentHeaderInfo {
    /// The first `@SQ` accession
    #[must_use]
    pub fn primary_accession(&self) -> Option<&ReferenceAccession> {
        self.reference_accessions.first()
    }

    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_ref().map(|t| t.name.as_str())
    }

    #[must_use]
    pub fn tool_version(&self) -> Option<&str> {
        self.tool.as_ref().map(|t| t.version.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_accession() {
        let mut info = AlignmentHeaderInfo::default();
        assert!(info.primary_accession().is_none());
        assert!(info.tool_name().is_none());

        info.reference_accessions
            .push(ReferenceAccession::new("NC_000913.3", 4_641_652));
        info.reference_accessions
            .push(ReferenceAccession::new("pUC19", 2686));
        info.tool = Some(ToolInfo {
            name: "bowtie2".to_string(),
            version: "2.4.5".to_string(),
        });

        assert_eq!(info.primary_accession().unwrap().accession, "NC_000913.3");
        assert_eq!(info.tool_name(), Some("bowtie2"));
        assert_eq!(info.tool_version(), Some("2.4.5"));
    }
}
