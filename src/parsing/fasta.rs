//! Reference genome summarizer.
//!
//! Streams a FASTA file line by line and records each entry's header and
//! residue count. Supports both uncompressed and gzip/bgzip compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::{info, warn};

use crate::core::reference::{ReferenceGenome, ReferenceSequence};
use crate::parsing::sam::ParseError;
use crate::utils::validation::{is_fasta_file, is_gzipped, open_input};

/// Summarize a FASTA file, decompressing it if needed.
///
/// Zero-length entries are kept. The result is not checked for emptiness;
/// callers that need a primary sequence must handle a genome with no entries.
///
/// # Errors
///
/// Returns `ParseError::UnsupportedFormat` if the extension is not a FASTA
/// extension, `ParseError::InputNotFound` if the file does not exist, or
/// `ParseError::UnreadableInput` if it cannot be opened, decompressed, or read.
pub fn summarize_file(path: &Path) -> Result<ReferenceGenome, ParseError> {
    if !is_fasta_file(path) {
        return Err(ParseError::UnsupportedFormat(format!(
            "{} is not a FASTA file (.fa, .fna, .fasta, optionally .gz)",
            path.display()
        )));
    }

    let file = open_input(path)?;
    let result = if is_gzipped(path) {
        summarize_reader(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        summarize_reader(BufReader::new(file))
    };

    result.map_err(|e| e.at_path(path))
}

/// Summarize FASTA text from any buffered reader.
///
/// # Errors
///
/// Returns `ParseError::Io` if a line cannot be read.
pub fn summarize_reader<R: BufRead>(reader: R) -> Result<ReferenceGenome, ParseError> {
    let mut sequences = Vec::new();
    let mut current: Option<String> = None;
    let mut seq_length: u64 = 0;
    let mut unassigned_length: u64 = 0;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.starts_with('>') {
            match current.take() {
                Some(header) => sequences.push(ReferenceSequence::new(header, seq_length)),
                None => unassigned_length = seq_length,
            }
            current = Some(line.to_string());
            seq_length = 0;
        } else {
            seq_length += line.len() as u64;
        }
    }

    match current {
        Some(header) => sequences.push(ReferenceSequence::new(header, seq_length)),
        None => unassigned_length = seq_length,
    }

    if unassigned_length > 0 {
        warn!(
            residues = unassigned_length,
            "FASTA has sequence before the first '>' header; not assigned to any entry"
        );
    }

    let genome = ReferenceGenome::new(sequences, unassigned_length);
    info!(
        molecules = genome.molecule_count,
        total_length = genome.total_length,
        "Summarized reference genome"
    );

    Ok(genome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_summarize_two_sequences() {
        let genome = summarize_reader(&b">chr1\nACGTACGTAC\n>chr2\nAC\n"[..]).unwrap();
        assert_eq!(
            genome.sequences,
            vec![
                ReferenceSequence::new(">chr1", 10),
                ReferenceSequence::new(">chr2", 2),
            ]
        );
        assert_eq!(genome.total_length, 12);
        assert_eq!(genome.molecule_count, 2);
    }

    #[test]
    fn test_multiline_and_whitespace() {
        let fasta = b">chr1 E. coli K-12  \r\nACGTACGT\r\n  ACGT \n\n>chr2\nGGGG";
        let genome = summarize_reader(&fasta[..]).unwrap();
        assert_eq!(genome.sequences[0].header, ">chr1 E. coli K-12");
        assert_eq!(genome.sequences[0].length, 12);
        assert_eq!(genome.sequences[1].length, 4);
    }

    #[test]
    fn test_zero_length_entries_retained() {
        let genome = summarize_reader(&b">empty\n>chr1\nACGT\n>tail\n"[..]).unwrap();
        let lengths: Vec<u64> = genome.sequences.iter().map(|s| s.length).collect();
        assert_eq!(lengths, vec![0, 4, 0]);
        assert_eq!(genome.molecule_count, 3);
        assert_eq!(genome.total_length, 4);
    }

    #[test]
    fn test_no_headers() {
        let genome = summarize_reader(&b"ACGT\nAC\n"[..]).unwrap();
        assert!(genome.is_empty());
        assert_eq!(genome.molecule_count, 0);
        assert_eq!(genome.total_length, 6);
        assert_eq!(genome.unassigned_length, 6);
    }

    #[test]
    fn test_lengths_sum_to_total() {
        let inputs: [&[u8]; 4] = [
            b">a\nAAAA\n>b\nCC\nCC\n>c\n",
            b">only\nACGTN\nacgtn\n",
            b"",
            b">x\n\n\n>y\nA\n",
        ];
        for input in inputs {
            let genome = summarize_reader(input).unwrap();
            let sum: u64 = genome.sequences.iter().map(|s| s.length).sum();
            assert_eq!(sum, genome.total_length);
        }
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let fasta = b">chr1\nACGT\n>chr2\nGG\n";
        let first = summarize_reader(&fasta[..]).unwrap();
        let second = summarize_reader(&fasta[..]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summarize_file() {
        let mut temp = NamedTempFile::with_suffix(".fna").unwrap();
        temp.write_all(b">NC_000913.3 Escherichia coli\nACGTACGT\nACGT\n>pUC19\nGGGG\n")
            .unwrap();
        temp.flush().unwrap();

        let genome = summarize_file(temp.path()).unwrap();
        assert_eq!(genome.molecule_count, 2);
        assert_eq!(genome.primary().unwrap().name(), "NC_000913.3");
        assert_eq!(genome.primary().unwrap().length, 12);
    }

    #[test]
    fn test_summarize_gzipped_file() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">chr1\nACGTACGTAC\n>chr2\nAC\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        temp.write_all(&compressed).unwrap();
        temp.flush().unwrap();

        let genome = summarize_file(temp.path()).unwrap();
        assert_eq!(genome.total_length, 12);
        assert_eq!(genome.molecule_count, 2);
    }

    #[test]
    fn test_summarize_rejects_other_extensions() {
        let temp = NamedTempFile::with_suffix(".txt").unwrap();
        assert!(matches!(
            summarize_file(temp.path()),
            Err(ParseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_summarize_missing_file() {
        assert!(matches!(
            summarize_file(Path::new("/no/such/genome.fa")),
            Err(ParseError::InputNotFound(_))
        ));
    }
}
