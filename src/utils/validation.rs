//! Centralized input path checks.

use std::ffi::OsStr;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::parsing::sam::ParseError;

/// Uncompressed FASTA extensions accepted for the reference genome
pub const FASTA_EXTENSIONS: [&str; 3] = ["fa", "fasta", "fna"];

/// Compression suffixes that may follow a FASTA extension
pub const COMPRESSED_EXTENSIONS: [&str; 2] = ["gz", "bgz"];

/// Lowercased extension of a path, if any
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
}

/// Check if the path is gzip or bgzip compressed
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| COMPRESSED_EXTENSIONS.contains(&ext.as_str()))
}

/// Check if the path has a FASTA extension, optionally followed by `.gz`/`.bgz`.
///
/// # Examples
///
/// ```
/// use frag_recruit::utils::validation::is_fasta_file;
/// use std::path::Path;
///
/// assert!(is_fasta_file(Path::new("genome.fna.gz")));
/// assert!(!is_fasta_file(Path::new("reads.sam")));
/// ```
#[must_use]
pub fn is_fasta_file(path: &Path) -> bool {
    let inner = if is_gzipped(path) {
        path.file_stem().map(Path::new)
    } else {
        Some(path)
    };

    inner
        .and_then(extension_of)
        .is_some_and(|ext| FASTA_EXTENSIONS.contains(&ext.as_str()))
}

/// Open an input file, separating a missing file from other I/O failures.
///
/// # Errors
///
/// Returns `ParseError::InputNotFound` if nothing exists at `path`, or
/// `ParseError::UnreadableInput` if it exists but cannot be opened.
pub fn open_input(path: &Path) -> Result<File, ParseError> {
    File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ParseError::InputNotFound(path.to_path_buf()),
        _ => ParseError::UnreadableInput {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.fna")));
        assert!(is_fasta_file(Path::new("test.fa.gz")));
        assert!(is_fasta_file(Path::new("test.fasta.gz")));
        assert!(is_fasta_file(Path::new("test.fna.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/Reference.FA")));
        assert!(is_fasta_file(Path::new("/path/to/Reference.FNA.GZ")));

        assert!(!is_fasta_file(Path::new("test.sam")));
        assert!(!is_fasta_file(Path::new("test.fai")));
        assert!(!is_fasta_file(Path::new("test.gz")));
        assert!(!is_fasta_file(Path::new("fasta")));
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("x.fa.gz")));
        assert!(is_gzipped(Path::new("x.fa.BGZ")));
        assert!(!is_gzipped(Path::new("x.fa")));
    }

    #[test]
    fn test_open_input_missing() {
        let result = open_input(Path::new("/definitely/not/here.fa"));
        assert!(matches!(result, Err(ParseError::InputNotFound(_))));
    }

    #[test]
    fn test_open_input_existing() {
        let temp = NamedTempFile::with_suffix(".fa").unwrap();
        assert!(open_input(temp.path()).is_ok());
    }
}
