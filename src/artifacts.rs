//! CSV artifacts handed to the plotting step.
//!
//! | File | Rows |
//! |------|------|
//! | `reference_details.csv` | one: primary header, primary length, (header, length)*, total length |
//! | `alignment_info.csv` | one per `@SQ` (accession, length), then (tool name, tool version) |
//! | `alignment_details.csv` | one per retained alignment |

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::core::alignment::ScoredAlignment;
use crate::core::header::AlignmentHeaderInfo;
use crate::core::reference::ReferenceGenome;

pub const REFERENCE_DETAILS_FILE: &str = "reference_details.csv";
pub const ALIGNMENT_INFO_FILE: &str = "alignment_info.csv";
pub const ALIGNMENT_DETAILS_FILE: &str = "alignment_details.csv";

/// Quote a field if it contains a comma, quote or line break
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn write_row<W: Write>(out: &mut W, fields: &[String]) -> std::io::Result<()> {
    let row: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", row.join(","))
}

/// Write the single reference summary row
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_reference_details<W: Write>(
    out: &mut W,
    genome: &ReferenceGenome,
) -> std::io::Result<()> {
    let mut fields = Vec::with_capacity(genome.sequences.len() * 2 + 1);
    if let Some(primary) = genome.primary() {
        fields.push(primary.header.clone());
        fields.push(primary.length.to_string());
    }
    for sequence in genome.secondary() {
        fields.push(sequence.header.clone());
        fields.push(sequence.length.to_string());
    }
    fields.push(genome.total_length.to_string());
    write_row(out, &fields)
}

/// Write one row per `@SQ` accession followed by the tool row, if any
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_alignment_info<W: Write>(
    out: &mut W,
    header: &AlignmentHeaderInfo,
) -> std::io::Result<()> {
    for accession in &header.reference_accessions {
        write_row(
            out,
            &[accession.accession.clone(), accession.length.to_string()],
        )?;
    }
    if let Some(tool) = &header.tool {
        write_row(out, &[tool.name.clone(), tool.version.clone()])?;
    }
    Ok(())
}

/// Write one row per retained alignment
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_alignment_details<W: Write>(
    out: &mut W,
    alignments: &[ScoredAlignment],
) -> std::io::Result<()> {
    for alignment in alignments {
        let record = &alignment.record;
        write_row(
            out,
            &[
                record.read_name.clone(),
                record.flag.to_string(),
                record.reference_name.clone(),
                record.position.to_string(),
                record.mapping_quality.to_string(),
                record.cigar.clone(),
                record.sequence.clone(),
                alignment.alignment_length.to_string(),
                format!("{:?}", alignment.percent_identity),
            ],
        )?;
    }
    Ok(())
}

/// Write one artifact to a hidden temporary file inside `dir`
fn stage<F>(dir: &Path, write: F) -> std::io::Result<NamedTempFile>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> std::io::Result<()>,
{
    let mut temp = tempfile::Builder::new()
        .prefix(".frag-recruit-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    let mut out = BufWriter::new(temp.as_file_mut());
    write(&mut out)?;
    out.flush()?;
    drop(out);
    Ok(temp)
}

/// Write all three artifacts into `dir`, returning their paths.
///
/// Every artifact is written to a temporary file first. The final names only
/// appear once all three have been written, and if moving one into place
/// fails the ones already moved are removed again.
///
/// # Errors
///
/// Returns an I/O error if `dir` cannot be created or a file cannot be written
/// or renamed.
pub fn write_all(
    dir: &Path,
    genome: &ReferenceGenome,
    header: &AlignmentHeaderInfo,
    alignments: &[ScoredAlignment],
) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let staged = vec![
        (
            dir.join(REFERENCE_DETAILS_FILE),
            stage(dir, |out| write_reference_details(out, genome))?,
        ),
        (
            dir.join(ALIGNMENT_INFO_FILE),
            stage(dir, |out| write_alignment_info(out, header))?,
        ),
        (
            dir.join(ALIGNMENT_DETAILS_FILE),
            stage(dir, |out| write_alignment_details(out, alignments))?,
        ),
    ];

    let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (path, temp) in staged {
        if let Err(e) = temp.persist(&path) {
            for done in &written {
                if let Err(remove_err) = std::fs::remove_file(done) {
                    warn!(path = %done.display(), "Could not remove artifact: {remove_err}");
                }
            }
            return Err(e.error);
        }
        written.push(path);
    }

    info!(dir = %dir.display(), "Wrote recruitment artifacts");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::AlignmentRecord;
    use crate::core::header::{ReferenceAccession, ToolInfo};
    use crate::core::reference::ReferenceSequence;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("chr1"), "chr1");
        assert_eq!(csv_field(">E. coli, K-12"), "\">E. coli, K-12\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_reference_details() {
        let genome = ReferenceGenome::new(
            vec![
                ReferenceSequence::new(">chr1", 10),
                ReferenceSequence::new(">chr2", 2),
            ],
            0,
        );
        let text = render(|out| write_reference_details(out, &genome));
        assert_eq!(text, ">chr1,10,>chr2,2,12\n");

        let single = ReferenceGenome::new(vec![ReferenceSequence::new(">chr1", 10)], 0);
        assert_eq!(render(|out| write_reference_details(out, &single)), ">chr1,10,10\n");

        let empty = ReferenceGenome::new(Vec::new(), 6);
        assert_eq!(render(|out| write_reference_details(out, &empty)), "6\n");
    }

    #[test]
    fn test_alignment_info() {
        let mut header = AlignmentHeaderInfo {
            reference_accessions: vec![
                ReferenceAccession::new("chr1", 10),
                ReferenceAccession::new("chr2", 2),
            ],
            tool: None,
        };
        assert_eq!(
            render(|out| write_alignment_info(out, &header)),
            "chr1,10\nchr2,2\n"
        );

        header.tool = Some(ToolInfo {
            name: "bwa".to_string(),
            version: "0.7.17-r1188".to_string(),
        });
        assert_eq!(
            render(|out| write_alignment_info(out, &header)),
            "chr1,10\nchr2,2\nbwa,0.7.17-r1188\n"
        );
    }

    #[test]
    fn test_alignment_details() {
        let alignments = vec![ScoredAlignment {
            record: AlignmentRecord {
                read_name: "r1".to_string(),
                flag: 16,
                reference_name: "chr1".to_string(),
                position: 101,
                mapping_quality: 42,
                cigar: "50M5D10M".to_string(),
                sequence: "ACGT".to_string(),
            },
            alignment_length: 55,
            percent_identity: 92.5,
        }];
        assert_eq!(
            render(|out| write_alignment_details(out, &alignments)),
            "r1,16,chr1,101,42,50M5D10M,ACGT,55,92.5\n"
        );

        let mut exact = alignments.clone();
        exact[0].percent_identity = 100.0;
        assert!(render(|out| write_alignment_details(out, &exact)).ends_with(",55,100.0\n"));
    }

    #[test]
    fn test_write_all() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested");
        let genome = ReferenceGenome::new(vec![ReferenceSequence::new(">chr1", 4)], 0);

        let paths = write_all(&out_dir, &genome, &AlignmentHeaderInfo::default(), &[]).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(
            std::fs::read_to_string(out_dir.join(REFERENCE_DETAILS_FILE)).unwrap(),
            ">chr1,4,4\n"
        );
        assert_eq!(
            std::fs::read_to_string(out_dir.join(ALIGNMENT_DETAILS_FILE)).unwrap(),
            ""
        );
    }

    #[test]
    fn test_write_all_leaves_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the last artifact should go cannot be replaced
        let blocker = dir.path().join(ALIGNMENT_DETAILS_FILE);
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), "").unwrap();
        let genome = ReferenceGenome::new(vec![ReferenceSequence::new(">chr1", 4)], 0);

        let result = write_all(dir.path(), &genome, &AlignmentHeaderInfo::default(), &[]);
        assert!(result.is_err());

        let mut remaining: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(remaining, vec![ALIGNMENT_DETAILS_FILE.to_string()]);
    }
}
