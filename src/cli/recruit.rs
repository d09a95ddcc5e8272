use std::io::Write;

use crate::artifacts;
use crate::cli::{Cli, OutputFormat};
use crate::pipeline::{self, RecruitmentConfig, RecruitmentResult};

/// Execute a recruitment run and render the result
///
/// # Errors
///
/// Returns an error if either input cannot be parsed, the CIGAR policy rejects
/// a record, or the artifacts or output cannot be written.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = RecruitmentConfig::new(&cli.ref_genome, &cli.align_data)
        .with_cigar_policy(cli.unsupported_cigar.into());

    let result = pipeline::run(&config)?;

    if cli.verbose {
        eprintln!(
            "Scored {} alignment records: {} retained, {} below length threshold, {} without alignable bases",
            result.stats.records,
            result.stats.retained,
            result.stats.below_threshold,
            result.stats.no_alignable_bases,
        );
    }

    if let Some(dir) = &cli.output_dir {
        let paths =
            artifacts::write_all(dir, &result.genome, &result.header, &result.alignments)?;
        if cli.verbose {
            for path in paths {
                eprintln!("Wrote {}", path.display());
            }
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => print_text_result(&mut out, &result)?,
        OutputFormat::Json => print_json_result(&mut out, &result)?,
        OutputFormat::Tsv => print_tsv_result(&mut out, &result)?,
    }
    out.flush()?;

    Ok(())
}

fn print_text_result<W: Write>(out: &mut W, result: &RecruitmentResult) -> std::io::Result<()> {
    writeln!(out, "Fragment Recruitment")?;
    writeln!(out, "{}", "=".repeat(60))?;

    writeln!(out, "\nReference genome:")?;
    if let Some(primary) = result.genome.primary() {
        writeln!(out, "  Primary: {} ({} bp)", primary.description(), primary.length)?;
    }
    writeln!(out, "  Molecules: {}", result.genome.molecule_count)?;
    writeln!(out, "  Total length: {} bp", result.genome.total_length)?;

    writeln!(out, "\nAlignments:")?;
    match &result.header.tool {
        Some(tool) => writeln!(out, "  Aligner: {} {}", tool.name, tool.version)?,
        None => writeln!(out, "  Aligner: unknown")?,
    }
    writeln!(
        out,
        "  Reference accessions: {}",
        result.header.reference_accessions.len()
    )?;
    writeln!(out, "  Records: {}", result.stats.records)?;
    writeln!(out, "  Retained (length > 30): {}", result.stats.retained)?;
    writeln!(out, "  Dropped: {}", result.stats.dropped())?;

    writeln!(out, "\nRecruitment:")?;
    write!(out, "  Primary accession: {}", result.primary_accession.name)?;
    match result.primary_length() {
        Some(length) => writeln!(out, " ({length} bp)")?,
        None => writeln!(out)?,
    }
    writeln!(out, "  Points: {}", result.points.len())?;

    if let Some((min, max)) = identity_range(result) {
        writeln!(out, "  Percent identity: {min:.2}% - {max:.2}%")?;
    }

    Ok(())
}

fn identity_range(result: &RecruitmentResult) -> Option<(f64, f64)> {
    result.points.iter().map(|p| p.percent_identity).fold(None, |acc, v| {
        Some(match acc {
            None => (v, v),
            Some((min, max)) => (f64::min(min, v), f64::max(max, v)),
        })
    })
}

fn print_json_result<W: Write>(out: &mut W, result: &RecruitmentResult) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "reference": {
            "primary_header": result.genome.primary().map(|s| s.header.as_str()),
            "molecule_count": result.genome.molecule_count,
            "total_length": result.genome.total_length,
            "sequences": &result.genome.sequences,
        },
        "alignment_header": &result.header,
        "stats": &result.stats,
        "primary_accession": &result.primary_accession,
        "primary_length": result.primary_length(),
        "points": &result.points,
    });

    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    Ok(())
}

fn print_tsv_result<W: Write>(out: &mut W, result: &RecruitmentResult) -> std::io::Result<()> {
    writeln!(out, "position\tpercent_identity")?;
    for point in &result.points {
        writeln!(out, "{}\t{:?}", point.position, point.percent_identity)?;
    }
    Ok(())
}
