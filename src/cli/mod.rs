//! Command-line interface for frag-recruit.
//!
//! ## Usage
//!
//! ```text
//! # Summarize and print the recruitment series
//! frag-recruit -r genome.fna.gz -a alignment.sam
//!
//! # Plot-ready TSV (position, percent identity)
//! frag-recruit -r genome.fna -a alignment.sam --format tsv > points.tsv
//!
//! # Also write the CSV artifacts for the plotting step
//! frag-recruit -r genome.fna -a alignment.sam --output-dir recruit_out
//! ```

use clap::Parser;

use crate::core::cigar::CigarPolicy;

pub mod recruit;

#[derive(Parser)]
#[command(name = "frag-recruit")]
#[command(version)]
#[command(about = "Extract fragment recruitment plot coordinates from SAM alignments")]
#[command(
    long_about = "frag-recruit reads a reference genome (FASTA, optionally gzipped) and a SAM alignment file, scores every alignment from its CIGAR string, and reports (genome position, percent identity) pairs for reads aligned to the primary reference.\n\nPercent identity is 100 * M / (M + D + I + N + S); alignments of length M - (D + I + N + S) <= 30 are dropped."
)]
pub struct Cli {
    /// Reference genome (.fa, .fna, .fasta, optionally .gz)
    #[arg(short = 'r', long = "ref-genome", visible_alias = "ref_genome", required = true)]
    pub ref_genome: std::path::PathBuf,

    /// SAM alignment file, including header lines
    #[arg(short = 'a', long = "align-data", visible_alias = "align_data", required = true)]
    pub align_data: std::path::PathBuf,

    /// Directory to write reference_details.csv, alignment_info.csv and alignment_details.csv
    #[arg(short, long)]
    pub output_dir: Option<std::path::PathBuf>,

    /// How to treat CIGAR operations other than M, D, I, N and S
    #[arg(long, value_enum, default_value = "ignore")]
    pub unsupported_cigar: UnsupportedCigarHandling,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// How to handle CIGAR operations other than M, D, I, N and S
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UnsupportedCigarHandling {
    /// Skip H, P, = and X operations without counting them
    #[default]
    Ignore,
    /// Fail the run on the first H, P, = or X operation
    Reject,
}

impl From<UnsupportedCigarHandling> for CigarPolicy {
    fn from(handling: UnsupportedCigarHandling) -> Self {
        match handling {
            UnsupportedCigarHandling::Ignore => CigarPolicy::Ignore,
            UnsupportedCigarHandling::Reject => CigarPolicy::Reject,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_requires_both_inputs() {
        assert!(Cli::try_parse_from(["frag-recruit", "-r", "genome.fa"]).is_err());
        assert!(Cli::try_parse_from(["frag-recruit", "-a", "reads.sam"]).is_err());

        let cli = Cli::try_parse_from(["frag-recruit", "-r", "genome.fa", "-a", "reads.sam"]).unwrap();
        assert_eq!(cli.ref_genome, std::path::PathBuf::from("genome.fa"));
        assert_eq!(cli.unsupported_cigar, UnsupportedCigarHandling::Ignore);
        assert_eq!(CigarPolicy::from(cli.unsupported_cigar), CigarPolicy::Ignore);
        assert!(cli.output_dir.is_none());
    }

    #[test]
    fn test_cli_original_flag_names() {
        let cli = Cli::try_parse_from([
            "frag-recruit",
            "--ref_genome",
            "genome.fa",
            "--align_data",
            "reads.sam",
            "--unsupported-cigar",
            "reject",
        ])
        .unwrap();
        assert_eq!(cli.align_data, std::path::PathBuf::from("reads.sam"));
        assert_eq!(cli.unsupported_cigar, UnsupportedCigarHandling::Reject);
        assert_eq!(CigarPolicy::from(cli.unsupported_cigar), CigarPolicy::Reject);
    }
}
