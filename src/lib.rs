//! # frag-recruit
//!
//! A library for turning SAM alignments and a FASTA reference into the
//! coordinates of a fragment recruitment plot.
//!
//! A fragment recruitment plot places every aligned read at its genome position
//! (X) against its percent identity to the reference (Y), showing coverage and
//! divergence along a genome at a glance. `frag-recruit` produces that series:
//!
//! - **Reference summary**: header, length and count of every FASTA entry, gzip or plain
//! - **Header reconciliation**: `@SQ` accessions/lengths and `@PG` aligner identity
//! - **CIGAR scoring**: alignment length and percent identity per read, with a length filter
//! - **Projection**: (position, percent identity) for reads on the primary reference
//!
//! ## Example
//!
//! ```rust,no_run
//! use frag_recruit::pipeline::{run, RecruitmentConfig};
//!
//! let config = RecruitmentConfig::new("genome.fna.gz", "alignment.sam");
//! let result = run(&config).unwrap();
//!
//! for point in &result.points {
//!     println!("{}\t{:.2}", point.position, point.percent_identity);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Data types for references, headers, alignments and CIGAR scoring
//! - [`parsing`]: FASTA summarizer and SAM reader
//! - [`matching`]: Projection of scored alignments onto the primary reference
//! - [`pipeline`]: End-to-end run over a FASTA and a SAM file
//! - [`artifacts`]: CSV files consumed by the plotting step
//! - [`cli`]: Command-line interface implementation

pub mod artifacts;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::alignment::{AlignmentRecord, RecruitmentPoint, ScoredAlignment};
pub use crate::core::cigar::{CigarError, CigarPolicy, CigarScore};
pub use crate::core::header::{AlignmentHeaderInfo, ReferenceAccession, ToolInfo};
pub use crate::core::reference::{ReferenceGenome, ReferenceSequence};
pub use parsing::sam::ParseError;
pub use pipeline::{RecruitmentConfig, RecruitmentResult};
