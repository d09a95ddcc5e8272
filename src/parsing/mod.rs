//! Stream readers for the two recruitment inputs.
//!
//! - **FASTA** ([`fasta`]): summarize a reference genome into headers and lengths
//! - **SAM** ([`sam`]): reconcile `@SQ`/`@PG` header lines and score alignment lines
//!
//! ## Example
//!
//! ```rust,no_run
//! use frag_recruit::core::cigar::CigarPolicy;
//! use frag_recruit::parsing::{fasta, sam};
//! use std::path::Path;
//!
//! let genome = fasta::summarize_file(Path::new("genome.fna.gz")).unwrap();
//! let contents = sam::parse_file(Path::new("reads.sam"), CigarPolicy::Ignore).unwrap();
//! println!("{} molecules, {} alignments", genome.molecule_count, contents.alignments.len());
//! ```
//!
//! ## Recognized header tags
//!
//! | Record | Tag | Used as |
//! |--------|-----|---------|
//! | `@SQ`  | SN  | Reference accession |
//! | `@SQ`  | LN  | Reference length |
//! | `@PG`  | ID  | Tool name |
//! | `@PG`  | VN  | Tool version |

pub mod fasta;
pub mod sam;
