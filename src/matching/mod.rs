//! Projection of scored alignments onto the primary reference.
//!
//! The primary accession is the first `@SQ` entry of the SAM header, or, when the
//! header lists none, the first sequence of the reference FASTA. Only alignments
//! whose `RNAME` equals it exactly become [`RecruitmentPoint`]s; alignments on
//! other references are expected in multi-reference SAM files and are skipped.
//!
//! ## Example
//!
//! ```rust
//! use frag_recruit::core::cigar::CigarPolicy;
//! use frag_recruit::matching::projector::project;
//! use frag_recruit::parsing::sam::read_sam;
//!
//! let sam = "@SQ\tSN:chr1\tLN:1000\n\
//!            r1\t0\tchr1\t101\t60\t40M\t*\t0\t0\tACGT\t*\n\
//!            r2\t0\tplasmid\t5\t60\t40M\t*\t0\t0\tACGT\t*\n";
//! let contents = read_sam(sam.as_bytes(), CigarPolicy::Ignore).unwrap();
//!
//! let points = project(&contents.alignments, "chr1");
//! assert_eq!(points.len(), 1);
//! assert_eq!(points[0].position, 101);
//! ```
//!
//! [`RecruitmentPoint`]: crate::core::alignment::RecruitmentPoint

pub mod projector;
