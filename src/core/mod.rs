//! Core data types for fragment recruitment.
//!
//! - [`ReferenceGenome`]: headers and lengths summarized from a FASTA file
//! - [`AlignmentHeaderInfo`]: `@SQ` accessions and `@PG` tool identity from a SAM header
//! - [`AlignmentRecord`] / [`ScoredAlignment`]: SAM alignment lines, before and after scoring
//! - [`RecruitmentPoint`]: the (position, percent identity) pair that gets plotted
//!
//! ## Scoring
//!
//! | CIGAR op | Counted as |
//! |----------|------------|
//! | M        | match      |
//! | D, I, N, S | edit     |
//! | H, P, =, X | ignored or rejected, see [`CigarPolicy`] |
//!
//! `percent_identity = 100 * match / (match + edit)` and
//! `alignment_length = match - edit`. Records with `alignment_length <= 30`
//! are dropped.
//!
//! [`ReferenceGenome`]: reference::ReferenceGenome
//! [`AlignmentHeaderInfo`]: header::AlignmentHeaderInfo
//! [`AlignmentRecord`]: alignment::AlignmentRecord
//! [`ScoredAlignment`]: alignment::ScoredAlignment
//! [`RecruitmentPoint`]: alignment::RecruitmentPoint
//! [`CigarPolicy`]: cigar::CigarPolicy

pub mod alignment;
pub mod cigar;
pub mod header;
pub mod reference;
