//! Batch audio consolidation for the audiobook archive.
//!
//! Scans the validated letter/author/title hierarchy into a catalog of
//! [`catalog::Audiobook`] entries, plans one output file per book, and runs
//! the conversions over a bounded worker pool. The actual decode, encode
//! and concatenation work is delegated to an external tool behind the
//! [`transcoder::Transcoder`] trait; [`transcoder::FfmpegTranscoder`] is
//! the production implementation.
//!
//! The conversion phase is deliberately independent per book: each job
//! reads one source tree and writes one destination file, so job failures
//! never affect sibling jobs. Only setup errors (a missing destination
//! root) abort the whole batch.

pub mod batch;
pub mod catalog;
pub mod error;
pub mod normalize;
pub mod transcoder;

pub use batch::{plan_conversions, run_batch, BatchSummary, ConvertJob, ItemOutcome, ItemStatus};
pub use catalog::{find_audiobooks, Audiobook};
pub use error::{ConvertError, TranscodeError};
pub use normalize::normalize_name;
pub use transcoder::{ConcatOptions, FfmpegTranscoder, Transcoder};
