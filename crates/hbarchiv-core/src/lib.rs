//! Structure validation and repair for a five-level audiobook archive.
//!
//! The archive grammar has five strictly ordered levels below the root:
//!
//! 1. Letter directories (`A`, `B`, ...)
//! 2. Author directories (`Max Mustermann`)
//! 3. Title directories (`Mein_Buch1`)
//! 4. Either mp3 files directly (flat layout) or CD directories (`CD01`)
//! 5. mp3 files inside each CD directory
//!
//! [`walker::check_structure`] walks the tree, applies the repairs from
//! [`repair`] when enabled, and collects every nonconformity into a
//! [`report::StructureReport`]. Repairs run before the checks of the same
//! level, so a successful repair suppresses the corresponding violation in
//! the same pass.
//!
//! # Example
//!
//! ```no_run
//! use hbarchiv_core::{check_structure, CheckConfig};
//! use std::path::Path;
//!
//! let config = CheckConfig::new("/archiv/hoerbuecher").fix(false);
//! let report = check_structure(&config);
//!
//! for message in report.sorted_messages() {
//!     eprintln!("{}", message);
//! }
//! ```

pub mod audio;
pub mod cd_group;
pub mod error;
pub mod patterns;
pub mod repair;
pub mod report;
pub mod walker;

pub use audio::{is_audio_file, AUDIO_EXTENSIONS};
pub use cd_group::{analyze_cd_group, CdGroupAnalysis};
pub use error::{ensure_root, StructureError};
pub use repair::{flatten_single_subdirs, relocate_cd_audio, FlattenOutcome, RelocateOutcome};
pub use report::{StructureReport, Violation, ViolationKind};
pub use walker::{check_structure, CheckConfig};
