//! Violation report types for structure checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a recorded violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// An entry has the wrong kind for its level: a file where a directory
    /// is required, or stray files inside an author directory.
    Structure,
    /// A directory name fails its level's naming rule, or the author and
    /// title names overlap.
    Naming,
    /// mp3 files and CD directories are mixed at the title level, or both
    /// are absent.
    ContentMix,
    /// CD numbering: missing number, non-contiguous sequence, or
    /// inconsistent base names among siblings.
    Numbering,
    /// A CD directory without reachable mp3 files.
    MissingAudio,
    /// A repair ran but its target condition still fails.
    RepairPostcondition,
    /// The filesystem could not be read at this entry.
    Io,
}

/// A single recorded nonconformity: path, level, kind, and a human-readable
/// description. Never fatal; the walk continues past every violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path relative to the archive root, `/`-separated.
    pub path: String,
    /// Archive level (1..=5) the check belongs to.
    pub level: u8,
    /// Violation category.
    pub kind: ViolationKind,
    /// German description, without path and level.
    pub message: String,
}

impl Violation {
    /// Creates a new violation record.
    pub fn new(
        path: impl Into<String>,
        level: u8,
        kind: ViolationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            level,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (Ebene {})", self.path, self.message, self.level)
    }
}

/// Accumulates violations over one walk.
///
/// Collection order follows the traversal and is therefore filesystem
/// dependent; [`StructureReport::sorted_messages`] is the deterministic
/// presentation form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureReport {
    /// All recorded violations, in collection order.
    pub violations: Vec<Violation>,
}

impl StructureReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one violation.
    pub fn record(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Returns true if the tree conformed fully.
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of recorded violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if no violations were recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Formats every violation and sorts the lines lexicographically, so
    /// output does not depend on directory listing order.
    pub fn sorted_messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        messages.sort();
        messages
    }
}
