//! Filesystem repairs: fixpoint flattening and audio relocation.
//!
//! Repairs mutate the tree, so each function re-lists the directory it
//! touches on every iteration instead of trusting an earlier listing. The
//! walker runs repairs strictly before the checks of the same level.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::audio::is_audio_file;

/// Counters for one flattening run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenOutcome {
    /// Directory levels collapsed.
    pub collapsed: usize,
    /// Entries promoted into the target directory.
    pub promoted: usize,
    /// Entries left in place because the destination name already existed.
    pub skipped: usize,
}

impl FlattenOutcome {
    /// Returns true if the run changed nothing.
    pub fn unchanged(&self) -> bool {
        self.collapsed == 0 && self.promoted == 0
    }
}

/// Collapses `dir` while it contains exactly one subdirectory and no files.
///
/// Every entry of the single subdirectory is promoted into `dir`; an entry
/// whose name already exists at the destination is skipped silently, never
/// overwritten. The emptied subdirectory is removed and the loop re-lists
/// `dir`, so chains of single-child directories collapse to a fixpoint. An
/// iteration that makes no progress breaks the loop (possible when the
/// subdirectory contains an entry carrying its own name), so the loop
/// terminates on every finite tree.
pub fn flatten_single_subdirs(dir: &Path) -> io::Result<FlattenOutcome> {
    let mut outcome = FlattenOutcome::default();
    loop {
        let (subdirs, files) = list_partitioned(dir)?;
        if !files.is_empty() || subdirs.len() != 1 {
            break;
        }
        let sub = &subdirs[0];
        let mut progressed = false;
        for entry in fs::read_dir(sub)? {
            let entry = entry?;
            let dest = dir.join(entry.file_name());
            if dest.exists() {
                outcome.skipped += 1;
                continue;
            }
            fs::rename(entry.path(), &dest)?;
            outcome.promoted += 1;
            progressed = true;
        }
        // Removal fails while skipped entries are still inside.
        if fs::remove_dir(sub).is_ok() {
            outcome.collapsed += 1;
            progressed = true;
        }
        if !progressed {
            break;
        }
    }
    Ok(outcome)
}

/// Result of an audio relocation attempt on one CD directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateOutcome {
    /// The CD directory already holds audio files directly.
    AlreadyOk,
    /// Audio files were moved up from the single audio-bearing
    /// subdirectory; the subdirectory was removed if that emptied it.
    Repaired {
        /// Number of files moved.
        moved: usize,
    },
    /// Exactly one subdirectory holds audio files, but `apply` was false.
    /// Nothing was moved.
    Candidate,
    /// No subdirectory, or more than one, holds audio files directly.
    NoCandidate {
        /// Number of audio-bearing subdirectories found.
        candidates: usize,
    },
}

/// Relocates audio files into a CD directory that has none.
///
/// Subdirectories are inspected one level deep only. When exactly one of
/// them holds audio files directly and `apply` is true, those files move up
/// into `cd_dir` and the subdirectory is removed once empty. The
/// destination is free by construction: `cd_dir` had no audio files, and
/// non-audio content is left untouched.
pub fn relocate_cd_audio(cd_dir: &Path, apply: bool) -> io::Result<RelocateOutcome> {
    let (subdirs, files) = list_partitioned(cd_dir)?;
    if files.iter().any(|f| is_audio_file(f)) {
        return Ok(RelocateOutcome::AlreadyOk);
    }

    let mut bearing: Vec<&PathBuf> = Vec::new();
    for sub in &subdirs {
        if dir_has_direct_audio(sub)? {
            bearing.push(sub);
        }
    }

    match (bearing.len(), apply) {
        (1, true) => {
            let source = bearing[0];
            let mut moved = 0;
            for entry in fs::read_dir(source)? {
                let entry = entry?;
                let path = entry.path();
                if entry.file_type()?.is_file() && is_audio_file(&path) {
                    fs::rename(&path, cd_dir.join(entry.file_name()))?;
                    moved += 1;
                }
            }
            let _ = fs::remove_dir(source);
            Ok(RelocateOutcome::Repaired { moved })
        }
        (1, false) => Ok(RelocateOutcome::Candidate),
        (n, _) => Ok(RelocateOutcome::NoCandidate { candidates: n }),
    }
}

/// Lists `dir` split into (subdirectories, files), unsorted.
fn list_partitioned(dir: &Path) -> io::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut subdirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            subdirs.push(entry.path());
        } else {
            files.push(entry.path());
        }
    }
    Ok((subdirs, files))
}

fn dir_has_direct_audio(dir: &Path) -> io::Result<bool> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && is_audio_file(&entry.path()) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn make_file(path: &Path) {
        fs::write(path, b"dummy").unwrap();
    }

    #[test]
    fn flatten_collapses_a_deep_chain() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("1").join("2").join("3");
        fs::create_dir_all(&deep).unwrap();
        make_file(&deep.join("track1.mp3"));

        let outcome = flatten_single_subdirs(dir.path()).unwrap();

        assert_eq!(outcome.collapsed, 3);
        assert!(dir.path().join("track1.mp3").exists());
        let subdirs: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().unwrap().is_dir())
            .collect();
        assert!(subdirs.is_empty());
    }

    #[test]
    fn flatten_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        make_file(&deep.join("track1.mp3"));

        let first = flatten_single_subdirs(dir.path()).unwrap();
        assert!(!first.unchanged());

        let second = flatten_single_subdirs(dir.path()).unwrap();
        assert!(second.unchanged());
        assert_eq!(second, FlattenOutcome::default());
    }

    #[test]
    fn flatten_leaves_multi_child_directories_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("CD01")).unwrap();
        fs::create_dir(dir.path().join("CD02")).unwrap();

        let outcome = flatten_single_subdirs(dir.path()).unwrap();
        assert!(outcome.unchanged());
        assert!(dir.path().join("CD01").exists());
        assert!(dir.path().join("CD02").exists());
    }

    #[test]
    fn flatten_stops_when_files_are_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        make_file(&dir.path().join("track1.mp3"));

        let outcome = flatten_single_subdirs(dir.path()).unwrap();
        assert!(outcome.unchanged());
        assert!(dir.path().join("sub").exists());
    }

    #[test]
    fn flatten_skips_colliding_names_silently() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("x");
        fs::create_dir(&sub).unwrap();
        // A file named like the subdirectory itself collides on promotion.
        make_file(&sub.join("x"));
        make_file(&sub.join("track1.mp3"));

        let outcome = flatten_single_subdirs(dir.path()).unwrap();

        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.promoted, 1);
        assert!(dir.path().join("track1.mp3").exists());
        // The colliding entry stays behind, keeping its parent alive.
        assert!(sub.join("x").exists());
    }

    #[test]
    fn flatten_terminates_on_self_named_nesting() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("x");
        fs::create_dir(&sub).unwrap();
        fs::create_dir(sub.join("x")).unwrap();

        // dir/x/x: promoting "x" collides with its own parent. The run must
        // stop instead of looping.
        let outcome = flatten_single_subdirs(dir.path()).unwrap();
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.promoted, 0);
    }

    #[test]
    fn relocate_moves_audio_up_and_removes_the_source() {
        let cd = tempfile::tempdir().unwrap();
        let sub = cd.path().join("sub");
        fs::create_dir(&sub).unwrap();
        make_file(&sub.join("track1.mp3"));

        let outcome = relocate_cd_audio(cd.path(), true).unwrap();

        assert_eq!(outcome, RelocateOutcome::Repaired { moved: 1 });
        assert!(cd.path().join("track1.mp3").exists());
        assert!(!sub.exists());
    }

    #[test]
    fn relocate_keeps_a_source_with_other_content() {
        let cd = tempfile::tempdir().unwrap();
        let sub = cd.path().join("sub");
        fs::create_dir(&sub).unwrap();
        make_file(&sub.join("track1.mp3"));
        make_file(&sub.join("cover.jpg"));

        let outcome = relocate_cd_audio(cd.path(), true).unwrap();

        assert_eq!(outcome, RelocateOutcome::Repaired { moved: 1 });
        assert!(cd.path().join("track1.mp3").exists());
        assert!(sub.join("cover.jpg").exists());
    }

    #[test]
    fn relocate_reports_candidate_without_applying() {
        let cd = tempfile::tempdir().unwrap();
        let sub = cd.path().join("sub");
        fs::create_dir(&sub).unwrap();
        make_file(&sub.join("track1.mp3"));

        let outcome = relocate_cd_audio(cd.path(), false).unwrap();

        assert_eq!(outcome, RelocateOutcome::Candidate);
        assert!(sub.join("track1.mp3").exists());
    }

    #[test]
    fn relocate_does_nothing_when_audio_is_present() {
        let cd = tempfile::tempdir().unwrap();
        make_file(&cd.path().join("track1.mp3"));
        fs::create_dir(cd.path().join("sub")).unwrap();
        make_file(&cd.path().join("sub").join("track2.mp3"));

        let outcome = relocate_cd_audio(cd.path(), true).unwrap();

        assert_eq!(outcome, RelocateOutcome::AlreadyOk);
        assert!(cd.path().join("sub").join("track2.mp3").exists());
    }

    #[test]
    fn relocate_rejects_ambiguous_sources() {
        let cd = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            let sub = cd.path().join(sub);
            fs::create_dir(&sub).unwrap();
            make_file(&sub.join("track.mp3"));
        }

        let outcome = relocate_cd_audio(cd.path(), true).unwrap();
        assert_eq!(outcome, RelocateOutcome::NoCandidate { candidates: 2 });
    }

    #[test]
    fn relocate_reports_empty_cd() {
        let cd = tempfile::tempdir().unwrap();
        let outcome = relocate_cd_audio(cd.path(), true).unwrap();
        assert_eq!(outcome, RelocateOutcome::NoCandidate { candidates: 0 });
    }
}
