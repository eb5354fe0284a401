//! Five-level archive walk: repairs and checks per level.
//!
//! The walk is a synchronous depth-first traversal. Repairs run strictly
//! before the checks of the same level and every listing is read fresh
//! after a repair, so a successful repair suppresses the corresponding
//! violation within the same pass. A failure at one entry never stops the
//! scan of its siblings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::audio::{dir_has_audio, is_audio_file};
use crate::cd_group::analyze_cd_group;
use crate::patterns::{
    author_name_issue, author_starts_with_letter, is_letter_name, is_title_name,
    names_mutually_contained, normalize_author_name, AuthorNameIssue,
};
use crate::repair::{flatten_single_subdirs, relocate_cd_audio, RelocateOutcome};
use crate::report::{StructureReport, Violation, ViolationKind};

/// Configuration for one check run. The walker receives everything it needs
/// here; there is no process-wide state.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Archive root. Must already exist and be a directory; callers verify
    /// this once (see [`crate::error::ensure_root`]), the walker does not.
    pub root: PathBuf,
    /// Apply repairs before the corresponding checks.
    pub fix: bool,
}

impl CheckConfig {
    /// Creates a configuration with repairs disabled.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fix: false,
        }
    }

    /// Sets the repair flag.
    pub fn fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }
}

/// Walks the archive below `config.root` and returns the collected report.
///
/// Filesystem errors below the root are recorded as violations for the
/// affected entry, which is then skipped; nothing below the root aborts the
/// run.
pub fn check_structure(config: &CheckConfig) -> StructureReport {
    let mut walker = Walker {
        config,
        report: StructureReport::new(),
    };
    walker.walk_root();
    walker.report
}

/// Named directory entry, split by kind. Listing order is preserved as the
/// filesystem returns it; the report sorts at presentation time.
type Listing = (Vec<(String, PathBuf)>, Vec<(String, PathBuf)>);

struct Walker<'a> {
    config: &'a CheckConfig,
    report: StructureReport,
}

impl Walker<'_> {
    fn rel(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.config.root).unwrap_or(path);
        let rel = rel.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/");
        if rel.is_empty() {
            ".".to_string()
        } else {
            rel
        }
    }

    fn record(&mut self, path: &Path, level: u8, kind: ViolationKind, message: impl Into<String>) {
        self.report
            .record(Violation::new(self.rel(path), level, kind, message));
    }

    fn record_io(&mut self, path: &Path, level: u8, err: &io::Error) {
        self.record(
            path,
            level,
            ViolationKind::Io,
            format!("konnte nicht gelesen werden: {err}"),
        );
    }

    /// Lists `dir` as (directories, files). `None` means the listing itself
    /// failed and a violation was recorded; unreadable single entries are
    /// recorded and dropped from the listing.
    fn list_level(&mut self, dir: &Path, level: u8) -> Option<Listing> {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(err) => {
                self.record_io(dir, level, &err);
                return None;
            }
        };
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.record_io(dir, level, &err);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => dirs.push((name, entry.path())),
                Ok(_) => files.push((name, entry.path())),
                Err(err) => self.record_io(&entry.path(), level, &err),
            }
        }
        Some((dirs, files))
    }

    /// Level 1: letter directories under the root.
    fn walk_root(&mut self) {
        let root = self.config.root.clone();
        let Some((dirs, files)) = self.list_level(&root, 1) else {
            return;
        };
        for (_, path) in &files {
            self.record(path, 1, ViolationKind::Structure, "ist kein Verzeichnis");
        }
        for (name, path) in &dirs {
            if !is_letter_name(name) {
                self.record(
                    path,
                    1,
                    ViolationKind::Naming,
                    "Name ist kein einzelner Buchstabe",
                );
                // Nothing below a non-letter directory is inspected.
                continue;
            }
            self.walk_letter(name, path);
        }
    }

    /// Level 2: author directories under one letter directory.
    fn walk_letter(&mut self, letter: &str, letter_path: &Path) {
        let Some((dirs, files)) = self.list_level(letter_path, 2) else {
            return;
        };
        for (_, path) in &files {
            self.record(path, 2, ViolationKind::Structure, "ist kein Verzeichnis");
        }
        for (name, path) in dirs {
            self.walk_author(letter, name, path);
        }
    }

    /// Checks one author directory, repairing its name first when enabled,
    /// then descends. Naming violations do not stop the descent: the title
    /// checks below are independent of the author name.
    fn walk_author(&mut self, letter: &str, name: String, path: PathBuf) {
        let (name, path) = self.check_author_name(name, path);
        if !author_starts_with_letter(&name, letter) {
            self.record(
                &path,
                2,
                ViolationKind::Naming,
                format!("beginnt nicht mit '{letter}'"),
            );
        }
        self.walk_author_contents(&name, &path);
    }

    /// Validates the author name, attempting the underscore-to-space rename
    /// when repairs are enabled. Returns the (possibly renamed) entry.
    fn check_author_name(&mut self, name: String, path: PathBuf) -> (String, PathBuf) {
        let Some(issue) = author_name_issue(&name) else {
            return (name, path);
        };
        let candidate = normalize_author_name(&name);
        if self.config.fix {
            if let Some(fixed) = &candidate {
                let target = path.with_file_name(fixed);
                // Collision-safe: an existing target declines the repair.
                if !target.exists() && fs::rename(&path, &target).is_ok() {
                    return (fixed.clone(), target);
                }
            }
        }
        let base = match issue {
            AuthorNameIssue::InvalidChars => "Authorenverzeichnisname enthält ungültige Zeichen",
            AuthorNameIssue::MissingSpace => {
                "Authorenverzeichnisname enthält kein Leerzeichen in der Mitte"
            }
        };
        let message = if candidate.is_some() && !self.config.fix {
            format!("{base} (--fix würde den Namen reparieren)")
        } else {
            base.to_string()
        };
        self.record(&path, 2, ViolationKind::Naming, message);
        (name, path)
    }

    /// Level 3 entries of one author directory. Stray files are reported
    /// once per author directory, not once per file.
    fn walk_author_contents(&mut self, author: &str, author_path: &Path) {
        let Some((dirs, files)) = self.list_level(author_path, 3) else {
            return;
        };
        if !files.is_empty() {
            self.record(
                author_path,
                2,
                ViolationKind::Structure,
                "Authorenverzeichnis enthält Dateien",
            );
        }
        for (name, path) in &dirs {
            self.walk_title(author, name, path);
        }
    }

    /// Checks one title directory: naming and containment first, then (on a
    /// clean name) flattening repair and the content layout below it.
    fn walk_title(&mut self, author: &str, title: &str, title_path: &Path) {
        let mut naming_ok = true;
        if !is_title_name(title) {
            self.record(
                title_path,
                3,
                ViolationKind::Naming,
                "Hörbuchverzeichnisname enthält ungültige Zeichen",
            );
            naming_ok = false;
        }
        if names_mutually_contained(author, title) {
            self.record(
                title_path,
                3,
                ViolationKind::Naming,
                "Name des Authors und des Hörbuchs dürfen sich nicht gegenseitig enthalten",
            );
            naming_ok = false;
        }
        if !naming_ok {
            return;
        }
        if self.config.fix {
            if let Err(err) = flatten_single_subdirs(title_path) {
                self.record_io(title_path, 3, &err);
                return;
            }
        }
        self.walk_title_contents(title_path);
    }

    /// Level 4: direct mp3 files and CD directories are mutually exclusive
    /// and at least one of the two must be present. CD directories are
    /// analyzed as a group, then each one individually (level 5).
    fn walk_title_contents(&mut self, title_path: &Path) {
        let Some((dirs, files)) = self.list_level(title_path, 4) else {
            return;
        };
        let has_audio = files.iter().any(|(_, path)| is_audio_file(path));
        if has_audio && !dirs.is_empty() {
            // Deliberately never auto-repaired: neither layout wins.
            self.record(
                title_path,
                4,
                ViolationKind::ContentMix,
                "enthält sowohl mp3-Dateien als auch CD-Verzeichnisse",
            );
        } else if !has_audio && dirs.is_empty() {
            self.record(
                title_path,
                4,
                ViolationKind::ContentMix,
                "enthält weder mp3-Dateien noch CD-Verzeichnisse",
            );
        }
        if dirs.is_empty() {
            return;
        }

        let names: Vec<&str> = dirs.iter().map(|(name, _)| name.as_str()).collect();
        let analysis = analyze_cd_group(&names);
        for name in &analysis.missing_number {
            self.record(
                &title_path.join(name),
                4,
                ViolationKind::Numbering,
                "CD-Verzeichnisname enthält keine Zahl",
            );
        }
        if analysis.inconsistent_bases {
            self.record(
                title_path,
                4,
                ViolationKind::Numbering,
                "CD-Verzeichnisnamen unterscheiden sich abgesehen von der Zahl",
            );
        }
        if analysis.non_contiguous {
            self.record(
                title_path,
                4,
                ViolationKind::Numbering,
                "CD-Verzeichnisnummern sind nicht fortlaufend ab 1",
            );
        }

        for (_, cd_path) in &dirs {
            self.walk_cd(cd_path);
        }
    }

    /// Level 5: every CD directory must hold mp3 files directly. The
    /// relocation repair runs first; its result is verified against a fresh
    /// listing.
    fn walk_cd(&mut self, cd_path: &Path) {
        match relocate_cd_audio(cd_path, self.config.fix) {
            Ok(RelocateOutcome::AlreadyOk) => {}
            Ok(RelocateOutcome::Repaired { .. }) => match dir_has_audio(cd_path) {
                Ok(true) => {}
                Ok(false) => self.record(
                    cd_path,
                    5,
                    ViolationKind::RepairPostcondition,
                    "enthält auch nach Reparatur keine mp3-Dateien",
                ),
                Err(err) => self.record_io(cd_path, 5, &err),
            },
            Ok(RelocateOutcome::Candidate) => self.record(
                cd_path,
                5,
                ViolationKind::MissingAudio,
                "enthält keine mp3-Dateien, aber genau ein Unterverzeichnis mit mp3-Dateien \
                 (--fix würde sie verschieben)",
            ),
            Ok(RelocateOutcome::NoCandidate { .. }) => self.record(
                cd_path,
                5,
                ViolationKind::MissingAudio,
                "enthält keine mp3-Dateien",
            ),
            Err(err) => self.record_io(cd_path, 5, &err),
        }
    }
}
