//! Catalog scan: enumerates the audiobooks below an archive root.

use std::fs;
use std::path::{Path, PathBuf};

use hbarchiv_core::is_audio_file;

use crate::error::ConvertError;
use crate::normalize::normalize_name;

/// One audiobook: author, title, and its audio files in playback order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audiobook {
    /// Author directory name, as found on disk.
    pub author: String,
    /// Title directory name, as found on disk.
    pub title: String,
    /// Absolute path of the title directory.
    pub path: PathBuf,
    /// Audio files in playback order: CD-major (flat files first, CD
    /// directories lexicographically), filename-minor.
    pub audio_files: Vec<PathBuf>,
}

impl Audiobook {
    /// Author name normalized for file names.
    pub fn normalized_author(&self) -> String {
        normalize_name(&self.author)
    }

    /// Title normalized for file names.
    pub fn normalized_title(&self) -> String {
        normalize_name(&self.title)
    }
}

/// Scans the fixed letter/author/title hierarchy below `root`.
///
/// Non-directory entries are skipped silently at every level; complaints
/// about them belong to the structure checker, not the catalog. The result
/// is sorted by author, then title.
pub fn find_audiobooks(root: &Path) -> Result<Vec<Audiobook>, ConvertError> {
    let mut books = Vec::new();
    for letter in read_subdirs(root)? {
        for author in read_subdirs(&letter)? {
            let author_name = file_name(&author);
            for book in read_subdirs(&author)? {
                let title = file_name(&book);
                let audio_files = collect_audio_files(&book)?;
                books.push(Audiobook {
                    author: author_name.clone(),
                    title,
                    path: book,
                    audio_files,
                });
            }
        }
    }
    books.sort_by(|a, b| (&a.author, &a.title).cmp(&(&b.author, &b.title)));
    Ok(books)
}

/// Collects the audio files of one title directory in playback order.
///
/// Flat files sort before CD directories (empty CD key), CDs sort
/// lexicographically among themselves, file names lexicographically within
/// each CD. Only direct children of the title and of each CD directory are
/// considered.
fn collect_audio_files(book: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    // (cd name or empty, file name); sorting this pair yields the order.
    let mut keyed: Vec<(String, String)> = Vec::new();
    let mut cds: Vec<String> = Vec::new();

    for entry in read_entries(book)? {
        let (name, path, is_dir) = entry;
        if is_dir {
            cds.push(name);
        } else if is_audio_file(&path) {
            keyed.push((String::new(), name));
        }
    }

    for cd in &cds {
        let cd_path = book.join(cd);
        for (name, path, is_dir) in read_entries(&cd_path)? {
            if !is_dir && is_audio_file(&path) {
                keyed.push((cd.clone(), name));
            }
        }
    }

    keyed.sort();
    Ok(keyed
        .into_iter()
        .map(|(cd, name)| {
            if cd.is_empty() {
                book.join(name)
            } else {
                book.join(cd).join(name)
            }
        })
        .collect())
}

fn read_subdirs(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    Ok(read_entries(dir)?
        .into_iter()
        .filter(|(_, _, is_dir)| *is_dir)
        .map(|(_, path, _)| path)
        .collect())
}

fn read_entries(dir: &Path) -> Result<Vec<(String, PathBuf, bool)>, ConvertError> {
    let read = fs::read_dir(dir).map_err(|source| ConvertError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|source| ConvertError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let is_dir = entry
            .file_type()
            .map_err(|source| ConvertError::ReadDir {
                path: entry.path(),
                source,
            })?
            .is_dir();
        entries.push((
            entry.file_name().to_string_lossy().into_owned(),
            entry.path(),
            is_dir,
        ));
    }
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
