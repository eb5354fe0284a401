//! Audio file detection.

use std::fs;
use std::io;
use std::path::Path;

/// File extensions treated as audio, lowercase.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3"];

/// Returns true if the path has an audio extension, case-insensitively.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Returns true if `dir` holds at least one audio file as a direct child.
/// Reads the listing fresh; never recurses.
pub fn dir_has_audio(dir: &Path) -> io::Result<bool> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && is_audio_file(&entry.path()) {
            return Ok(true);
        }
    }
    Ok(false)
}
