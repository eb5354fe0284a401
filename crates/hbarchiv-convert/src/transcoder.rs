//! External transcoder interface and the ffmpeg implementation.
//!
//! The consolidation step treats the transcoder as a black box: an ordered
//! list of input files and output parameters go in, one output file (or a
//! typed failure) comes out.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::TranscodeError;

/// Default timeout for one ffmpeg run (30 minutes; large books re-encode
/// slowly).
pub const DEFAULT_TIMEOUT_SECS: u64 = 1800;

/// Output parameters for one consolidation.
#[derive(Debug, Clone, Default)]
pub struct ConcatOptions {
    /// Target audio bitrate, e.g. `"64k"`. `None` stream-copies the input
    /// without re-encoding.
    pub bitrate: Option<String>,
    /// Artist tag for the produced file.
    pub author_tag: Option<String>,
    /// Title tag for the produced file.
    pub title_tag: Option<String>,
}

/// A tool that joins an ordered list of audio files into one output file.
pub trait Transcoder {
    /// Concatenates `inputs` (already in playback order) into `output`.
    ///
    /// Either the complete output file exists on return, or an error is
    /// returned; a partial file left behind on failure is the caller's to
    /// clean up.
    fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        opts: &ConcatOptions,
    ) -> Result<(), TranscodeError>;
}

/// Configuration for [`FfmpegTranscoder`].
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// Explicit path to the ffmpeg executable.
    pub ffmpeg_path: Option<PathBuf>,
    /// Timeout for one ffmpeg run.
    pub timeout: Duration,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FfmpegConfig {
    /// Sets the ffmpeg executable path.
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Runs ffmpeg's concat demuxer as a subprocess.
pub struct FfmpegTranscoder {
    config: FfmpegConfig,
}

impl FfmpegTranscoder {
    /// Creates a transcoder with default configuration.
    pub fn new() -> Self {
        Self {
            config: FfmpegConfig::default(),
        }
    }

    /// Creates a transcoder with the given configuration.
    pub fn with_config(config: FfmpegConfig) -> Self {
        Self { config }
    }

    /// Finds the ffmpeg executable.
    ///
    /// Order: explicit config path, `FFMPEG_PATH` environment variable,
    /// then `PATH` lookup.
    pub fn find_ffmpeg(&self) -> Result<PathBuf, TranscodeError> {
        if let Some(ref path) = self.config.ffmpeg_path {
            if path.exists() {
                return Ok(path.clone());
            }
        }
        if let Ok(path) = std::env::var("FFMPEG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }
        which::which("ffmpeg").map_err(|_| TranscodeError::FfmpegNotFound)
    }

    /// Writes the concat-demuxer list file. Single quotes in paths are
    /// escaped the way the demuxer expects (`'\''`).
    fn write_concat_list(inputs: &[PathBuf]) -> Result<tempfile::NamedTempFile, TranscodeError> {
        let mut list = tempfile::Builder::new()
            .prefix("hbarchiv_concat_")
            .suffix(".txt")
            .tempfile()?;
        for input in inputs {
            let escaped = input.to_string_lossy().replace('\'', "'\\''");
            writeln!(list, "file '{escaped}'")?;
        }
        list.flush()?;
        Ok(list)
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcoder for FfmpegTranscoder {
    fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        opts: &ConcatOptions,
    ) -> Result<(), TranscodeError> {
        if inputs.is_empty() {
            return Err(TranscodeError::NoInputs);
        }
        let ffmpeg = self.find_ffmpeg()?;
        let list = Self::write_concat_list(inputs)?;

        let mut cmd = Command::new(&ffmpeg);
        cmd.arg("-hide_banner")
            .arg("-nostdin")
            .arg("-y")
            .arg("-f")
            .arg("concat")
            .arg("-safe")
            .arg("0")
            .arg("-i")
            .arg(list.path());
        match &opts.bitrate {
            Some(bitrate) => {
                cmd.arg("-c:a").arg("libmp3lame").arg("-b:a").arg(bitrate);
            }
            None => {
                cmd.arg("-c").arg("copy");
            }
        }
        if let Some(author) = &opts.author_tag {
            cmd.arg("-metadata").arg(format!("artist={author}"));
        }
        if let Some(title) = &opts.title_tag {
            cmd.arg("-metadata").arg(format!("title={title}"));
        }
        cmd.arg(output);
        // Only stderr is surfaced; stdout stays unpiped so a filled pipe
        // cannot stall the subprocess.
        cmd.stdout(Stdio::null()).stderr(Stdio::piped());

        let child = cmd.spawn().map_err(TranscodeError::SpawnFailed)?;
        let (status, stderr) = wait_with_timeout(child, self.config.timeout)?;

        if !status.success() {
            return Err(TranscodeError::ProcessFailed {
                exit_code: status.code().unwrap_or(-1),
                stderr: tail(&stderr, 2000),
            });
        }
        if !output.exists() {
            return Err(TranscodeError::OutputNotFound {
                path: output.to_path_buf(),
            });
        }
        Ok(())
    }
}

fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> Result<(ExitStatus, String), TranscodeError> {
    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(TranscodeError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(TranscodeError::SpawnFailed(e)),
        }
    };

    let mut stderr = String::new();
    if let Some(mut err) = child.stderr.take() {
        use std::io::Read;
        let _ = err.read_to_string(&mut stderr);
    }
    Ok((status, stderr))
}

/// Last `max` bytes of `s`, on a char boundary, for error messages.
fn tail(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    s[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn concat_list_escapes_single_quotes() {
        let inputs = vec![PathBuf::from("/archiv/O'Brien/CD01/track.mp3")];
        let list = FfmpegTranscoder::write_concat_list(&inputs).unwrap();
        let content = std::fs::read_to_string(list.path()).unwrap();
        assert_eq!(content, "file '/archiv/O'\\''Brien/CD01/track.mp3'\n");
    }

    #[test]
    fn empty_inputs_are_rejected_before_spawning() {
        let transcoder = FfmpegTranscoder::new();
        let err = transcoder
            .concatenate(&[], Path::new("/tmp/out.mp3"), &ConcatOptions::default())
            .unwrap_err();
        assert!(matches!(err, TranscodeError::NoInputs));
    }

    #[test]
    fn tail_respects_char_boundaries() {
        let s = "äääää";
        let t = tail(s, 3);
        assert!(s.ends_with(&t));
        assert!(t.len() <= 3);
    }

    #[test]
    fn config_builder() {
        let config = FfmpegConfig::default()
            .ffmpeg_path("/opt/ffmpeg/bin/ffmpeg")
            .timeout_secs(60);
        assert_eq!(
            config.ffmpeg_path.as_deref(),
            Some(Path::new("/opt/ffmpeg/bin/ffmpeg"))
        );
        assert_eq!(config.timeout, Duration::from_secs(60));
    }
}
