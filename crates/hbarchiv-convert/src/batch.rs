//! Batch execution of planned conversions over a bounded worker pool.
//!
//! Every item is independent: one source tree in, one destination file
//! out. A failing item is recorded and never cancels its siblings; only a
//! fatal setup error (missing destination root) aborts the batch before
//! any work starts.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::catalog::Audiobook;
use crate::error::ConvertError;
use crate::transcoder::{ConcatOptions, Transcoder};

/// One planned conversion: a book and its destination file.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    /// The source book.
    pub book: Audiobook,
    /// Destination file for the consolidated audio.
    pub output: PathBuf,
}

/// Builds one job per book.
///
/// The destination is `<out_root>/<author>/<title>.mp3` with normalized
/// names, one directory per author.
pub fn plan_conversions(books: &[Audiobook], out_root: &Path) -> Vec<ConvertJob> {
    books
        .iter()
        .map(|book| ConvertJob {
            book: book.clone(),
            output: out_root
                .join(book.normalized_author())
                .join(format!("{}.mp3", book.normalized_title())),
        })
        .collect()
}

/// Status of one batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Output file produced.
    Converted,
    /// Output file already existed; nothing was done.
    Skipped,
    /// The transcoder (or output directory setup) failed.
    Failed,
}

/// Result of one batch item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// Author, as found on disk.
    pub author: String,
    /// Title, as found on disk.
    pub title: String,
    /// Destination file path.
    pub output: String,
    /// Item status.
    pub status: ItemStatus,
    /// Error message for failed items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of input files.
    pub input_count: usize,
    /// Item runtime in milliseconds.
    pub duration_ms: u64,
}

/// Summary of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Total items in the plan.
    pub total: usize,
    /// Items converted.
    pub converted: usize,
    /// Items skipped (destination existed).
    pub skipped: usize,
    /// Items failed.
    pub failed: usize,
    /// Wall-clock runtime in seconds.
    pub runtime_seconds: f64,
    /// Per-item results, sorted by author and title.
    pub items: Vec<ItemOutcome>,
}

/// Runs the planned conversions on up to `jobs` worker threads.
///
/// `out_root` must already exist and be a directory; anything else is a
/// fatal setup error and no job runs. `base_opts` carries the shared
/// output parameters (bitrate); the artist and title tags are filled per
/// item from the book.
pub fn run_batch<T: Transcoder + Sync>(
    plan: &[ConvertJob],
    out_root: &Path,
    transcoder: &T,
    base_opts: &ConcatOptions,
    jobs: usize,
) -> Result<BatchSummary, ConvertError> {
    if !out_root.is_dir() {
        return Err(ConvertError::DestinationMissing {
            path: out_root.display().to_string(),
        });
    }

    let start = Instant::now();
    let queue: Mutex<VecDeque<&ConvertJob>> = Mutex::new(plan.iter().collect());
    let results: Mutex<Vec<ItemOutcome>> = Mutex::new(Vec::with_capacity(plan.len()));
    let workers = jobs.max(1).min(plan.len().max(1));

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let job = queue.lock().unwrap().pop_front();
                let Some(job) = job else {
                    break;
                };
                let outcome = run_one(job, transcoder, base_opts);
                results.lock().unwrap().push(outcome);
            });
        }
    });

    let mut items = results
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    items.sort_by(|a, b| (&a.author, &a.title).cmp(&(&b.author, &b.title)));

    let count =
        |status: ItemStatus| items.iter().filter(|item| item.status == status).count();
    let converted = count(ItemStatus::Converted);
    let skipped = count(ItemStatus::Skipped);
    let failed = count(ItemStatus::Failed);
    Ok(BatchSummary {
        total: items.len(),
        converted,
        skipped,
        failed,
        runtime_seconds: start.elapsed().as_secs_f64(),
        items,
    })
}

fn run_one<T: Transcoder>(
    job: &ConvertJob,
    transcoder: &T,
    base_opts: &ConcatOptions,
) -> ItemOutcome {
    let start = Instant::now();
    let mut outcome = ItemOutcome {
        author: job.book.author.clone(),
        title: job.book.title.clone(),
        output: job.output.display().to_string(),
        status: ItemStatus::Failed,
        error: None,
        input_count: job.book.audio_files.len(),
        duration_ms: 0,
    };

    if job.output.exists() {
        outcome.status = ItemStatus::Skipped;
        outcome.duration_ms = start.elapsed().as_millis() as u64;
        return outcome;
    }

    if let Some(parent) = job.output.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            outcome.error = Some(format!("failed to create {}: {err}", parent.display()));
            outcome.duration_ms = start.elapsed().as_millis() as u64;
            return outcome;
        }
    }

    let opts = ConcatOptions {
        bitrate: base_opts.bitrate.clone(),
        author_tag: Some(job.book.author.clone()),
        title_tag: Some(job.book.title.clone()),
    };
    match transcoder.concatenate(&job.book.audio_files, &job.output, &opts) {
        Ok(()) => outcome.status = ItemStatus::Converted,
        Err(err) => outcome.error = Some(err.to_string()),
    }
    outcome.duration_ms = start.elapsed().as_millis() as u64;
    outcome
}
