//! Convert command implementation
//!
//! Plans and runs the batch consolidation: one output mp3 per audiobook,
//! written below the destination root.

use anyhow::{Context, Result};
use colored::Colorize;
use hbarchiv_convert::{
    find_audiobooks, plan_conversions, run_batch, BatchSummary, ConcatOptions, ConvertJob,
    FfmpegTranscoder, ItemStatus,
};
use hbarchiv_core::ensure_root;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// JSON output for the convert command.
#[derive(Debug, Serialize)]
pub struct ConvertOutput {
    /// Timestamp of the run (RFC 3339, local time).
    pub timestamp: String,
    /// Archive root.
    pub root: String,
    /// Destination root.
    pub out_root: String,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// The batch summary; absent for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BatchSummary>,
    /// The planned outputs; present for dry runs only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<String>>,
}

/// Run the convert command
///
/// # Arguments
/// * `root` - Archive root directory
/// * `out_root` - Destination root directory (must exist)
/// * `jobs` - Number of parallel conversions
/// * `bitrate` - Optional re-encode bitrate (stream copy when absent)
/// * `dry_run` - Whether to print the plan without converting
/// * `json` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 if any item failed, 2 on setup errors
pub fn run(
    root: &str,
    out_root: &str,
    jobs: usize,
    bitrate: Option<&str>,
    dry_run: bool,
    json: bool,
) -> Result<ExitCode> {
    let root_path = Path::new(root);
    if let Err(err) = ensure_root(root_path) {
        eprintln!("{}", err.to_string().red());
        return Ok(ExitCode::from(2));
    }

    let books = find_audiobooks(root_path)
        .with_context(|| format!("failed to scan archive root: {root}"))?;
    let plan = plan_conversions(&books, Path::new(out_root));

    if dry_run {
        return print_plan(&plan, root, out_root, json);
    }

    if !json {
        println!("{} {}", "Quelle:".cyan().bold(), root);
        println!("{} {}", "Ziel:".cyan().bold(), out_root);
        println!(
            "{} {} Hörbücher, {} parallel",
            "Plan:".cyan().bold(),
            plan.len(),
            jobs
        );
        println!();
    }

    let transcoder = FfmpegTranscoder::new();
    let base_opts = ConcatOptions {
        bitrate: bitrate.map(str::to_string),
        ..Default::default()
    };
    // A missing destination root aborts here, before any item runs.
    let summary = run_batch(&plan, Path::new(out_root), &transcoder, &base_opts, jobs)
        .context("batch setup failed")?;

    let failed = summary.failed;
    if json {
        let output = ConvertOutput {
            timestamp: chrono::Local::now().to_rfc3339(),
            root: root.to_string(),
            out_root: out_root.to_string(),
            dry_run: false,
            summary: Some(summary),
            plan: None,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for item in &summary.items {
            match item.status {
                ItemStatus::Converted => {
                    println!(
                        "  {} {} - {} ({} Dateien, {} ms)",
                        "ok".green(),
                        item.author,
                        item.title,
                        item.input_count,
                        item.duration_ms
                    );
                }
                ItemStatus::Skipped => {
                    println!(
                        "  {} {} - {} (Ziel existiert bereits)",
                        "--".dimmed(),
                        item.author,
                        item.title
                    );
                }
                ItemStatus::Failed => {
                    println!(
                        "  {} {} - {}: {}",
                        "!!".red(),
                        item.author,
                        item.title,
                        item.error.as_deref().unwrap_or("unbekannter Fehler")
                    );
                }
            }
        }
        println!();
        println!(
            "{} {} konvertiert, {} übersprungen, {} fehlgeschlagen ({:.1} s)",
            "Ergebnis:".cyan().bold(),
            summary.converted,
            summary.skipped,
            summary.failed,
            summary.runtime_seconds
        );
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_plan(plan: &[ConvertJob], root: &str, out_root: &str, json: bool) -> Result<ExitCode> {
    if json {
        let output = ConvertOutput {
            timestamp: chrono::Local::now().to_rfc3339(),
            root: root.to_string(),
            out_root: out_root.to_string(),
            dry_run: true,
            summary: None,
            plan: Some(
                plan.iter()
                    .map(|job| job.output.display().to_string())
                    .collect(),
            ),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} {} Hörbücher",
            "Geplante Konvertierungen:".cyan().bold(),
            plan.len()
        );
        for job in plan {
            println!(
                "  {} - {} -> {}",
                job.book.author,
                job.book.title,
                job.output.display().to_string().dimmed()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}
