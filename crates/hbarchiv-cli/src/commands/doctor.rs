//! Doctor command implementation
//!
//! Checks system dependencies and configuration.

use anyhow::Result;
use colored::Colorize;
use hbarchiv_convert::FfmpegTranscoder;
use std::process::{Command, ExitCode};

/// Run the doctor command
///
/// Checks:
/// - hbarchiv and rustc versions
/// - ffmpeg availability (config path, `FFMPEG_PATH`, then `PATH`)
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run() -> Result<ExitCode> {
    println!("{}", "hbarchiv Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} hbarchiv-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    match version_of("rustc") {
        Some(version) => println!("  {} {}", "->".green(), version),
        None => println!("  {} rustc (not found)", "->".yellow()),
    }
    println!();

    println!("{}", "Dependencies:".bold());
    match FfmpegTranscoder::new().find_ffmpeg() {
        Ok(path) => {
            let version = version_of(&path.display().to_string())
                .unwrap_or_else(|| "unknown version".to_string());
            println!("  {} {} ({})", "ok".green(), version, path.display());
        }
        Err(err) => {
            println!("  {} {}", "!!".red(), err);
            println!(
                "     {}",
                "ffmpeg is required for the convert command.".dimmed()
            );
            all_ok = false;
        }
    }
    println!();

    if all_ok {
        println!("{}", "All checks passed.".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", "Some checks failed.".red().bold());
        Ok(ExitCode::FAILURE)
    }
}

/// First line of `<tool> --version`, if the tool runs.
fn version_of(tool: &str) -> Option<String> {
    let output = Command::new(tool).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout.lines().next().map(|line| line.trim().to_string())
}
